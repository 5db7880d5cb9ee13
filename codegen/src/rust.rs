use crate::error::CodegenError;
use crate::naming::{member_name, module_name, rust_ident};
use crate::schema::{ComponentSchema, PropertyDescriptor, PropertyKind};
use crate::validate::validate;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_RUNTIME_PATH: &str = "::propwire_runtime";

#[derive(Debug, Clone)]
pub struct RustConfig {
    /// Path generated code uses to reach the runtime crate.
    pub runtime_path: String,
}

impl Default for RustConfig {
    fn default() -> Self {
        Self {
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
        }
    }
}

/// Source for one component module.
#[derive(Debug, Clone)]
pub struct GeneratedComponent {
    pub name: String,
    pub module_name: String,
    pub source: String,
}

impl GeneratedComponent {
    pub fn file_name(&self) -> String {
        format!("{}.rs", self.module_name)
    }
}

/// Every component of a module plus the parent module tying them together.
#[derive(Debug, Clone)]
pub struct ModuleOutput {
    pub components: Vec<GeneratedComponent>,
    pub mod_rs: String,
    exports: String,
}

impl ModuleOutput {
    /// One file with inline modules, suitable for `include!`.
    pub fn single_file(&self) -> String {
        let mut out = String::from(MODULE_HEADER);
        for component in &self.components {
            out.push_str(&format!("\npub mod {} {{\n", component.module_name));
            out.push_str(&indent(&component.source));
            out.push_str("}\n");
        }
        out.push_str(&self.exports);
        out
    }
}

const MODULE_HEADER: &str = "// @generated by propwire. Do not edit.\n";

fn indent(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + source.len() / 8);
    for line in source.lines() {
        if !line.is_empty() {
            out.push_str("    ");
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

/// Validate and synthesise a single component.
pub fn compile_component(
    schema: &ComponentSchema,
    config: &RustConfig,
) -> Result<GeneratedComponent, CodegenError> {
    validate(schema)?;
    let compiler = ComponentCompiler::new(schema, &config.runtime_path);
    let source = compiler.compile();

    debug!(
        component = %schema.name,
        plain = schema.props_of(PropertyKind::Plain).count(),
        elements = schema.props_of(PropertyKind::Element).count(),
        functions = schema.props_of(PropertyKind::Function).count(),
        "synthesized component"
    );

    Ok(GeneratedComponent {
        name: schema.name.clone(),
        module_name: module_name(&schema.name),
        source,
    })
}

/// Synthesise every schema into one module. Fails on the first invalid schema
/// so no partial output exists.
pub fn compile_module(
    schemas: &[ComponentSchema],
    config: &RustConfig,
) -> Result<ModuleOutput, CodegenError> {
    let mut type_names = HashSet::new();
    let mut module_names = HashSet::new();
    let mut components = Vec::with_capacity(schemas.len());

    for schema in schemas {
        let generated = compile_component(schema, config)?;
        let state_name = format!("{}State", generated.name);
        if !type_names.insert(generated.name.clone())
            || !type_names.insert(state_name)
            || !module_names.insert(generated.module_name.clone())
        {
            return Err(CodegenError::DuplicateComponent(generated.name));
        }
        components.push(generated);
    }

    let exports = generate_exports(&components, &config.runtime_path);
    let mut mod_rs = format!("{}\n", MODULE_HEADER);
    for component in &components {
        mod_rs.push_str(&format!("pub mod {};\n", component.module_name));
    }
    mod_rs.push_str(&exports);

    Ok(ModuleOutput {
        components,
        mod_rs,
        exports,
    })
}

/// Re-exports and the registry hook shared by both module layouts.
fn generate_exports(components: &[GeneratedComponent], rt: &str) -> String {
    let mut out = String::from("\n");
    for component in components {
        out.push_str(&format!(
            "pub use {module}::{{{name}, {name}State}};\n",
            module = component.module_name,
            name = component.name
        ));
    }

    let registry = if components.is_empty() {
        "_registry"
    } else {
        "registry"
    };
    let calls: String = components
        .iter()
        .map(|c| format!("    {}::register(registry);\n", c.name))
        .collect();

    out.push_str(&format!(
        r#"
/// Register the state type of every generated component.
pub fn register_all({registry}: &mut {rt}::RendererRegistry) {{
{calls}}}
"#,
    ));
    out
}

/// Write `mod.rs` plus one file per component into `dir`.
pub fn write_module(output: &ModuleOutput, dir: &Path) -> Result<Vec<PathBuf>, CodegenError> {
    std::fs::create_dir_all(dir).map_err(|e| CodegenError::io(dir, e))?;

    let mut written = Vec::with_capacity(output.components.len() + 1);
    for component in &output.components {
        let path = dir.join(component.file_name());
        std::fs::write(&path, &component.source).map_err(|e| CodegenError::io(&path, e))?;
        written.push(path);
    }

    let mod_path = dir.join("mod.rs");
    std::fs::write(&mod_path, &output.mod_rs).map_err(|e| CodegenError::io(&mod_path, e))?;
    written.push(mod_path);
    Ok(written)
}

/// Write [`ModuleOutput::single_file`] to `path`.
pub fn write_single_file(output: &ModuleOutput, path: &Path) -> Result<PathBuf, CodegenError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CodegenError::io(parent, e))?;
    }
    std::fs::write(path, output.single_file()).map_err(|e| CodegenError::io(path, e))?;
    Ok(path.to_path_buf())
}

/// Names a property is emitted under.
struct PropNames<'a> {
    prop: &'a PropertyDescriptor,
    /// Field, getter and parameter identifier.
    ident: String,
    setter: String,
    member: String,
}

impl<'a> PropNames<'a> {
    fn new(prop: &'a PropertyDescriptor) -> Self {
        let member = member_name(&prop.name);
        Self {
            prop,
            ident: rust_ident(&member),
            setter: format!("set_{}", member),
            member,
        }
    }

    fn tag_ident(&self) -> String {
        format!("{}_component_type", self.member)
    }

    fn handler_fn(&self) -> String {
        format!("{}_handler", self.member)
    }
}

pub(crate) struct ComponentCompiler<'a> {
    schema: &'a ComponentSchema,
    rt: &'a str,
    props: Vec<PropNames<'a>>,
}

impl<'a> ComponentCompiler<'a> {
    pub(crate) fn new(schema: &'a ComponentSchema, rt: &'a str) -> Self {
        Self {
            schema,
            rt,
            props: schema.props.iter().map(PropNames::new).collect(),
        }
    }

    fn of_kind(&self, kind: PropertyKind) -> impl Iterator<Item = &PropNames<'a>> {
        self.props.iter().filter(move |p| p.prop.kind() == kind)
    }

    fn has_state_fields(&self) -> bool {
        self.props
            .iter()
            .any(|p| p.prop.kind() != PropertyKind::Function)
    }

    pub(crate) fn compile(&self) -> String {
        let sections = [
            format!(
                "// @generated by propwire from the {} schema. Do not edit.\n\nuse serde::{{Deserialize, Serialize}};",
                self.schema.name
            ),
            self.generate_component_struct(),
            self.generate_component_impl(),
            self.generate_component_trait_impl(),
            self.generate_debug_impl(),
            self.generate_state_struct(),
            self.generate_state_impl(),
        ];

        let mut out = sections
            .iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n\n");
        out.push('\n');
        out
    }

    fn slot_type(&self, names: &PropNames<'_>) -> String {
        match names.prop.kind() {
            PropertyKind::Element => format!("{}::ComponentRef", self.rt),
            _ => names.prop.ty.clone(),
        }
    }

    fn generate_component_struct(&self) -> String {
        let name = &self.schema.name;
        let mut fields = vec![
            format!("    core: {}::ComponentCore,", self.rt),
            format!("    state: {}State,", name),
        ];
        for names in &self.props {
            if names.prop.kind() != PropertyKind::Plain {
                fields.push(format!(
                    "    {}: Option<{}>,",
                    names.ident,
                    self.slot_type(names)
                ));
            }
        }

        format!(
            "/// Server-side `{name}` component.\npub struct {name} {{\n{fields}\n}}",
            name = name,
            fields = fields.join("\n")
        )
    }

    fn generate_component_impl(&self) -> String {
        let name = &self.schema.name;
        let mut methods = vec![
            format!("    pub const COMPONENT_TYPE: &'static str = \"{}\";", name),
            self.generate_constructor(),
            self.generate_detached(),
            format!(
                "    pub fn state(&self) -> &{name}State {{\n        &self.state\n    }}",
                name = name
            ),
        ];
        methods.push(self.generate_current_state());

        if self.has_state_fields() {
            methods.push(format!(
                r#"    fn state_mut(&mut self) -> &mut {name}State {{
        self.core.mark_dirty();
        &mut self.state
    }}"#,
                name = name
            ));
        }

        for names in &self.props {
            methods.push(match names.prop.kind() {
                PropertyKind::Plain => self.generate_plain_accessors(names),
                PropertyKind::Element => self.generate_element_accessors(names),
                PropertyKind::Function => self.generate_function_accessors(names),
            });
        }

        methods.push(format!(
            r#"    /// Make this component's state restorable from its type tag.
    pub fn register(registry: &mut {rt}::RendererRegistry) {{
        registry.register::<{name}State>(Self::COMPONENT_TYPE);
    }}"#,
            rt = self.rt,
            name = name
        ));

        format!("impl {} {{\n{}\n}}", name, methods.join("\n\n"))
    }

    fn generate_constructor(&self) -> String {
        let rt = self.rt;
        let mut params = Vec::new();
        let mut calls = Vec::new();

        for prop in self.schema.required_props() {
            let names = PropNames::new(prop);
            params.push(format!("{}: {}", names.ident, self.slot_type(&names)));
            calls.push(match prop.kind() {
                PropertyKind::Plain => {
                    format!("            __this.{}({});", names.setter, names.ident)
                }
                PropertyKind::Function => {
                    format!("            __this.{}(Some({}));", names.setter, names.ident)
                }
                PropertyKind::Element => {
                    format!("            __this.{}(Some({}))?;", names.setter, names.ident)
                }
            });
        }

        let init = if calls.is_empty() {
            String::new()
        } else {
            format!(
                "        {{\n            let mut __this = __component.borrow_mut();\n{}\n        }}\n",
                calls.join("\n")
            )
        };

        format!(
            r#"    /// Create a component with its required properties set.
    pub fn new({params}) -> Result<::std::rc::Rc<::std::cell::RefCell<Self>>, {rt}::RuntimeError> {{
        let __component = {rt}::bind(Self::detached());
{init}        Ok(__component)
    }}"#,
            params = params.join(", "),
            rt = rt,
            init = init
        )
    }

    fn generate_current_state(&self) -> String {
        let rt = self.rt;
        let refreshes: Vec<String> = self
            .of_kind(PropertyKind::Element)
            .map(|names| {
                format!(
                    "        let (__wrapper, __component_type) = {rt}::wrap_child(self.{ident}.as_ref())?;\n        __state.{setter}(__wrapper);\n        __state.set_{tag}(__component_type);",
                    rt = rt,
                    ident = names.ident,
                    setter = names.setter,
                    tag = names.tag_ident()
                )
            })
            .collect();

        let body = if refreshes.is_empty() {
            "        Ok(self.state.clone())".to_string()
        } else {
            format!(
                "        let mut __state = self.state.clone();\n{}\n        Ok(__state)",
                refreshes.join("\n")
            )
        };

        format!(
            r#"    /// State with every element slot re-wrapped from its live child.
    /// [`Self::state`] keeps the wrappers taken when each child was set.
    pub fn current_state(&self) -> Result<{name}State, {rt}::RuntimeError> {{
{body}
    }}"#,
            name = self.schema.name,
            rt = rt,
            body = body
        )
    }

    fn generate_detached(&self) -> String {
        let mut fields = vec![
            format!("            core: {}::ComponentCore::new(),", self.rt),
            format!("            state: {}State::default(),", self.schema.name),
        ];
        for names in &self.props {
            if names.prop.kind() != PropertyKind::Plain {
                fields.push(format!("            {}: None,", names.ident));
            }
        }

        format!(
            "    fn detached() -> Self {{\n        Self {{\n{}\n        }}\n    }}",
            fields.join("\n")
        )
    }

    fn generate_plain_accessors(&self, names: &PropNames<'_>) -> String {
        format!(
            r#"    pub fn {ident}(&self) -> &{ty} {{
        self.state.{ident}()
    }}

    pub fn {setter}(&mut self, {ident}: {ty}) {{
        self.state_mut().{setter}({ident});
    }}"#,
            ident = names.ident,
            setter = names.setter,
            ty = names.prop.ty
        )
    }

    fn generate_element_accessors(&self, names: &PropNames<'_>) -> String {
        format!(
            r#"    pub fn {ident}(&self) -> Option<&{rt}::ComponentRef> {{
        self.{ident}.as_ref()
    }}

    /// Replace the `{prop}` child. The previous child is detached, the new one
    /// is parented to this component and its state is wrapped into ours.
    pub fn {setter}(&mut self, {ident}: Option<{rt}::ComponentRef>) -> Result<(), {rt}::RuntimeError> {{
        let (__wrapper, __component_type) = {rt}::attach(&self.core, &mut self.{ident}, {ident})?;
        let __state = self.state_mut();
        __state.{setter}(__wrapper);
        __state.set_{tag}(__component_type);
        Ok(())
    }}"#,
            ident = names.ident,
            setter = names.setter,
            tag = names.tag_ident(),
            prop = names.prop.name,
            rt = self.rt
        )
    }

    fn generate_function_accessors(&self, names: &PropNames<'_>) -> String {
        format!(
            r#"    pub fn {ident}(&self) -> Option<&{ty}> {{
        self.{ident}.as_ref()
    }}

    /// Set the handler for `{event}`. Clearing it stops routing the event.
    pub fn {setter}(&mut self, {ident}: Option<{ty}>) {{
        self.{ident} = {ident};
        if self.{ident}.is_some() {{
            self.core.add_function("{event}");
        }} else {{
            self.core.remove_function("{event}");
        }}
    }}

    fn {handler_fn}(&self) -> Result<{rt}::Handler, {rt}::RuntimeError> {{
        self.{ident}
            .clone()
            .map(Into::into)
            .ok_or_else(|| {rt}::RuntimeError::HandlerAbsent {{
                component: Self::COMPONENT_TYPE,
                event: "{event}".to_string(),
            }})
    }}"#,
            ident = names.ident,
            setter = names.setter,
            handler_fn = names.handler_fn(),
            event = names.prop.event_name(),
            ty = names.prop.ty,
            rt = self.rt
        )
    }

    fn generate_component_trait_impl(&self) -> String {
        let rt = self.rt;

        // Element wrappers go stale as children change; re-wrap before sending.
        let snapshot = if self.of_kind(PropertyKind::Element).next().is_none() {
            format!("        {}::snapshot(&self.state)", rt)
        } else {
            format!("        {}::snapshot(&self.current_state()?)", rt)
        };

        let children = if self.of_kind(PropertyKind::Element).next().is_none() {
            "        Vec::new().into_iter()".to_string()
        } else {
            let pushes: Vec<String> = self
                .of_kind(PropertyKind::Element)
                .map(|names| {
                    format!(
                        "        if let Some(child) = &self.{} {{\n            children.push(child.clone());\n        }}",
                        names.ident
                    )
                })
                .collect();
            format!(
                "        let mut children = Vec::new();\n{}\n        children.into_iter()",
                pushes.join("\n")
            )
        };

        let unknown = format!(
            r#"Err({rt}::RuntimeError::UnknownEvent {{
                component: Self::COMPONENT_TYPE,
                event: event.to_string(),
            }})"#,
            rt = rt
        );
        let route = if self.of_kind(PropertyKind::Function).next().is_none() {
            format!("        {}", unknown.replace("\n    ", "\n"))
        } else {
            let arms: Vec<String> = self
                .of_kind(PropertyKind::Function)
                .map(|names| {
                    format!(
                        "            \"{}\" => self.{}(),",
                        names.prop.event_name(),
                        names.handler_fn()
                    )
                })
                .collect();
            format!(
                "        match event {{\n{}\n            _ => {},\n        }}",
                arms.join("\n"),
                unknown
            )
        };

        format!(
            r#"impl {rt}::Component for {name} {{
    fn component_type(&self) -> &'static str {{
        Self::COMPONENT_TYPE
    }}

    fn core(&self) -> &{rt}::ComponentCore {{
        &self.core
    }}

    fn core_mut(&mut self) -> &mut {rt}::ComponentCore {{
        &mut self.core
    }}

    fn state_snapshot(&self) -> Result<{rt}::Value, {rt}::RuntimeError> {{
{snapshot}
    }}

    fn children(&self) -> {rt}::Children {{
{children}
    }}

    fn route(&self, event: &str) -> Result<{rt}::Handler, {rt}::RuntimeError> {{
{route}
    }}
}}"#,
            rt = rt,
            name = self.schema.name,
            snapshot = snapshot,
            children = children,
            route = route
        )
    }

    fn generate_debug_impl(&self) -> String {
        format!(
            r#"impl ::std::fmt::Debug for {name} {{
    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {{
        f.debug_struct("{name}")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }}
}}"#,
            name = self.schema.name
        )
    }

    fn generate_state_struct(&self) -> String {
        let mut fields = Vec::new();
        for names in &self.props {
            match names.prop.kind() {
                PropertyKind::Plain => fields.push(format!(
                    "    #[serde(rename = \"{}\")]\n    {}: {},",
                    names.prop.name, names.ident, names.prop.ty
                )),
                PropertyKind::Element => {
                    fields.push(format!(
                        "    #[serde(rename = \"{}\")]\n    {}: Option<{}::StateWrapper>,",
                        names.prop.name, names.ident, self.rt
                    ));
                    fields.push(format!(
                        "    #[serde(rename = \"{}ComponentType\")]\n    {}: Option<String>,",
                        names.prop.name,
                        names.tag_ident()
                    ));
                }
                PropertyKind::Function => {}
            }
        }

        let body = if fields.is_empty() {
            " {}".to_string()
        } else {
            format!(" {{\n{}\n}}", fields.join("\n"))
        };

        format!(
            "/// Serializable mirror of [`{name}`]'s synchronised fields.\n#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]\n#[serde(default)]\npub struct {name}State{body}",
            name = self.schema.name,
            body = body
        )
    }

    fn generate_state_impl(&self) -> String {
        let mut methods = Vec::new();
        for names in &self.props {
            match names.prop.kind() {
                PropertyKind::Plain => methods.push(format!(
                    r#"    pub fn {ident}(&self) -> &{ty} {{
        &self.{ident}
    }}

    pub fn {setter}(&mut self, {ident}: {ty}) {{
        self.{ident} = {ident};
    }}"#,
                    ident = names.ident,
                    setter = names.setter,
                    ty = names.prop.ty
                )),
                PropertyKind::Element => methods.push(format!(
                    r#"    pub fn {ident}(&self) -> Option<&{rt}::StateWrapper> {{
        self.{ident}.as_ref()
    }}

    pub fn {setter}(&mut self, {ident}: Option<{rt}::StateWrapper>) {{
        self.{ident} = {ident};
    }}

    pub fn {tag}(&self) -> Option<&str> {{
        self.{tag}.as_deref()
    }}

    pub fn set_{tag}(&mut self, {tag}: Option<String>) {{
        self.{tag} = {tag};
    }}"#,
                    ident = names.ident,
                    setter = names.setter,
                    tag = names.tag_ident(),
                    rt = self.rt
                )),
                PropertyKind::Function => {}
            }
        }

        if methods.is_empty() {
            return String::new();
        }
        format!(
            "impl {}State {{\n{}\n}}",
            self.schema.name,
            methods.join("\n\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button() -> ComponentSchema {
        ComponentSchema::new("Button")
            .with_prop(PropertyDescriptor::plain("label", "String"))
            .with_prop(PropertyDescriptor::plain("disabled", "bool"))
            .with_prop(PropertyDescriptor::element(
                "icon",
                "::propwire_runtime::ComponentRef",
            ))
            .with_prop(PropertyDescriptor::function(
                "onPress",
                "::propwire_runtime::Handler",
            ))
            .with_required("label")
            .with_required("onPress")
    }

    fn source(schema: &ComponentSchema) -> String {
        compile_component(schema, &RustConfig::default())
            .expect("should compile")
            .source
    }

    #[test]
    fn test_constructor_takes_required_in_order() {
        let src = source(&button());
        assert!(
            src.contains("pub fn new(label: String, on_press: ::propwire_runtime::Handler)"),
            "unexpected constructor:\n{}",
            src
        );
        assert!(src.contains("__this.set_label(label);"));
        assert!(src.contains("__this.set_on_press(Some(on_press));"));
    }

    #[test]
    fn test_plain_property_has_no_other_branch() {
        let src = source(&button());
        assert!(src.contains("self.state_mut().set_label(label);"));
        assert!(src.contains("#[serde(rename = \"label\")]\n    label: String,"));
        assert!(!src.contains("labelHandler"));
        assert!(!src.contains("label_handler"));
        assert!(!src.contains("label_component_type"));
        assert!(!src.contains("    label: Option<"));
    }

    #[test]
    fn test_element_property_wires_parent_and_state() {
        let src = source(&button());
        assert!(src.contains("icon: Option<::propwire_runtime::ComponentRef>,"));
        assert!(src.contains(
            "let (__wrapper, __component_type) = ::propwire_runtime::attach(&self.core, &mut self.icon, icon)?;"
        ));
        assert!(src.contains("__state.set_icon_component_type(__component_type);"));
        assert!(src.contains("#[serde(rename = \"iconComponentType\")]"));
        assert!(src.contains("icon: Option<::propwire_runtime::StateWrapper>,"));
        assert!(!src.contains("iconHandler"));
        assert!(!src.contains("icon_handler"));
    }

    #[test]
    fn test_snapshot_rewraps_live_children() {
        let src = source(&button());
        assert!(src.contains(
            "pub fn current_state(&self) -> Result<ButtonState, ::propwire_runtime::RuntimeError>"
        ));
        assert!(src.contains(
            "let (__wrapper, __component_type) = ::propwire_runtime::wrap_child(self.icon.as_ref())?;"
        ));
        assert!(src.contains("::propwire_runtime::snapshot(&self.current_state()?)"));

        let plain =
            ComponentSchema::new("Label").with_prop(PropertyDescriptor::plain("text", "String"));
        let src = source(&plain);
        assert!(src.contains("::propwire_runtime::snapshot(&self.state)"));
        assert!(src.contains("        Ok(self.state.clone())"));
    }

    #[test]
    fn test_constructor_follows_declaration_order() {
        let schema = ComponentSchema::new("Pair")
            .with_prop(PropertyDescriptor::plain("a", "String"))
            .with_prop(PropertyDescriptor::plain("b", "bool"))
            .with_required("b")
            .with_required("a");
        let src = source(&schema);
        assert!(
            src.contains("pub fn new(a: String, b: bool)"),
            "unexpected constructor:\n{}",
            src
        );
    }

    #[test]
    fn test_function_property_registers_event() {
        let src = source(&button());
        assert!(src.contains("self.core.add_function(\"onPressHandler\");"));
        assert!(src.contains("self.core.remove_function(\"onPressHandler\");"));
        assert!(src.contains("\"onPressHandler\" => self.on_press_handler(),"));
        assert!(!src.contains("#[serde(rename = \"onPress\")]"));
        assert!(!src.contains("onPressComponentType"));
    }

    #[test]
    fn test_children_follow_schema_order() {
        let schema = ComponentSchema::new("Panel")
            .with_prop(PropertyDescriptor::element("header", "Element"))
            .with_prop(PropertyDescriptor::plain("title", "String"))
            .with_prop(PropertyDescriptor::element("body", "Element"))
            .with_prop(PropertyDescriptor::element("footer", "Element"));
        let src = source(&schema);

        let header = src.find("if let Some(child) = &self.header").unwrap();
        let body = src.find("if let Some(child) = &self.body").unwrap();
        let footer = src.find("if let Some(child) = &self.footer").unwrap();
        assert!(header < body && body < footer);
    }

    #[test]
    fn test_element_required_param_propagates_errors() {
        let schema = ComponentSchema::new("Frame")
            .with_prop(PropertyDescriptor::element("content", "Element"))
            .with_required("content");
        let src = source(&schema);
        assert!(src.contains("pub fn new(content: ::propwire_runtime::ComponentRef)"));
        assert!(src.contains("__this.set_content(Some(content))?;"));
    }

    #[test]
    fn test_keyword_property_uses_raw_identifier() {
        let schema = ComponentSchema::new("Input")
            .with_prop(PropertyDescriptor::plain("type", "String"));
        let src = source(&schema);
        assert!(src.contains("pub fn r#type(&self) -> &String"));
        assert!(src.contains("pub fn set_type(&mut self, r#type: String)"));
        assert!(src.contains("#[serde(rename = \"type\")]\n    r#type: String,"));
    }

    #[test]
    fn test_empty_component() {
        let src = source(&ComponentSchema::new("Spacer"));
        assert!(src.contains("pub fn new() -> Result<"));
        assert!(src.contains("pub struct SpacerState {}"));
        assert!(src.contains("Vec::new().into_iter()"));
        assert!(!src.contains("state_mut"));
        assert!(!src.contains("match event"));
    }

    #[test]
    fn test_custom_runtime_path() {
        let config = RustConfig {
            runtime_path: "crate::rt".to_string(),
        };
        let src = compile_component(&button(), &config).unwrap().source;
        assert!(src.contains("impl crate::rt::Component for Button"));
        assert!(!src.contains("::propwire_runtime::Component for"));
    }

    #[test]
    fn test_invalid_schema_is_rejected() {
        let schema = button().with_required("missing");
        let err = compile_component(&schema, &RustConfig::default()).unwrap_err();
        assert!(matches!(err, CodegenError::Schema(_)), "{err}");
    }

    #[test]
    fn test_module_output() {
        let output = compile_module(
            &[button(), ComponentSchema::new("IconView")],
            &RustConfig::default(),
        )
        .unwrap();

        assert!(output.mod_rs.contains("pub mod button;\npub mod icon_view;"));
        assert!(output.mod_rs.contains("pub use icon_view::{IconView, IconViewState};"));
        assert!(output.mod_rs.contains("    Button::register(registry);"));

        let single = output.single_file();
        assert!(single.contains("pub mod button {\n    // @generated"));
        assert!(single.contains("pub use button::{Button, ButtonState};"));
        assert!(single.contains("pub fn register_all("));
        assert!(!single.contains("pub mod button;"));
    }

    #[test]
    fn test_module_rejects_duplicates() {
        let err = compile_module(&[button(), button()], &RustConfig::default()).unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateComponent(_)), "{err}");

        let err = compile_module(
            &[ComponentSchema::new("ButtonState"), button()],
            &RustConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateComponent(_)), "{err}");
    }

    #[test]
    fn test_empty_module_registry_param_is_unused() {
        let output = compile_module(&[], &RustConfig::default()).unwrap();
        assert!(output.mod_rs.contains("pub fn register_all(_registry:"));
    }
}
