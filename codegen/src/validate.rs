//! Schema checks run before synthesis.
//!
//! Synthesis assumes a well-formed schema and would otherwise emit code that
//! fails to compile or silently picks one branch. Every violation is
//! collected so a single run reports all of them.

use crate::naming::{is_identifier, is_unusable, member_name};
use crate::schema::{ComponentSchema, PropertyKind};
use std::collections::{HashMap, HashSet};

/// Method names the generator emits on every component.
pub const RESERVED_METHODS: &[&str] = &[
    "new",
    "detached",
    "state",
    "state_mut",
    "register",
    "component_type",
    "core",
    "core_mut",
    "state_snapshot",
    "current_state",
    "children",
    "route",
];

/// Field names the generator emits on every component.
pub const RESERVED_FIELDS: &[&str] = &["core", "state"];

/// Prefix of the locals generated method bodies declare (`__this`, `__state`).
/// A parameter with this prefix could be shadowed by one of them.
pub const RESERVED_LOCAL_PREFIX: &str = "__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    EmptyComponentName,
    InvalidComponentName(String),
    InvalidPropertyName(String),
    ReservedPropertyName { property: String, member: String },
    EmptyType(String),
    ConflictingKinds(String),
    DuplicateProperty(String),
    UnknownRequired(String),
    DuplicateRequired(String),
    MemberCollision {
        member: String,
        first: String,
        second: String,
    },
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaViolation::EmptyComponentName => write!(f, "component name is empty"),
            SchemaViolation::InvalidComponentName(name) => write!(
                f,
                "component name '{}' must be an identifier starting with an uppercase letter",
                name
            ),
            SchemaViolation::InvalidPropertyName(name) => {
                write!(f, "property name '{}' is not a valid identifier", name)
            }
            SchemaViolation::ReservedPropertyName { property, member } => write!(
                f,
                "property '{}' would generate '{}', which is reserved",
                property, member
            ),
            SchemaViolation::EmptyType(name) => {
                write!(f, "property '{}' has an empty declared type", name)
            }
            SchemaViolation::ConflictingKinds(name) => write!(
                f,
                "property '{}' is marked as both a function and an element",
                name
            ),
            SchemaViolation::DuplicateProperty(name) => {
                write!(f, "property '{}' is declared more than once", name)
            }
            SchemaViolation::UnknownRequired(name) => {
                write!(f, "required property '{}' is not declared", name)
            }
            SchemaViolation::DuplicateRequired(name) => {
                write!(f, "required property '{}' is listed more than once", name)
            }
            SchemaViolation::MemberCollision {
                member,
                first,
                second,
            } => write!(
                f,
                "properties '{}' and '{}' both generate '{}'",
                first, second, member
            ),
        }
    }
}

/// All violations found in one component schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub component: String,
    pub violations: Vec<SchemaViolation>,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = if self.component.is_empty() {
            "<unnamed>"
        } else {
            &self.component
        };
        write!(f, "Invalid schema for {}", name)?;
        for violation in &self.violations {
            write!(f, "\n  - {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// Check a schema against everything synthesis relies on.
pub fn validate(schema: &ComponentSchema) -> Result<(), SchemaError> {
    let mut violations = Vec::new();

    validate_component_name(&schema.name, &mut violations);
    validate_props(schema, &mut violations);
    validate_required(schema, &mut violations);
    validate_members(schema, &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError {
            component: schema.name.clone(),
            violations,
        })
    }
}

fn validate_component_name(name: &str, violations: &mut Vec<SchemaViolation>) {
    if name.is_empty() {
        violations.push(SchemaViolation::EmptyComponentName);
        return;
    }
    let starts_upper = name.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    if !is_identifier(name) || !starts_upper || name == "Self" {
        violations.push(SchemaViolation::InvalidComponentName(name.to_string()));
    }
}

fn validate_props(schema: &ComponentSchema, violations: &mut Vec<SchemaViolation>) {
    let mut seen = HashSet::new();
    for prop in &schema.props {
        if !is_identifier(&prop.name) || is_unusable(&member_name(&prop.name)) {
            violations.push(SchemaViolation::InvalidPropertyName(prop.name.clone()));
        }
        if prop.ty.trim().is_empty() {
            violations.push(SchemaViolation::EmptyType(prop.name.clone()));
        }
        if prop.is_function && prop.is_element {
            violations.push(SchemaViolation::ConflictingKinds(prop.name.clone()));
        }
        if !seen.insert(prop.name.as_str()) {
            violations.push(SchemaViolation::DuplicateProperty(prop.name.clone()));
        }
    }
}

fn validate_required(schema: &ComponentSchema, violations: &mut Vec<SchemaViolation>) {
    let mut seen = HashSet::new();
    for name in &schema.required {
        if schema.prop(name).is_none() {
            violations.push(SchemaViolation::UnknownRequired(name.clone()));
        }
        if !seen.insert(name.as_str()) {
            violations.push(SchemaViolation::DuplicateRequired(name.clone()));
        }
    }
}

/// Members a property generates, per namespace.
pub(crate) struct GeneratedMembers {
    pub component_methods: Vec<String>,
    pub component_fields: Vec<String>,
    pub state_members: Vec<String>,
}

pub(crate) fn generated_members(name: &str, kind: PropertyKind) -> GeneratedMembers {
    let member = member_name(name);
    let setter = format!("set_{}", member);
    match kind {
        PropertyKind::Plain => GeneratedMembers {
            component_methods: vec![member.clone(), setter.clone()],
            component_fields: vec![],
            state_members: vec![member, setter],
        },
        PropertyKind::Element => {
            let tag = format!("{}_component_type", member);
            let tag_setter = format!("set_{}", tag);
            GeneratedMembers {
                component_methods: vec![member.clone(), setter.clone()],
                component_fields: vec![member.clone()],
                state_members: vec![member, setter, tag, tag_setter],
            }
        }
        PropertyKind::Function => GeneratedMembers {
            component_methods: vec![member.clone(), setter, format!("{}_handler", member)],
            component_fields: vec![member],
            state_members: vec![],
        },
    }
}

fn validate_members(schema: &ComponentSchema, violations: &mut Vec<SchemaViolation>) {
    let mut methods: HashMap<String, &str> = HashMap::new();
    let mut fields: HashMap<String, &str> = HashMap::new();
    let mut state: HashMap<String, &str> = HashMap::new();
    let mut reported = HashSet::new();

    for prop in &schema.props {
        let member = member_name(&prop.name);
        if member.starts_with(RESERVED_LOCAL_PREFIX) {
            violations.push(SchemaViolation::ReservedPropertyName {
                property: prop.name.clone(),
                member,
            });
        }

        let members = generated_members(&prop.name, prop.kind());

        for method in &members.component_methods {
            if RESERVED_METHODS.contains(&method.as_str()) {
                violations.push(SchemaViolation::ReservedPropertyName {
                    property: prop.name.clone(),
                    member: method.clone(),
                });
            }
        }
        for field in &members.component_fields {
            if RESERVED_FIELDS.contains(&field.as_str()) {
                violations.push(SchemaViolation::ReservedPropertyName {
                    property: prop.name.clone(),
                    member: field.clone(),
                });
            }
        }

        for (table, names) in [
            (&mut methods, members.component_methods),
            (&mut fields, members.component_fields),
            (&mut state, members.state_members),
        ] {
            for name in names {
                match table.get(&name) {
                    // Duplicate property names are reported on their own.
                    Some(first) if *first == prop.name => {}
                    Some(first) => {
                        if reported.insert((first.to_string(), prop.name.clone())) {
                            violations.push(SchemaViolation::MemberCollision {
                                member: name,
                                first: first.to_string(),
                                second: prop.name.clone(),
                            });
                        }
                    }
                    None => {
                        table.insert(name, prop.name.as_str());
                    }
                }
            }
        }
    }
}
