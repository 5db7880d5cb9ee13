use serde::{Deserialize, Serialize};

/// Declarative description of one UI component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSchema {
    /// Generated type name and client-side component type.
    pub name: String,
    pub props: Vec<PropertyDescriptor>,
    /// Properties the generated constructor takes, in parameter order.
    #[serde(default)]
    pub required: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Client-side property name.
    pub name: String,
    /// Declared Rust type, emitted verbatim.
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub is_function: bool,
    #[serde(default)]
    pub is_element: bool,
}

/// What a property turns into on the generated component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    /// A value mirrored into the state holder.
    Plain,
    /// A child component owned by this one.
    Element,
    /// A server-side handler for a client event.
    Function,
}

impl PropertyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKind::Plain => "plain",
            PropertyKind::Element => "element",
            PropertyKind::Function => "function",
        }
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PropertyDescriptor {
    pub fn plain(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            is_function: false,
            is_element: false,
        }
    }

    pub fn element(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            is_element: true,
            ..Self::plain(name, ty)
        }
    }

    pub fn function(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            is_function: true,
            ..Self::plain(name, ty)
        }
    }

    /// Function wins over element. Schemas with both flags never reach
    /// synthesis; see [`crate::validate`].
    pub fn kind(&self) -> PropertyKind {
        if self.is_function {
            PropertyKind::Function
        } else if self.is_element {
            PropertyKind::Element
        } else {
            PropertyKind::Plain
        }
    }

    /// Event name the client uses to reach this property's handler.
    pub fn event_name(&self) -> String {
        format!("{}Handler", self.name)
    }
}

impl ComponentSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            props: Vec::new(),
            required: Vec::new(),
        }
    }

    pub fn with_prop(mut self, prop: PropertyDescriptor) -> Self {
        self.props.push(prop);
        self
    }

    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    pub fn prop(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.props.iter().find(|p| p.name == name)
    }

    pub fn props_of(&self, kind: PropertyKind) -> impl Iterator<Item = &PropertyDescriptor> {
        self.props.iter().filter(move |p| p.kind() == kind)
    }

    /// Required descriptors in declaration order, which is constructor
    /// parameter order. Names without a descriptor are skipped; validation
    /// reports them.
    pub fn required_props(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.props
            .iter()
            .filter(|p| self.required.iter().any(|name| *name == p.name))
    }
}
