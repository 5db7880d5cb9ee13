use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("{component} has no handler registered for '{event}'")]
    HandlerAbsent {
        component: &'static str,
        event: String,
    },

    #[error("{component} does not route event '{event}'")]
    UnknownEvent {
        component: &'static str,
        event: String,
    },

    #[error("Attaching {component} here would make it its own ancestor")]
    ReparentCycle { component: &'static str },

    #[error("{component} is already attached to another parent")]
    AlreadyAttached { component: &'static str },

    #[error("{component} was not created through propwire_runtime::bind")]
    Unbound { component: &'static str },

    #[error("Component is already borrowed while {operation}")]
    Busy { operation: &'static str },

    #[error("No renderer registered for component type '{0}'")]
    UnknownComponentType(String),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
