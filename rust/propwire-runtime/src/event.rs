use crate::component::ComponentRef;
use crate::error::RuntimeError;
use serde_json::Value;
use std::rc::Rc;
use tracing::debug;

/// Positional arguments of a client-originated event.
pub type Args = [Value];

/// Server-side callback for a client event.
pub type Handler = Rc<dyn Fn(&Args)>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Args) + 'static,
{
    Rc::new(f)
}

/// Route a client event to the handler registered under `event`.
///
/// Fails with [`RuntimeError::HandlerAbsent`] when the component routes
/// `event` but currently has no handler for it, and with
/// [`RuntimeError::UnknownEvent`] when it does not route `event` at all.
///
/// The component borrow is released before the handler runs, so handlers are
/// free to mutate the component that received the event.
pub fn dispatch(component: &ComponentRef, event: &str, args: &Args) -> Result<(), RuntimeError> {
    let handler = {
        let borrowed = component.try_borrow().map_err(|_| RuntimeError::Busy {
            operation: "dispatching an event",
        })?;
        if !borrowed.core().has_function(event) {
            // A routed event without a handler is reported as such.
            return Err(match borrowed.route(event) {
                Err(absent @ RuntimeError::HandlerAbsent { .. }) => absent,
                _ => RuntimeError::UnknownEvent {
                    component: borrowed.component_type(),
                    event: event.to_string(),
                },
            });
        }
        debug!(
            component = borrowed.component_type(),
            event,
            args = args.len(),
            "dispatching event"
        );
        borrowed.route(event)?
    };
    handler(args);
    Ok(())
}
