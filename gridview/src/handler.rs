use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::trace;

use crate::error::GridError;

/// Event name for activation (click, Enter).
pub const ON_ACTIVATE: &str = "on_activate";

/// An element event handler.
pub type Handler = Arc<dyn Fn() + Send + Sync>;

/// Registry of handlers keyed by `(element_id, event)`.
///
/// Widgets register handlers while building their element tree; the host
/// looks them up when input lands on an element. Clear it at the start of
/// every render pass so stale handlers from the previous tree don't linger.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: Arc<RwLock<HashMap<(String, String), Handler>>>,
}

impl HandlerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an element event, replacing any previous one.
    pub fn register(&self, element_id: &str, event: &str, handler: Handler) {
        if let Ok(mut handlers) = self.handlers.write() {
            handlers.insert((element_id.to_string(), event.to_string()), handler);
        }
    }

    /// Get a handler for an element event.
    pub fn get(&self, element_id: &str, event: &str) -> Option<Handler> {
        self.handlers
            .read()
            .ok()?
            .get(&(element_id.to_string(), event.to_string()))
            .cloned()
    }

    /// Run the handler for an element event.
    ///
    /// The registry lock is released before the handler runs, so a handler
    /// may register or clear handlers itself.
    pub fn invoke(&self, element_id: &str, event: &str) -> Result<(), GridError> {
        let handler = self.get(element_id, event).ok_or_else(|| GridError::NoHandler {
            element_id: element_id.to_string(),
            event: event.to_string(),
        })?;
        trace!("Dispatching {} on {}", event, element_id);
        handler();
        Ok(())
    }

    /// Shorthand for `invoke(element_id, ON_ACTIVATE)`.
    pub fn activate(&self, element_id: &str) -> Result<(), GridError> {
        self.invoke(element_id, ON_ACTIVATE)
    }

    /// Clear all handlers.
    pub fn clear(&self) {
        if let Ok(mut handlers) = self.handlers.write() {
            handlers.clear();
        }
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.read().map(|h| h.len()).unwrap_or(0)
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.len())
            .finish()
    }
}
