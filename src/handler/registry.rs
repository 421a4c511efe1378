//! Intent registry for dispatching requests by action name.
//!
//! The registry maps action names to handlers. It is filled while the
//! assistant is being built and only read while requests are processed.
//!
//! # Example
//!
//! ```ignore
//! use assistant_webhook::handler::{Agent, IntentRegistry};
//!
//! let mut registry = IntentRegistry::new();
//!
//! registry.register("greet", |agent: &mut Agent| agent.tell_raw("Hello!", None));
//!
//! assert!(registry.contains("greet"));
//! ```

use std::collections::HashMap;

use super::Agent;
use crate::error::Result;

/// Result type for handler functions.
pub type HandlerResult = Result<()>;

/// Trait for intent handlers.
pub trait Handler: Send + Sync + 'static {
    /// Handle a request, building the reply on the agent.
    fn call(&self, agent: &mut Agent) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&mut Agent) -> HandlerResult + Send + Sync + 'static,
{
    fn call(&self, agent: &mut Agent) -> HandlerResult {
        self(agent)
    }
}

/// Registry mapping action names to handlers.
#[derive(Default)]
pub struct IntentRegistry {
    /// Handlers by action name.
    handlers: HashMap<String, Box<dyn Handler>>,
}

impl IntentRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an action.
    ///
    /// Registering an action twice replaces the earlier handler. Returns
    /// `true` if a handler was replaced.
    pub fn register<F>(&mut self, action: &str, handler: F) -> bool
    where
        F: Fn(&mut Agent) -> HandlerResult + Send + Sync + 'static,
    {
        let replaced = self
            .handlers
            .insert(action.to_string(), Box::new(handler))
            .is_some();
        if replaced {
            tracing::warn!("Handler for action '{}' replaced by a later registration", action);
        }
        replaced
    }

    /// Get a handler by action name.
    pub fn get_handler(&self, action: &str) -> Option<&dyn Handler> {
        self.handlers.get(action).map(|h| h.as_ref())
    }

    /// Check if an action has a handler.
    pub fn contains(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    /// Registered action names, in no particular order.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no action is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssistantError;

    #[test]
    fn test_register_intent() {
        let mut registry = IntentRegistry::new();

        let replaced = registry.register("foo", |_agent| Ok(()));

        assert!(!replaced);
        assert!(registry.contains("foo"));
        assert!(registry.get_handler("foo").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_handler_not_found() {
        let registry = IntentRegistry::new();

        assert!(registry.is_empty());
        assert!(registry.get_handler("nonexistent").is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = IntentRegistry::new();

        registry.register("foo", |agent| agent.tell_raw("first", None));
        let replaced = registry.register("foo", |agent| agent.tell_raw("second", None));
        assert!(replaced);
        assert_eq!(registry.len(), 1);

        let mut agent = Agent::new();
        registry.get_handler("foo").unwrap().call(&mut agent).unwrap();
        assert_eq!(agent.response().messages()[1]["displayText"], "second");
    }

    #[test]
    fn test_handler_error_is_returned() {
        let mut registry = IntentRegistry::new();
        registry.register("fail", |_agent| Err(AssistantError::handler("boom")));

        let mut agent = Agent::new();
        let result = registry.get_handler("fail").unwrap().call(&mut agent);
        assert!(matches!(result, Err(AssistantError::Handler(_))));
    }

    #[test]
    fn test_actions() {
        let mut registry = IntentRegistry::new();
        registry.register("a", |_agent| Ok(()));
        registry.register("b", |_agent| Ok(()));

        let mut actions: Vec<&str> = registry.actions().collect();
        actions.sort();
        assert_eq!(actions, vec!["a", "b"]);
    }
}
