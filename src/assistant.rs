//! Assistant builder and dispatch pipeline.
//!
//! The [`AssistantBuilder`] provides a fluent API for registering intent
//! handlers and configuring the assistant. The [`Assistant`] runs each
//! request through the pipeline:
//! 1. Build the payload parser
//! 2. Check the payload carries the fields dispatch needs
//! 3. Verify the shared secret header (if configured)
//! 4. Resolve the action to a handler
//! 5. Run the handler
//!
//! Steps 1-4 are gates: the first one that fails records a [`Status`] and
//! message on the agent and the handler never runs.
//!
//! # Example
//!
//! ```
//! use assistant_webhook::{Assistant, Status};
//! use serde_json::json;
//!
//! let assistant = Assistant::builder()
//!     .intent("greet", |agent| agent.tell_raw("Hello!", None))
//!     .build();
//!
//! let payload = json!({
//!     "result": {"action": "greet", "parameters": {}},
//!     "originalRequest": {"data": {}}
//! });
//!
//! let agent = assistant.process(&payload, None).unwrap();
//! assert_eq!(agent.status(), Some(Status::Ok));
//! assert_eq!(agent.response().messages().len(), 2);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::corpus::Corpus;
use crate::error::Result;
use crate::handler::{Agent, Handler, HandlerResult, IntentRegistry};
use crate::status::Status;

/// Default name of the shared secret header.
pub const DEFAULT_MAGIC_KEY_HEADER: &str = "magic-key";

/// Request headers, as delivered by the transport.
pub type Headers = HashMap<String, String>;

/// Message recorded when no platform parser accepts the payload.
pub const MSG_INVALID_PARSER: &str = "Could not instantiate parser";
/// Message recorded when the payload lacks fields needed for dispatch.
pub const MSG_INVALID_DATA: &str = "Could not validate data";
/// Message recorded when the shared secret does not match.
pub const MSG_ACCESS_DENIED: &str = "Could not verify request";
/// Message recorded when no handler is registered for the action.
pub const MSG_UNKNOWN_ACTION: &str = "Could not understand action";

fn default_magic_key_header() -> String {
    DEFAULT_MAGIC_KEY_HEADER.to_string()
}

fn default_ssml() -> bool {
    true
}

/// Configuration for the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssistantConfig {
    /// Shared secret requests must carry. `None` disables the check.
    #[serde(default)]
    pub magic_key: Option<String>,
    /// Header carrying the shared secret (matched case-insensitively).
    #[serde(default = "default_magic_key_header")]
    pub magic_key_header: String,
    /// Render speech as SSML.
    #[serde(default = "default_ssml")]
    pub ssml: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            magic_key: None,
            magic_key_header: default_magic_key_header(),
            ssml: default_ssml(),
        }
    }
}

/// Builder for configuring and creating an assistant.
///
/// Use the fluent API to register intent handlers, then call `build()`.
pub struct AssistantBuilder {
    registry: IntentRegistry,
    config: AssistantConfig,
    corpus: Option<Arc<Corpus>>,
}

impl AssistantBuilder {
    /// Create a new assistant builder.
    pub fn new() -> Self {
        Self {
            registry: IntentRegistry::new(),
            config: AssistantConfig::default(),
            corpus: None,
        }
    }

    /// Register a handler for an action.
    ///
    /// A later registration for the same action replaces the earlier one.
    pub fn intent<F>(mut self, action: &str, handler: F) -> Self
    where
        F: Fn(&mut Agent) -> HandlerResult + Send + Sync + 'static,
    {
        self.registry.register(action, handler);
        self
    }

    /// Require requests to carry this shared secret.
    pub fn magic_key(mut self, key: impl Into<String>) -> Self {
        self.config.magic_key = Some(key.into());
        self
    }

    /// Set the header the shared secret is read from.
    ///
    /// Default: `magic-key`
    pub fn magic_key_header(mut self, header: impl Into<String>) -> Self {
        self.config.magic_key_header = header.into();
        self
    }

    /// Render speech as SSML or as plain text-to-speech.
    ///
    /// Default: `true`
    pub fn ssml(mut self, ssml: bool) -> Self {
        self.config.ssml = ssml;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: AssistantConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a phrase table for `Agent::tell` / `Agent::ask`.
    pub fn corpus(mut self, corpus: Corpus) -> Self {
        self.corpus = Some(Arc::new(corpus));
        self
    }

    /// Build the assistant.
    pub fn build(self) -> Assistant {
        Assistant {
            registry: self.registry,
            config: self.config,
            corpus: self.corpus,
        }
    }
}

impl Default for AssistantBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispatches webhook payloads to intent handlers.
///
/// The assistant holds no per-request state; share it behind an `Arc` to
/// process requests concurrently.
pub struct Assistant {
    /// Handlers by action name.
    registry: IntentRegistry,
    /// Assistant configuration.
    config: AssistantConfig,
    /// Phrase table shared with every agent.
    corpus: Option<Arc<Corpus>>,
}

impl Assistant {
    /// Create a new assistant builder.
    pub fn builder() -> AssistantBuilder {
        AssistantBuilder::new()
    }

    /// Register a handler for an action.
    ///
    /// Returns `true` if an earlier handler for the action was replaced.
    pub fn register<F>(&mut self, action: &str, handler: F) -> bool
    where
        F: Fn(&mut Agent) -> HandlerResult + Send + Sync + 'static,
    {
        self.registry.register(action, handler)
    }

    /// Get the intent registry.
    pub fn registry(&self) -> &IntentRegistry {
        &self.registry
    }

    /// Get the configuration.
    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Get the corpus, if one is attached.
    pub fn corpus(&self) -> Option<&Corpus> {
        self.corpus.as_deref()
    }

    /// Create the agent for a payload, configured like this assistant.
    pub fn agent(&self, payload: &Value) -> Agent {
        Agent::from_payload(payload)
            .with_corpus(self.corpus.clone())
            .with_ssml(self.config.ssml)
    }

    /// Run the validation gates on an agent.
    ///
    /// Returns `true` if every gate passed. On the first failing gate the
    /// status and message are recorded on the agent and `false` is returned.
    pub fn validate(&self, agent: &mut Agent, headers: Option<&Headers>) -> bool {
        self.resolve(agent, headers).is_some()
    }

    /// Process a payload.
    ///
    /// Validation failures are reported through the returned agent's status
    /// and message; its response then holds only the initial message.
    /// A failing handler aborts the request and its error is returned.
    pub fn process(&self, payload: &Value, headers: Option<&Headers>) -> Result<Agent> {
        let mut agent = self.agent(payload);

        let Some((action, handler)) = self.resolve(&mut agent, headers) else {
            return Ok(agent);
        };

        tracing::debug!("Dispatching action '{}'", action);

        if let Err(e) = handler.call(&mut agent) {
            tracing::error!("Handler error for action {}: {}", action, e);
            return Err(e);
        }

        agent.succeed();
        Ok(agent)
    }

    /// Run the gates in order and return the action with its handler.
    fn resolve(
        &self,
        agent: &mut Agent,
        headers: Option<&Headers>,
    ) -> Option<(String, &dyn Handler)> {
        let outcome = match agent.parser() {
            None => Err((Status::InvalidData, MSG_INVALID_PARSER)),
            Some(parser) if !parser.is_valid() => Err((Status::InvalidData, MSG_INVALID_DATA)),
            Some(_) if !self.verify(headers) => Err((Status::AccessDenied, MSG_ACCESS_DENIED)),
            Some(parser) => match self.registry.get_handler(parser.action()) {
                Some(handler) => Ok((parser.action().to_string(), handler)),
                None => Err((Status::InvalidData, MSG_UNKNOWN_ACTION)),
            },
        };

        match outcome {
            Ok(found) => Some(found),
            Err((status, message)) => {
                tracing::warn!("Rejecting request ({:?}): {}", status, message);
                agent.fail(status, message);
                None
            }
        }
    }

    /// Check the shared secret header. Passes when no secret is configured.
    fn verify(&self, headers: Option<&Headers>) -> bool {
        let expected = match &self.config.magic_key {
            Some(key) => key,
            None => return true,
        };

        headers
            .and_then(|headers| {
                headers
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(&self.config.magic_key_header))
            })
            .is_some_and(|(_, value)| value == expected)
    }
}

impl Default for Assistant {
    fn default() -> Self {
        Self::builder().build()
    }
}
