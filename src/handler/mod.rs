//! Handler module - intent handling and dispatch.
//!
//! Provides:
//! - [`IntentRegistry`] - maps action names to handlers
//! - [`Agent`] - per-request state handlers use to build the reply
//!
//! # Example
//!
//! ```ignore
//! use assistant_webhook::handler::{Agent, IntentRegistry};
//! use assistant_webhook::parser::GetOptions;
//!
//! let mut registry = IntentRegistry::new();
//!
//! // Reply and end the conversation
//! registry.register("greet", |agent| agent.tell_raw("Hello!", None));
//!
//! // Read a number and ask a follow-up
//! registry.register("order", |agent| {
//!     let count = agent.get("count", GetOptions::new().number())?;
//!     agent.ask_raw(&format!("{:?} pizzas, anything else?", count), None)
//! });
//! ```

mod context;
mod registry;

pub use context::Agent;
pub use registry::{Handler, HandlerResult, IntentRegistry};
