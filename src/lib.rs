//! # assistant-webhook
//!
//! Request dispatch and response construction for voice-assistant webhooks.
//!
//! This crate takes the intent-recognition payload an assistant platform
//! posts to a webhook, validates it, routes it to the handler registered for
//! the recognized action, and lets the handler build a multi-message reply
//! that is encoded back into the platform's wire format.
//!
//! ## Architecture
//!
//! - **Parser**: normalizes one platform payload (action, parameters,
//!   contexts, capabilities, user)
//! - **Agent**: per-request state handed to handlers (parser, reply, status)
//! - **Response**: ordered reply messages rendered from validated widgets
//! - **Assistant**: validation gates and action → handler dispatch
//!
//! HTTP transport is left to the embedding application: it hands the JSON
//! body and headers to [`Assistant::process`] and answers with
//! [`Response::to_json`] or the status code of [`Agent::status`].
//!
//! ## Example
//!
//! ```
//! use assistant_webhook::{Assistant, GetOptions, Param};
//! use serde_json::json;
//!
//! let assistant = Assistant::builder()
//!     .intent("order.pizza", |agent| {
//!         let count = agent
//!             .get("count", GetOptions::new().number())?
//!             .and_then(|p| p.as_number())
//!             .unwrap_or(1);
//!         agent.tell_raw(&format!("{} pizzas on their way!", count), None)
//!     })
//!     .build();
//!
//! let payload = json!({
//!     "result": {"action": "order.pizza", "parameters": {"count": "three"}},
//!     "originalRequest": {"data": {}}
//! });
//!
//! let agent = assistant.process(&payload, None).unwrap();
//! let reply = agent.response().to_json();
//! assert_eq!(reply["messages"][1]["displayText"], "3 pizzas on their way!");
//! ```

pub mod corpus;
pub mod error;
pub mod handler;
pub mod parser;
pub mod response;

mod assistant;
mod status;

pub use assistant::{
    Assistant, AssistantBuilder, AssistantConfig, Headers, DEFAULT_MAGIC_KEY_HEADER,
    MSG_ACCESS_DENIED, MSG_INVALID_DATA, MSG_INVALID_PARSER, MSG_UNKNOWN_ACTION,
};
pub use corpus::Corpus;
pub use error::{AssistantError, Result};
pub use handler::{Agent, HandlerResult};
pub use parser::{GetOptions, Param, ParamType, PayloadParser};
pub use response::Response;
pub use status::Status;
