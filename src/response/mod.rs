//! Response module - ordered reply accumulation and wire encoding.
//!
//! Provides:
//! - [`Response`] - append-only list of rendered fragments plus reply flags
//! - [`widgets`] - validated reply fragments ([`SimpleResponseWidget`], ...)
//!
//! # Example
//!
//! ```
//! use assistant_webhook::response::{Response, SimpleResponseWidget};
//!
//! let mut response = Response::new();
//! response.add_widget(&SimpleResponseWidget::new(Some("Hi!"), None, true).unwrap());
//!
//! assert_eq!(response.messages().len(), 2);
//! assert_eq!(response.messages()[0], Response::initial_message());
//! ```

pub mod widgets;

pub use widgets::{
    ssml_format, BasicCardWidget, Button, Image, LinkOutChipWidget, SimpleResponseWidget,
    SuggestionsWidget, Widget,
};

use serde_json::{json, Value};

use crate::error::Result;
use crate::parser::ContextEntry;

/// Reply under construction for one request.
///
/// Messages keep their insertion order, which is the order they are sent in.
/// The first message is always [`Response::initial_message`].
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    messages: Vec<Value>,
    context_out: Vec<ContextEntry>,
    expect_user_response: bool,
    is_ssml: bool,
}

impl Response {
    /// Create a response holding only the initial message.
    pub fn new() -> Self {
        Self {
            messages: vec![Self::initial_message()],
            context_out: Vec::new(),
            expect_user_response: false,
            is_ssml: true,
        }
    }

    /// Fixed first message of every response.
    pub fn initial_message() -> Value {
        json!({ "type": 0, "speech": "" })
    }

    /// Append an already rendered message.
    pub fn add_message(&mut self, message: Value) {
        self.messages.push(message);
    }

    /// Render a widget and append it.
    pub fn add_widget<W: Widget + ?Sized>(&mut self, widget: &W) {
        self.add_message(widget.render());
    }

    /// Messages in wire order, initial message first.
    pub fn messages(&self) -> &[Value] {
        &self.messages
    }

    /// Add a context the platform should carry into the next turn.
    pub fn add_context(&mut self, context: ContextEntry) {
        self.context_out.push(context);
    }

    /// Contexts to send back, in insertion order.
    pub fn context_out(&self) -> &[ContextEntry] {
        &self.context_out
    }

    /// Whether the conversation stays open for the user's answer.
    pub fn expect_user_response(&self) -> bool {
        self.expect_user_response
    }

    /// Keep the conversation open (or close it) after this reply.
    pub fn set_expect_user_response(&mut self, expect: bool) {
        self.expect_user_response = expect;
    }

    /// Whether speech is SSML.
    pub fn is_ssml(&self) -> bool {
        self.is_ssml
    }

    /// Mark speech as SSML or plain text.
    pub fn set_ssml(&mut self, ssml: bool) {
        self.is_ssml = ssml;
    }

    /// Speech of the first simple response, used as the fallback `speech`
    /// field for platforms that ignore rich messages.
    fn fallback_speech(&self) -> &str {
        self.messages
            .iter()
            .filter(|m| m["type"] == "simple_response")
            .find_map(|m| {
                if let Some(tts) = m.get("textToSpeech").and_then(Value::as_str) {
                    return Some(tts);
                }
                m.get("ssml").and_then(Value::as_str).map(|ssml| {
                    ssml.strip_prefix("<speak>")
                        .and_then(|s| s.strip_suffix("</speak>"))
                        .unwrap_or(ssml)
                })
            })
            .unwrap_or("")
    }

    /// Encode the response to its wire record.
    pub fn to_json(&self) -> Value {
        json!({
            "speech": self.fallback_speech(),
            "messages": self.messages,
            "contextOut": self.context_out,
            "data": {
                "google": {
                    "expect_user_response": self.expect_user_response,
                    "is_ssml": self.is_ssml
                }
            }
        })
    }

    /// Encode the response to a JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json())?)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
