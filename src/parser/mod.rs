//! Parser module - platform payload parsing and parameter extraction.
//!
//! Provides:
//! - [`PayloadParser`] - the field-access contract every platform parser satisfies
//! - [`GoogleAssistantParser`] - parser for Google Assistant webhook payloads
//! - [`GetOptions`] / [`Param`] - typed parameter extraction (globbing, number coercion)
//!
//! Parsers resolve everything they expose at construction into an owned
//! snapshot. The caller's payload is never mutated and later changes to it are
//! not observed.
//!
//! # Example
//!
//! ```
//! use assistant_webhook::parser::{self, GetOptions, Param};
//! use serde_json::json;
//!
//! let payload = json!({
//!     "result": {"action": "order", "parameters": {"count": "thirty-three"}},
//!     "originalRequest": {"data": {}}
//! });
//!
//! let parser = parser::from_payload(&payload).unwrap();
//! assert_eq!(parser.action(), "order");
//! assert_eq!(
//!     parser.get("count", GetOptions::new().number()).unwrap(),
//!     Some(Param::Number(33))
//! );
//! ```

mod google;
mod number;
mod params;

pub use google::{GoogleAssistantParser, AUDIO_CAPABILITY, SCREEN_CAPABILITY};
pub use number::parse_number;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AssistantError, Result};

/// Assistant platforms a payload may originate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Google Assistant (Actions on Google via API.AI).
    Google,
}

impl Platform {
    /// Known platforms, in the order parser construction is attempted.
    pub const ALL: &'static [Platform] = &[Platform::Google];

    /// Platform tag used in rendered widgets.
    pub fn name(self) -> &'static str {
        match self {
            Platform::Google => "google",
        }
    }

    /// Try to build this platform's parser for the payload.
    fn parser(self, payload: &Value) -> Option<Box<dyn PayloadParser>> {
        match self {
            Platform::Google => GoogleAssistantParser::from_payload(payload)
                .map(|p| Box::new(p) as Box<dyn PayloadParser>),
        }
    }
}

/// Build a parser for the first platform whose shape the payload matches.
///
/// Returns `None` if no known platform accepts the payload.
pub fn from_payload(payload: &Value) -> Option<Box<dyn PayloadParser>> {
    Platform::ALL
        .iter()
        .find_map(|platform| platform.parser(payload))
}

/// Target type for parameter coercion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamType {
    /// Leave the value as text.
    #[default]
    String,
    /// Coerce digits, ordinals and number words to integers.
    Number,
}

/// Options for [`PayloadParser::get`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Collect `key`, `key2`, `key3`... into one ordered list.
    pub globbing: bool,
    /// Coercion applied to each value.
    pub kind: ParamType,
}

impl GetOptions {
    /// Plain lookup: no globbing, text values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable key globbing.
    pub fn globbing(mut self, globbing: bool) -> Self {
        self.globbing = globbing;
        self
    }

    /// Set the coercion type.
    pub fn kind(mut self, kind: ParamType) -> Self {
        self.kind = kind;
        self
    }

    /// Shorthand for `kind(ParamType::Number)`.
    pub fn number(self) -> Self {
        self.kind(ParamType::Number)
    }
}

/// A parameter value extracted from a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Single text value.
    Text(String),
    /// List of text values (platform list or globbed keys).
    TextList(Vec<String>),
    /// Single integer.
    Number(i64),
    /// List of integers.
    NumberList(Vec<i64>),
}

impl Param {
    /// Get the text value, if this is a single text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Param::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer, if this is a single number.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Param::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the text list, if this is a list of text values.
    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            Param::TextList(items) => Some(items),
            _ => None,
        }
    }

    /// Get the integer list, if this is a list of numbers.
    pub fn as_number_list(&self) -> Option<&[i64]> {
        match self {
            Param::NumberList(items) => Some(items),
            _ => None,
        }
    }
}

/// An output context the platform should carry into the next turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    /// Context name.
    pub name: String,
    /// Context parameters.
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Remaining number of turns the context stays active.
    #[serde(default)]
    pub lifespan: u32,
}

/// Identity of the user talking to the assistant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    /// Display name, if the platform shared it.
    pub name: Option<String>,
    /// Platform user ID.
    pub id: Option<String>,
}

/// Field-access contract for one platform's webhook payload.
///
/// Implementors supply the payload-shape-specific pieces; parameter
/// extraction and context lookup are shared.
pub trait PayloadParser: Send + Sync {
    /// Platform this parser handles.
    fn platform(&self) -> Platform;

    /// Whether the payload carries everything needed for dispatch.
    fn is_valid(&self) -> bool;

    /// The action the platform recognized.
    fn action(&self) -> &str;

    /// Raw parameter mapping.
    fn parameters(&self) -> &Map<String, Value>;

    /// All context records, unmodified and in the order the platform
    /// supplied them.
    fn get_contexts(&self) -> &[Value];

    /// Whether the device can display visual output.
    fn has_screen_capability(&self) -> bool {
        false
    }

    /// Whether the device can play audio output.
    fn has_audio_capability(&self) -> bool {
        false
    }

    /// The user identity snapshot.
    fn user(&self) -> Result<&User> {
        Err(AssistantError::NotImplemented("user"))
    }

    /// Extract a parameter.
    ///
    /// Returns `Ok(None)` if the key (or, with globbing, every variant of it)
    /// is absent. Fails with [`AssistantError::Parse`] if a value cannot be
    /// coerced to the requested type.
    fn get(&self, key: &str, options: GetOptions) -> Result<Option<Param>> {
        params::extract(self.parameters(), key, options)
    }

    /// Parameters of the named context, or an empty mapping if the context
    /// is absent or carries no parameters.
    fn get_context(&self, name: &str) -> Map<String, Value> {
        self.get_contexts()
            .iter()
            .find(|c| c.get("name").and_then(Value::as_str) == Some(name))
            .and_then(|c| c.get("parameters"))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }
}
