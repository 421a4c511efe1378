//! Google Assistant payload parser.
//!
//! Expected payload shape:
//!
//! ```text
//! {
//!   "result": {
//!     "action": "...",
//!     "parameters": {...},
//!     "contexts": [{"name": "...", "parameters": {...}, "lifespan": 5}]
//!   },
//!   "originalRequest": {
//!     "data": {
//!       "surface": {"capabilities": [{"name": "actions.capability.SCREEN_OUTPUT"}]},
//!       "user": {"userName": "...", "userId": "..."}
//!     }
//!   }
//! }
//! ```

use serde_json::{Map, Value};

use super::{PayloadParser, Platform, User};
use crate::error::Result;

/// Capability name announced by devices with a display.
pub const SCREEN_CAPABILITY: &str = "actions.capability.SCREEN_OUTPUT";

/// Capability name announced by devices with a speaker.
pub const AUDIO_CAPABILITY: &str = "actions.capability.AUDIO_OUTPUT";

/// Parser for Google Assistant webhook payloads.
///
/// Holds an owned snapshot of every field it exposes, taken when the parser is
/// built.
#[derive(Debug, Clone)]
pub struct GoogleAssistantParser {
    valid: bool,
    action: String,
    parameters: Map<String, Value>,
    contexts: Vec<Value>,
    capabilities: Vec<String>,
    user: User,
}

impl GoogleAssistantParser {
    /// Build a parser from a payload.
    ///
    /// Returns `None` if the payload lacks the `result` or `originalRequest`
    /// objects, or if its contexts are malformed.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let result = payload.get("result")?.as_object()?;
        let original = payload.get("originalRequest")?.as_object()?;

        let contexts = match result.get("contexts") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) if items.iter().all(is_context) => items.clone(),
            Some(raw) => {
                tracing::debug!("Rejecting payload with malformed contexts: {}", raw);
                return None;
            }
        };

        let action = result.get("action").and_then(Value::as_str);
        let data = original.get("data");

        let capabilities = data
            .and_then(|d| d.pointer("/surface/capabilities"))
            .and_then(Value::as_array)
            .map(|caps| {
                caps.iter()
                    .filter_map(|c| c.get("name").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let user_field = |field: &str| {
            data.and_then(|d| d.get("user"))
                .and_then(|u| u.get(field))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Some(Self {
            valid: !result.is_empty() && !original.is_empty() && action.is_some(),
            action: action.unwrap_or_default().to_string(),
            parameters: result
                .get("parameters")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            contexts,
            capabilities,
            user: User {
                name: user_field("userName"),
                id: user_field("userId"),
            },
        })
    }

    /// Capability names announced by the device.
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    fn has_capability(&self, name: &str) -> bool {
        self.capabilities.iter().any(|c| c == name)
    }
}

/// A context record is an object with a string `name`.
fn is_context(value: &Value) -> bool {
    value.get("name").is_some_and(Value::is_string)
}

impl PayloadParser for GoogleAssistantParser {
    fn platform(&self) -> Platform {
        Platform::Google
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn action(&self) -> &str {
        &self.action
    }

    fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }

    fn get_contexts(&self) -> &[Value] {
        &self.contexts
    }

    fn has_screen_capability(&self) -> bool {
        self.has_capability(SCREEN_CAPABILITY)
    }

    fn has_audio_capability(&self) -> bool {
        self.has_capability(AUDIO_CAPABILITY)
    }

    fn user(&self) -> Result<&User> {
        Ok(&self.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{GetOptions, Param};
    use serde_json::json;

    fn dummy_request() -> Value {
        json!({
            "result": {
                "action": "",
                "parameters": {},
                "contexts": []
            },
            "originalRequest": {
                "data": {
                    "surface": {"capabilities": []}
                }
            }
        })
    }

    #[test]
    fn test_action() {
        let mut request = dummy_request();
        request["result"]["action"] = json!("foobar");

        let parser = GoogleAssistantParser::from_payload(&request).unwrap();
        assert_eq!(parser.action(), "foobar");
        assert!(parser.is_valid());
    }

    #[test]
    fn test_requires_both_sections() {
        assert!(GoogleAssistantParser::from_payload(&json!({"result": {}})).is_none());
        assert!(GoogleAssistantParser::from_payload(&json!({"originalRequest": {}})).is_none());
        assert!(
            GoogleAssistantParser::from_payload(&json!({"result": [], "originalRequest": {}}))
                .is_none()
        );
    }

    #[test]
    fn test_empty_sections_are_invalid() {
        let parser =
            GoogleAssistantParser::from_payload(&json!({"result": {}, "originalRequest": {}}))
                .unwrap();
        assert!(!parser.is_valid());
        assert_eq!(parser.action(), "");
    }

    #[test]
    fn test_parameters() {
        let mut request = dummy_request();
        request["result"]["parameters"] = json!({
            "given-name": "Zack",
            "given-name2": "Alberto",
            "given-name3": "Dom",
            "ordinal": "33rd",
            "number": "thirty-three",
            "other-ordinal": "thirty third",
            "number-list": ["2nd", "second"]
        });

        let parser = GoogleAssistantParser::from_payload(&request).unwrap();
        let number = GetOptions::new().number();

        assert_eq!(
            parser.get("given-name", GetOptions::new()).unwrap(),
            Some(Param::Text("Zack".into()))
        );
        assert_eq!(
            parser
                .get("given-name", GetOptions::new().globbing(true))
                .unwrap(),
            Some(Param::TextList(vec![
                "Zack".into(),
                "Alberto".into(),
                "Dom".into()
            ]))
        );
        assert_eq!(parser.get("ordinal", number).unwrap(), Some(Param::Number(33)));
        assert_eq!(parser.get("number", number).unwrap(), Some(Param::Number(33)));
        assert_eq!(
            parser.get("other-ordinal", number).unwrap(),
            Some(Param::Number(33))
        );
        assert_eq!(
            parser.get("number-list", number).unwrap(),
            Some(Param::NumberList(vec![2, 2]))
        );
    }

    #[test]
    fn test_get_is_idempotent() {
        let mut request = dummy_request();
        request["result"]["parameters"] = json!({"number": "thirty-three"});
        let parser = GoogleAssistantParser::from_payload(&request).unwrap();

        let first = parser.get("number", GetOptions::new().number()).unwrap();
        let second = parser.get("number", GetOptions::new().number()).unwrap();
        assert_eq!(first, second);
        assert_eq!(parser.parameters()["number"], json!("thirty-three"));
    }

    #[test]
    fn test_contexts() {
        let contexts = json!([
            {"name": "c1", "parameters": {"foo": "bar"}, "lifespan": 5},
            {"name": "c2", "parameters": {"bar": "foo"}, "lifespan": 5},
            {"name": "c3", "parameters": {"foobar": 42}, "lifespan": 5}
        ]);
        let mut request = dummy_request();
        request["result"]["contexts"] = contexts.clone();

        let parser = GoogleAssistantParser::from_payload(&request).unwrap();
        assert_eq!(parser.get_contexts(), contexts.as_array().unwrap().as_slice());
        assert_eq!(Value::Object(parser.get_context("c1")), json!({"foo": "bar"}));
        assert!(parser.get_context("c4").is_empty());
    }

    #[test]
    fn test_contexts_are_kept_as_supplied() {
        let contexts = json!([
            {"name": "c1", "parameters": {"foo": "bar"}},
            {"name": "c2", "parameters": null, "lifespan": 1, "source": "agent"}
        ]);
        let mut request = dummy_request();
        request["result"]["contexts"] = contexts.clone();

        let parser = GoogleAssistantParser::from_payload(&request).unwrap();
        assert_eq!(parser.get_contexts(), contexts.as_array().unwrap().as_slice());
        assert!(parser.get_contexts()[0].get("lifespan").is_none());
        assert_eq!(Value::Object(parser.get_context("c1")), json!({"foo": "bar"}));
        assert!(parser.get_context("c2").is_empty());
    }

    #[test]
    fn test_malformed_contexts_reject_payload() {
        let mut request = dummy_request();
        request["result"]["contexts"] = json!([{"parameters": {}}]);
        assert!(GoogleAssistantParser::from_payload(&request).is_none());

        request["result"]["contexts"] = json!({"name": "c1"});
        assert!(GoogleAssistantParser::from_payload(&request).is_none());
    }

    #[test]
    fn test_capabilities() {
        let mut request = dummy_request();
        request["originalRequest"]["data"]["surface"]["capabilities"] = json!([
            {"name": "actions.capability.AUDIO_OUTPUT"},
            {"name": "actions.capability.SCREEN_OUTPUT"}
        ]);
        let parser = GoogleAssistantParser::from_payload(&request).unwrap();
        assert!(parser.has_screen_capability());
        assert!(parser.has_audio_capability());
        assert_eq!(parser.capabilities().len(), 2);

        request["originalRequest"]["data"]["surface"]["capabilities"] = json!([]);
        let parser = GoogleAssistantParser::from_payload(&request).unwrap();
        assert!(!parser.has_screen_capability());
        assert!(!parser.has_audio_capability());

        request["originalRequest"]["data"] = json!({});
        let parser = GoogleAssistantParser::from_payload(&request).unwrap();
        assert!(!parser.has_screen_capability());
        assert!(!parser.has_audio_capability());

        request["originalRequest"] = json!({"source": "google"});
        let parser = GoogleAssistantParser::from_payload(&request).unwrap();
        assert!(!parser.has_screen_capability());
    }

    #[test]
    fn test_user_snapshot() {
        let mut request = dummy_request();
        request["originalRequest"]["data"]["user"] = json!({
            "userName": "foo",
            "userId": "bar"
        });

        let parser = GoogleAssistantParser::from_payload(&request).unwrap();
        assert_eq!(parser.user().unwrap().name.as_deref(), Some("foo"));
        assert_eq!(parser.user().unwrap().id.as_deref(), Some("bar"));

        request["originalRequest"]["data"]["user"]["userName"] = json!("oof");
        assert_eq!(parser.user().unwrap().name.as_deref(), Some("foo"));
    }

    #[test]
    fn test_missing_user() {
        let parser = GoogleAssistantParser::from_payload(&dummy_request()).unwrap();
        assert_eq!(parser.user().unwrap(), &User::default());
    }
}
