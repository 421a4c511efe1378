//! Per-request agent passed to intent handlers.
//!
//! Provides methods for building the reply:
//! - `tell_raw` / `ask_raw` - speak the given text
//! - `tell` / `ask` - speak a phrase picked from the corpus
//! - `suggest` - add suggestion chips
//! - `show` - add any widget
//! - `add_context` - carry a context into the next turn
//!
//! The `ask` variants keep the conversation open for the user's answer.
//!
//! # Example
//!
//! ```ignore
//! fn greet(agent: &mut Agent) -> HandlerResult {
//!     let name = agent.get("given-name", GetOptions::new())?;
//!     match name.as_ref().and_then(Param::as_str) {
//!         Some(name) => agent.tell_raw(&format!("Hello {}!", name), None),
//!         None => agent.ask_raw("What's your name?", None),
//!     }
//! }
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::corpus::Corpus;
use crate::error::{AssistantError, Result};
use crate::parser::{self, ContextEntry, GetOptions, Param, PayloadParser};
use crate::response::{Response, SimpleResponseWidget, SuggestionsWidget, Widget};
use crate::status::Status;

/// State of one request while it moves through the dispatch pipeline.
///
/// Owns the payload parser (absent if no platform accepted the payload) and
/// the reply under construction. `status` stays unset until the pipeline
/// finishes.
pub struct Agent {
    /// Parser for the request payload.
    parser: Option<Box<dyn PayloadParser>>,
    /// Reply being built.
    response: Response,
    /// Outcome, set once the pipeline finishes.
    status: Option<Status>,
    /// Reason for a failed outcome.
    error_message: Option<String>,
    /// Phrase table shared with the assistant.
    corpus: Option<Arc<Corpus>>,
    /// Whether speech is rendered as SSML.
    ssml: bool,
}

impl Agent {
    /// Create an agent with no payload (for testing without a request).
    pub fn new() -> Self {
        Self {
            parser: None,
            response: Response::new(),
            status: None,
            error_message: None,
            corpus: None,
            ssml: true,
        }
    }

    /// Create an agent for a request payload.
    ///
    /// The parser is left unset if no known platform accepts the payload.
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            parser: parser::from_payload(payload),
            ..Self::new()
        }
    }

    /// Share a corpus with this agent.
    pub fn with_corpus(mut self, corpus: Option<Arc<Corpus>>) -> Self {
        self.corpus = corpus;
        self
    }

    /// Render speech as SSML (`true`) or plain text-to-speech.
    pub fn with_ssml(mut self, ssml: bool) -> Self {
        self.ssml = ssml;
        self.response.set_ssml(ssml);
        self
    }

    /// Get the payload parser.
    #[inline]
    pub fn parser(&self) -> Option<&dyn PayloadParser> {
        self.parser.as_deref()
    }

    /// Get the outcome, if the pipeline finished.
    #[inline]
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// Get the reason for a failed outcome.
    #[inline]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Get the reply.
    #[inline]
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Get the reply for direct modification.
    #[inline]
    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    /// Consume the agent, keeping the reply.
    pub fn into_response(self) -> Response {
        self.response
    }

    /// Get the corpus, if one is attached.
    pub fn corpus(&self) -> Option<&Corpus> {
        self.corpus.as_deref()
    }

    /// Record a failed outcome.
    pub(crate) fn fail(&mut self, status: Status, message: &str) {
        self.status = Some(status);
        self.error_message = Some(message.to_string());
    }

    /// Record a successful outcome.
    pub(crate) fn succeed(&mut self) {
        self.status = Some(Status::Ok);
        self.error_message = None;
    }

    /// Extract a request parameter.
    ///
    /// Fails with [`AssistantError::NotImplemented`] if the agent has no
    /// parser.
    pub fn get(&self, key: &str, options: GetOptions) -> Result<Option<Param>> {
        self.parser
            .as_ref()
            .ok_or(AssistantError::NotImplemented("parser"))?
            .get(key, options)
    }

    /// Parameters of a request context, or an empty mapping if absent.
    pub fn get_context(&self, name: &str) -> Map<String, Value> {
        self.parser
            .as_ref()
            .map(|p| p.get_context(name))
            .unwrap_or_default()
    }

    /// Say something and end the conversation.
    pub fn tell_raw(&mut self, speech: &str, text: Option<&str>) -> Result<()> {
        let widget = SimpleResponseWidget::new(Some(speech), text, self.ssml)?;
        self.response.set_expect_user_response(false);
        self.show(&widget);
        Ok(())
    }

    /// Say something and wait for the user's answer.
    pub fn ask_raw(&mut self, speech: &str, text: Option<&str>) -> Result<()> {
        let widget = SimpleResponseWidget::new(Some(speech), text, self.ssml)?;
        self.response.set_expect_user_response(true);
        self.show(&widget);
        Ok(())
    }

    /// Say a phrase from the corpus and end the conversation.
    pub fn tell(&mut self, corpus_key: &str) -> Result<()> {
        let speech = self.pick(corpus_key)?;
        self.tell_raw(&speech, None)
    }

    /// Say a phrase from the corpus and wait for the user's answer.
    pub fn ask(&mut self, corpus_key: &str) -> Result<()> {
        let speech = self.pick(corpus_key)?;
        self.ask_raw(&speech, None)
    }

    /// Offer suggestion chips.
    pub fn suggest<I, S>(&mut self, titles: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let widget = SuggestionsWidget::new(titles)?;
        self.show(&widget);
        Ok(())
    }

    /// Append any widget to the reply.
    pub fn show<W: Widget + ?Sized>(&mut self, widget: &W) {
        self.response.add_widget(widget);
    }

    /// Carry a context into the next turn.
    pub fn add_context(&mut self, name: &str, lifespan: u32, parameters: Map<String, Value>) {
        self.response.add_context(ContextEntry {
            name: name.to_string(),
            parameters,
            lifespan,
        });
    }

    fn pick(&self, corpus_key: &str) -> Result<String> {
        let corpus = self
            .corpus
            .as_ref()
            .ok_or(AssistantError::NotImplemented("corpus"))?;
        Ok(corpus.pick(corpus_key)?.to_string())
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn request() -> Value {
        json!({
            "result": {
                "action": "foo",
                "parameters": {"given-name": "Zack", "count": "third"},
                "contexts": [{"name": "c1", "parameters": {"foo": "bar"}, "lifespan": 5}]
            },
            "originalRequest": {"data": {}}
        })
    }

    fn corpus() -> Arc<Corpus> {
        let mut entries = HashMap::new();
        entries.insert("greeting".to_string(), vec!["Hello!".to_string()]);
        Arc::new(Corpus::new(entries))
    }

    #[test]
    fn test_agent_creation() {
        let agent = Agent::new();
        assert!(agent.parser().is_none());
        assert_eq!(agent.status(), None);
        assert_eq!(agent.error_message(), None);
        assert_eq!(agent.response().messages(), &[Response::initial_message()]);
    }

    #[test]
    fn test_from_payload() {
        let agent = Agent::from_payload(&request());
        assert_eq!(agent.parser().unwrap().action(), "foo");

        let agent = Agent::from_payload(&json!({"result": {}}));
        assert!(agent.parser().is_none());
    }

    #[test]
    fn test_get_delegates_to_parser() {
        let agent = Agent::from_payload(&request());
        assert_eq!(
            agent.get("given-name", GetOptions::new()).unwrap(),
            Some(Param::Text("Zack".into()))
        );
        assert_eq!(
            agent.get("count", GetOptions::new().number()).unwrap(),
            Some(Param::Number(3))
        );
        assert_eq!(Value::Object(agent.get_context("c1")), json!({"foo": "bar"}));
        assert!(agent.get_context("c2").is_empty());
    }

    #[test]
    fn test_get_without_parser() {
        let agent = Agent::new();
        assert!(matches!(
            agent.get("x", GetOptions::new()),
            Err(AssistantError::NotImplemented("parser"))
        ));
        assert!(agent.get_context("c1").is_empty());
    }

    #[test]
    fn test_tell_raw() {
        let mut agent = Agent::new();
        agent.tell_raw("foobar", None).unwrap();

        assert_eq!(
            agent.response().messages(),
            &[
                Response::initial_message(),
                json!({
                    "platform": "google",
                    "type": "simple_response",
                    "displayText": "foobar",
                    "ssml": "<speak>foobar</speak>"
                })
            ]
        );
        assert!(!agent.response().expect_user_response());
    }

    #[test]
    fn test_ask_raw_without_ssml() {
        let mut agent = Agent::new().with_ssml(false);
        agent.ask_raw("Which one?", Some("Pick one")).unwrap();

        let message = &agent.response().messages()[1];
        assert_eq!(message["textToSpeech"], "Which one?");
        assert_eq!(message["displayText"], "Pick one");
        assert!(agent.response().expect_user_response());
        assert!(!agent.response().is_ssml());
    }

    #[test]
    fn test_tell_raw_rejects_empty_speech() {
        let mut agent = Agent::new();
        assert!(matches!(
            agent.tell_raw("", None),
            Err(AssistantError::InvalidWidget(_))
        ));
        assert_eq!(agent.response().messages().len(), 1);
    }

    #[test]
    fn test_tell_from_corpus() {
        let mut agent = Agent::new().with_corpus(Some(corpus()));
        agent.tell("greeting").unwrap();
        assert_eq!(agent.response().messages()[1]["displayText"], "Hello!");

        assert!(matches!(
            agent.ask("farewell"),
            Err(AssistantError::UnknownCorpusKey(_))
        ));
    }

    #[test]
    fn test_tell_without_corpus() {
        let mut agent = Agent::new();
        assert!(matches!(
            agent.tell("greeting"),
            Err(AssistantError::NotImplemented("corpus"))
        ));
    }

    #[test]
    fn test_suggest_and_context() {
        let mut agent = Agent::new();
        agent.suggest(["Yes", "No"]).unwrap();
        agent.add_context("order", 3, Map::new());

        assert_eq!(agent.response().messages()[1]["type"], "suggestion_chips");
        assert_eq!(agent.response().context_out()[0].name, "order");
        assert_eq!(agent.response().context_out()[0].lifespan, 3);
    }

    #[test]
    fn test_status_transitions() {
        let mut agent = Agent::new();
        agent.fail(Status::AccessDenied, "Could not verify request");
        assert_eq!(agent.status(), Some(Status::AccessDenied));
        assert_eq!(agent.error_message(), Some("Could not verify request"));

        agent.succeed();
        assert_eq!(agent.status(), Some(Status::Ok));
        assert_eq!(agent.error_message(), None);
    }
}
