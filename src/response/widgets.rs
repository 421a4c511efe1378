//! Google Assistant reply widgets.
//!
//! Each widget validates its inputs when constructed and renders to a JSON
//! record tagged with `platform` and `type`. Widgets are immutable, so
//! rendering the same widget twice yields identical output.

use serde_json::{json, Map, Value};

use crate::error::{AssistantError, Result};
use crate::parser::Platform;

/// Maximum number of suggestion chips Google displays.
pub const MAX_SUGGESTIONS: usize = 8;

/// Maximum length of a suggestion chip title.
pub const MAX_SUGGESTION_TITLE_LEN: usize = 25;

/// A reply fragment that can be rendered to the platform wire format.
pub trait Widget {
    /// Render this widget to its wire record.
    fn render(&self) -> Value;
}

/// Wrap speech in SSML `<speak>` tags.
pub fn ssml_format(speech: &str) -> String {
    format!("<speak>{}</speak>", speech)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn base_record(kind: &str) -> Map<String, Value> {
    let mut record = Map::new();
    record.insert("platform".into(), json!(Platform::Google.name()));
    record.insert("type".into(), json!(kind));
    record
}

/// Spoken reply with its on-screen text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleResponseWidget {
    speech: String,
    text: String,
    ssml: bool,
}

impl SimpleResponseWidget {
    /// Create a simple response.
    ///
    /// At least one of `speech` and `text` must be non-empty; the missing one
    /// defaults to the other. With `ssml`, speech renders wrapped in
    /// `<speak>` tags; otherwise it renders as plain text-to-speech.
    pub fn new(speech: Option<&str>, text: Option<&str>, ssml: bool) -> Result<Self> {
        let (speech, text) = match (non_empty(speech), non_empty(text)) {
            (None, None) => {
                return Err(AssistantError::InvalidWidget(
                    "simple response requires speech or text".into(),
                ))
            }
            (Some(speech), None) => (speech, speech),
            (None, Some(text)) => (text, text),
            (Some(speech), Some(text)) => (speech, text),
        };

        Ok(Self {
            speech: speech.to_string(),
            text: text.to_string(),
            ssml,
        })
    }

    /// Speech as given, without SSML wrapping.
    pub fn speech(&self) -> &str {
        &self.speech
    }

    /// Display text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Widget for SimpleResponseWidget {
    fn render(&self) -> Value {
        let mut record = base_record("simple_response");
        record.insert("displayText".into(), json!(self.text));
        if self.ssml {
            record.insert("ssml".into(), json!(ssml_format(&self.speech)));
        } else {
            record.insert("textToSpeech".into(), json!(self.speech));
        }
        Value::Object(record)
    }
}

/// Suggestion chips shown under the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionsWidget {
    titles: Vec<String>,
}

impl SuggestionsWidget {
    /// Create suggestion chips.
    ///
    /// Requires 1 to [`MAX_SUGGESTIONS`] titles, each non-empty and at most
    /// [`MAX_SUGGESTION_TITLE_LEN`] characters.
    pub fn new<I, S>(titles: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let titles: Vec<String> = titles.into_iter().map(Into::into).collect();

        if titles.is_empty() || titles.len() > MAX_SUGGESTIONS {
            return Err(AssistantError::InvalidWidget(format!(
                "suggestions require 1 to {} titles, got {}",
                MAX_SUGGESTIONS,
                titles.len()
            )));
        }
        if let Some(bad) = titles
            .iter()
            .find(|t| t.is_empty() || t.chars().count() > MAX_SUGGESTION_TITLE_LEN)
        {
            return Err(AssistantError::InvalidWidget(format!(
                "invalid suggestion title '{}'",
                bad
            )));
        }

        Ok(Self { titles })
    }
}

impl Widget for SuggestionsWidget {
    fn render(&self) -> Value {
        let mut record = base_record("suggestion_chips");
        let suggestions: Vec<Value> = self
            .titles
            .iter()
            .map(|title| json!({ "title": title }))
            .collect();
        record.insert("suggestions".into(), Value::Array(suggestions));
        Value::Object(record)
    }
}

/// Chip linking out to a web page or app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutChipWidget {
    title: String,
    url: String,
}

impl LinkOutChipWidget {
    /// Create a link-out chip. Both fields are required.
    pub fn new(title: &str, url: &str) -> Result<Self> {
        if title.is_empty() || url.is_empty() {
            return Err(AssistantError::InvalidWidget(
                "link out chip requires a title and a url".into(),
            ));
        }
        Ok(Self {
            title: title.to_string(),
            url: url.to_string(),
        })
    }
}

impl Widget for LinkOutChipWidget {
    fn render(&self) -> Value {
        let mut record = base_record("link_out_chip");
        record.insert("destinationName".into(), json!(self.title));
        record.insert("url".into(), json!(self.url));
        Value::Object(record)
    }
}

/// Image shown in a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alternative text for accessibility.
    pub accessibility_text: String,
}

impl Image {
    /// Create an image.
    pub fn new(url: impl Into<String>, accessibility_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            accessibility_text: accessibility_text.into(),
        }
    }

    fn render(&self) -> Value {
        json!({
            "url": self.url,
            "accessibilityText": self.accessibility_text
        })
    }
}

/// Button opening a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Button label.
    pub title: String,
    /// URL opened on tap.
    pub url: String,
}

impl Button {
    /// Create a button.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    fn render(&self) -> Value {
        json!({
            "title": self.title,
            "openUrlAction": { "url": self.url }
        })
    }
}

/// Card with title, body text, optional image and optional button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCardWidget {
    title: String,
    formatted_text: String,
    image: Option<Image>,
    button: Option<Button>,
}

impl BasicCardWidget {
    /// Create a basic card. Needs body text or an image.
    pub fn new(
        title: &str,
        formatted_text: Option<&str>,
        image: Option<Image>,
        button: Option<Button>,
    ) -> Result<Self> {
        let formatted_text = non_empty(formatted_text);
        if formatted_text.is_none() && image.is_none() {
            return Err(AssistantError::InvalidWidget(
                "basic card requires formatted text or an image".into(),
            ));
        }
        if button
            .as_ref()
            .is_some_and(|b| b.title.is_empty() || b.url.is_empty())
        {
            return Err(AssistantError::InvalidWidget(
                "basic card button requires a title and a url".into(),
            ));
        }

        Ok(Self {
            title: title.to_string(),
            formatted_text: formatted_text.unwrap_or_default().to_string(),
            image,
            button,
        })
    }
}

impl Widget for BasicCardWidget {
    fn render(&self) -> Value {
        let mut record = base_record("basic_card");
        record.insert("title".into(), json!(self.title));
        record.insert("formattedText".into(), json!(self.formatted_text));
        if let Some(image) = &self.image {
            record.insert("image".into(), image.render());
        }
        let buttons: Vec<Value> = self.button.iter().map(Button::render).collect();
        record.insert("buttons".into(), Value::Array(buttons));
        Value::Object(record)
    }
}
