//! Read-only phrase table.
//!
//! A corpus maps a key to the phrases an assistant may say for it. It is
//! loaded once at startup from JSON of the form:
//!
//! ```text
//! {"corpus": {"greeting": ["Hello!", "Hi there!"]}}
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::error::{AssistantError, Result};

#[derive(Deserialize)]
struct CorpusFile {
    corpus: HashMap<String, Vec<String>>,
}

/// Phrase table keyed by corpus ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    entries: HashMap<String, Vec<String>>,
}

impl Corpus {
    /// Create a corpus from an in-memory table.
    pub fn new(entries: HashMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    /// Parse a corpus from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CorpusFile = serde_json::from_str(json)?;
        Ok(Self::new(file.corpus))
    }

    /// Parse a corpus from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let file: CorpusFile = serde_json::from_reader(reader)?;
        Ok(Self::new(file.corpus))
    }

    /// Load a corpus from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// All phrases for a key.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// One phrase for a key, chosen at random.
    ///
    /// Fails if the key is unknown or has no phrases.
    pub fn pick(&self, key: &str) -> Result<&str> {
        self.get(key)
            .and_then(|phrases| phrases.choose(&mut rand::thread_rng()))
            .map(String::as_str)
            .ok_or_else(|| AssistantError::UnknownCorpusKey(key.to_string()))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the corpus has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
