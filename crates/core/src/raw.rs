// ABOUTME: Loosely-typed program records as supplied by the scraping collaborator.
// ABOUTME: Wraps a JSON object and exposes tolerant accessors plus the batch loader.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::PipelineError;

/// One scraped program record. No field is guaranteed to be present or well-formed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawProgramRecord(Map<String, Value>);

/// Borrowed view of a raw field classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RawField<'a> {
    Text(&'a str),
    /// String elements of a list; non-string elements are dropped.
    List(Vec<&'a str>),
    Map(&'a Map<String, Value>),
    /// Null, numbers, and booleans.
    Other(&'a Value),
}

impl RawProgramRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly useful for constructing fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a trimmed, non-empty string value.
    ///
    /// Null, non-string scalars, and blank strings are all treated as missing.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }

    /// Like [`text`](Self::text) but without trimming, for free text fields.
    pub fn raw_text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn field(&self, key: &str) -> Option<RawField<'_>> {
        self.0.get(key).map(RawField::classify)
    }
}

impl From<Map<String, Value>> for RawProgramRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<'a> RawField<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::String(s) => RawField::Text(s),
            Value::Array(items) => RawField::List(items.iter().filter_map(Value::as_str).collect()),
            Value::Object(map) => RawField::Map(map),
            other => RawField::Other(other),
        }
    }
}

/// A batch of raw records as written by the scraper (`{ "programs": [...] }`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapedBatch {
    pub programs: Vec<RawProgramRecord>,
}

impl ScrapedBatch {
    /// Parses a scraper output document.
    ///
    /// A missing `programs` key yields an empty batch. A document that is not an
    /// object, or a `programs` value that is not a list, is an [`PipelineError::InvalidBatch`].
    pub fn from_json(data: &str) -> Result<Self, PipelineError> {
        let value: Value = serde_json::from_str(data)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, PipelineError> {
        let Value::Object(mut doc) = value else {
            return Err(PipelineError::invalid_batch("document is not a json object"));
        };

        let items = match doc.remove("programs") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(PipelineError::invalid_batch(format!(
                    "`programs` must be a list, found {}",
                    value_kind(&other)
                )))
            }
        };

        let programs = items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::Object(map) => RawProgramRecord(map),
                other => {
                    debug!(
                        index = idx,
                        kind = value_kind(&other),
                        "non-object program record, using empty record"
                    );
                    RawProgramRecord::default()
                }
            })
            .collect();

        Ok(Self { programs })
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
