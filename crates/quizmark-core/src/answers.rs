//! The learner's answer mapping.
//!
//! Inside the crate an answer sheet is keyed by `QuestionId`. String keys
//! exist only at the serialization boundary, and a key that is not a
//! canonical question id is rejected instead of being dropped.

use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GradingError;
use crate::model::QuestionId;

/// Mapping from question id to the answer string the learner submitted.
///
/// Entries for ids the quiz does not contain are allowed and kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet(BTreeMap<QuestionId, String>);

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, returning the previous one for that question.
    pub fn insert(&mut self, question: QuestionId, answer: impl Into<String>) -> Option<String> {
        self.0.insert(question, answer.into())
    }

    pub fn get(&self, question: QuestionId) -> Option<&str> {
        self.0.get(&question).map(String::as_str)
    }

    pub fn contains(&self, question: QuestionId) -> bool {
        self.0.contains_key(&question)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &str)> {
        self.0.iter().map(|(id, answer)| (*id, answer.as_str()))
    }

    /// Build a sheet from string-keyed pairs, as they arrive over the wire.
    pub fn from_string_pairs<I, K, V>(pairs: I) -> Result<Self, GradingError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut sheet = Self::new();
        for (key, value) in pairs {
            let key = key.as_ref();
            let id = key
                .parse::<QuestionId>()
                .map_err(|e| GradingError::Validation(format!("answer key {e}")))?;
            sheet.insert(id, value);
        }
        Ok(sheet)
    }

    /// Validate an untyped JSON document and convert it into a sheet.
    ///
    /// The document must be an object whose values are all strings.
    pub fn from_json(value: &Value) -> Result<Self, GradingError> {
        let Value::Object(map) = value else {
            return Err(GradingError::Validation(format!(
                "expected a JSON object of answers, got {}",
                json_kind(value)
            )));
        };

        let mut pairs = Vec::with_capacity(map.len());
        for (key, answer) in map {
            match answer {
                Value::String(s) => pairs.push((key.as_str(), s.clone())),
                other => {
                    return Err(GradingError::Validation(format!(
                        "answer for question {key:?} must be a string, got {}",
                        json_kind(other)
                    )));
                }
            }
        }
        Self::from_string_pairs(pairs)
    }

    /// Parse and validate a JSON string.
    pub fn from_json_str(input: &str) -> Result<Self, GradingError> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| GradingError::Validation(format!("answers are not valid JSON: {e}")))?;
        Self::from_json(&value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl FromIterator<(QuestionId, String)> for AnswerSheet {
    fn from_iter<T: IntoIterator<Item = (QuestionId, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for AnswerSheet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, answer) in &self.0 {
            map.serialize_entry(&id.to_string(), answer)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AnswerSheet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        Self::from_string_pairs(raw).map_err(de::Error::custom)
    }
}
