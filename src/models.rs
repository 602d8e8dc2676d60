use std::fmt;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Opaque record identifier. The backend issues UUID strings, but numeric ids are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(RecordId(s)),
            Value::Number(n) => Ok(RecordId(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "record id must be a string or number, got {}",
                other
            ))),
        }
    }
}

/// One feedback entry as stored by the backend. Everything but the id is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    #[serde(rename = "ID", alias = "id", alias = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name", alias = "name", default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(rename = "Feedback", alias = "feedback", default, deserialize_with = "lenient_text")]
    pub feedback: Option<String>,
    #[serde(rename = "Sentiment", alias = "sentiment", default, deserialize_with = "lenient_text")]
    pub sentiment: Option<String>,
    #[serde(rename = "Gender", alias = "gender", default, deserialize_with = "lenient_text")]
    pub gender: Option<String>,
    #[serde(
        rename = "FirstName",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub first_name: Option<String>,
    #[serde(
        rename = "LastName",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_name: Option<String>,
}

/// Optional text field: scalars become text, null/arrays/objects become `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

impl FeedbackRecord {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            feedback: None,
            sentiment: None,
            gender: None,
            first_name: None,
            last_name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    pub fn with_sentiment(mut self, sentiment: impl Into<String>) -> Self {
        self.sentiment = Some(sentiment.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }
}

/// Records in the order the server returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeedbackCollection {
    records: Vec<FeedbackRecord>,
}

impl FeedbackCollection {
    pub fn new(records: Vec<FeedbackRecord>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Lenient parse of a list response body.
    ///
    /// A blank body, invalid JSON or a non-array value is an empty collection. Array
    /// elements without a usable id are skipped; oddly typed optional fields are not.
    pub fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::empty();
        }

        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                warn!("Feedback list body is not valid JSON, rendering no rows: {}", e);
                Self::empty()
            }
        }
    }

    pub fn from_value(value: Value) -> Self {
        let items = match value {
            Value::Array(items) => items,
            Value::Null => return Self::empty(),
            other => {
                warn!(
                    "Feedback list body is not an array (got {}), rendering no rows",
                    value_kind(&other)
                );
                return Self::empty();
            }
        };

        let total = items.len();
        let records: Vec<FeedbackRecord> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<FeedbackRecord>(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping malformed feedback record: {}", e);
                    None
                }
            })
            .collect();

        if records.len() != total {
            warn!("Kept {} of {} feedback records", records.len(), total);
        }

        Self { records }
    }

    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeedbackRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a FeedbackCollection {
    type Item = &'a FeedbackRecord;
    type IntoIter = std::slice::Iter<'a, FeedbackRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Record ids the user ticked, in the order they were ticked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<RecordId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an id unless it is blank or already selected. Returns whether it was added.
    pub fn select(&mut self, id: impl Into<RecordId>) -> bool {
        let id = id.into();
        let trimmed = id.as_str().trim();
        if trimmed.is_empty() {
            return false;
        }

        let id = RecordId::new(trimmed);
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

impl<I> FromIterator<I> for Selection
where
    I: Into<RecordId>,
{
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut selection = Selection::new();
        for id in iter {
            selection.select(id);
        }
        selection
    }
}

/// Values from the "enter feedback" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub first_name: String,
    pub last_name: String,
    pub feedback: String,
}

impl NewFeedback {
    pub fn new(
        first_name: impl AsRef<str>,
        last_name: impl AsRef<str>,
        feedback: impl AsRef<str>,
    ) -> Self {
        Self {
            first_name: first_name.as_ref().trim().to_string(),
            last_name: last_name.as_ref().trim().to_string(),
            feedback: feedback.as_ref().trim().to_string(),
        }
    }
}
