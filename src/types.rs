use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

use crate::constants::{
    FIELD_BATCH, FIELD_EMBEDDING, FIELD_LONG_DESCRIPTION, FIELD_NAME, FIELD_ONE_LINER, FIELD_SLUG,
};
use crate::error::{PipelineError, Result};

/// One company from the accelerator export.
///
/// Records are kept as an ordered field map rather than a fixed struct: the
/// export carries many fields the pipeline never looks at, and they must come
/// out the other side untouched and in their original order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyRecord {
    fields: Map<String, Value>,
}

impl CompanyRecord {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build a record from a JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(PipelineError::MalformedInput(format!(
                "expected a record object, found {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// String value of a field. Non-string values read as absent.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// The slug, only when present and non-empty
    pub fn slug(&self) -> Option<&str> {
        self.str_field(FIELD_SLUG).filter(|s| !s.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field(FIELD_NAME)
    }

    pub fn batch(&self) -> Option<&str> {
        self.str_field(FIELD_BATCH)
    }

    /// Replace the batch label in place, keeping the field's position
    pub fn set_batch(&mut self, batch: String) {
        self.fields.insert(FIELD_BATCH.to_string(), Value::String(batch));
    }

    /// The batch as it should be shown to a person: strings as-is, any other
    /// JSON value (`null`, `2014`, `[..]`) as its JSON text. `None` only when
    /// the key is absent.
    pub fn batch_label(&self) -> Option<Cow<'_, str>> {
        self.fields.get(FIELD_BATCH).map(|value| match value {
            Value::String(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        })
    }

    /// Whether a field holds a non-empty string. This is the presence rule
    /// for required fields, and the same one `slug()` applies when cleaning:
    /// numbers, booleans, null and collections all count as missing.
    pub fn has_text(&self, field: &str) -> bool {
        self.str_field(field).is_some_and(|s| !s.is_empty())
    }

    /// Source text for the embedding step: the long description when it has
    /// content, else the one-liner. Returned trimmed; `None` when both are blank.
    pub fn description_text(&self) -> Option<&str> {
        [FIELD_LONG_DESCRIPTION, FIELD_ONE_LINER]
            .iter()
            .filter_map(|field| self.str_field(field))
            .map(str::trim)
            .find(|text| !text.is_empty())
    }

    pub fn has_embedding(&self) -> bool {
        matches!(self.fields.get(FIELD_EMBEDDING), Some(Value::Array(v)) if !v.is_empty())
    }

    pub fn set_embedding(&mut self, embedding: &[f32]) {
        let values = embedding.iter().map(|v| Value::from(*v)).collect();
        self.fields
            .insert(FIELD_EMBEDDING.to_string(), Value::Array(values));
    }
}

impl From<Map<String, Value>> for CompanyRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_fields(fields)
    }
}

/// Turn a parsed JSON document into records. The document must be an array
/// whose every element is an object; anything else is malformed input.
pub fn records_from_value(value: Value) -> Result<Vec<CompanyRecord>> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(PipelineError::MalformedInput(format!(
                "expected a JSON array of records, found {}",
                json_kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| match item {
            Value::Object(fields) => Ok(CompanyRecord::from_fields(fields)),
            other => Err(PipelineError::MalformedInput(format!(
                "record {} is {}, expected an object",
                position,
                json_kind(&other)
            ))),
        })
        .collect()
}

/// Parse a dataset from JSON text
pub fn parse_dataset(json: &str) -> Result<Vec<CompanyRecord>> {
    let value: Value = serde_json::from_str(json)?;
    records_from_value(value)
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
