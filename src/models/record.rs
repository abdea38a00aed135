use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A movie row as supplied by a dataset source, before normalization
///
/// Every field is optional: real exports mix numeric and string ids, carry
/// `null` overviews and occasionally drop whole columns. A mistyped text or
/// genre field deserializes as absent instead of failing the row. The
/// normalizer decides what survives.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "lenient_genres")]
    pub genres: Option<Vec<Genre>>,
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_genres<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<Genre>>, D::Error> {
    Ok(parse_genres(Value::deserialize(deserializer)?))
}

/// Reads a genre list from an array, or from a string holding one
///
/// CSV exports store the list as a Python literal
/// (`"[{'id': 16, 'name': 'Animation'}]"`), so single quotes are retried as
/// double quotes. Entries that are neither a name nor a `{name}` object are
/// dropped.
pub fn parse_genres(value: Value) -> Option<Vec<Genre>> {
    match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        Value::String(s) => serde_json::from_str::<Value>(&s)
            .or_else(|_| serde_json::from_str::<Value>(&s.replace('\'', "\"")))
            .ok()
            .filter(Value::is_array)
            .and_then(parse_genres),
        _ => None,
    }
}

/// Integral float ids (`862.0`) come out of CSV to JSON conversions
fn integral_id(value: f64) -> Option<i64> {
    let in_range = (i64::MIN as f64..i64::MAX as f64).contains(&value);
    (in_range && value.fract() == 0.0).then_some(value as i64)
}

/// Genre entry, either a bare name or a TMDb-style `{"id": .., "name": ..}` object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Genre {
    Name(String),
    Tagged { name: String },
}

impl Genre {
    pub fn name(&self) -> &str {
        match self {
            Genre::Name(name) => name,
            Genre::Tagged { name } => name,
        }
    }
}

impl RawRecord {
    /// Builds a raw record from the three fields the recommender needs
    pub fn new(id: i64, title: &str, overview: &str) -> Self {
        Self {
            id: Some(Value::from(id)),
            title: Some(Value::from(title)),
            overview: Some(overview.to_string()),
            ..Default::default()
        }
    }

    /// Parses the id as an integer
    ///
    /// Accepts JSON integers, integral floats and strings holding either
    /// (surrounding whitespace ignored). Anything else yields `None`.
    pub fn parse_id(&self) -> Option<i64> {
        match self.id.as_ref()? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral_id)),
            Value::String(s) => {
                let s = s.trim();
                s.parse()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral_id))
            }
            _ => None,
        }
    }

    /// Title as a trimmed, non-empty string
    pub fn title_text(&self) -> Option<String> {
        let title = match self.title.as_ref()? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!title.is_empty()).then_some(title)
    }
}

/// A canonical corpus entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: i64,
    pub title: String,
    /// Normalized text used for vectorization; empty when the source had none
    pub text: String,
}

impl Record {
    pub fn new(id: i64, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            text: text.into(),
        }
    }
}
