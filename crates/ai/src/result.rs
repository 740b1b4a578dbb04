use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Structured recipe extracted by the language model.
///
/// Fields the model leaves out come back empty rather than failing the parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedRecipe {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub ingredients: Vec<String>,

    #[serde(default)]
    pub instructions: Vec<String>,

    #[serde(default, alias = "total_time_minutes", deserialize_with = "lenient_string")]
    pub total_time: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub servings: String,

    #[serde(default)]
    pub course_type: String,
}

/// Models are inconsistent about `"4"` vs `4`; accept both.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s,
        other => other.to_string(),
    })
}

/// Pull the JSON object out of a free-form model response.
///
/// Models like to wrap the object in prose or code fences, so this takes
/// everything from the first `{` to the last `}`.
pub fn parse_processed_recipe(response: &str) -> Result<ProcessedRecipe, AiError> {
    let (start, end) = match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Err(AiError::NoJson),
    };

    serde_json::from_str(&response[start..=end]).map_err(|e| AiError::Parse(e.to_string()))
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to reach language model: {0}")]
    Transport(String),

    #[error("language model returned status {0}")]
    UpstreamStatus(u16),

    #[error("failed to decode language model response: {0}")]
    Decode(String),

    #[error("no JSON object found in language model response")]
    NoJson,

    #[error("failed to parse recipe JSON: {0}")]
    Parse(String),
}
