use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::ParameterState;

pub const PREDICT_PATH: &str = "/predict";
pub const HEALTH_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub temperature: f64,
    pub pressure: f64,
}

impl From<ParameterState> for PredictRequest {
    fn from(value: ParameterState) -> Self {
        Self {
            temperature: value.temperature,
            pressure: value.pressure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(deserialize_with = "label_from_string_or_number")]
    pub prediction: String,
    pub is_golden_batch: bool,
    /// Echo of the evaluated inputs, when the service includes one.
    #[serde(default)]
    pub input: Option<PredictRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthResponse {
    pub fn is_online(&self) -> bool {
        self.status.eq_ignore_ascii_case("online")
    }
}

fn label_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawLabel {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match RawLabel::deserialize(deserializer)? {
        RawLabel::Text(text) => text,
        RawLabel::Integer(value) => value.to_string(),
        RawLabel::Float(value) => value.to_string(),
    })
}
