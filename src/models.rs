//! API Models
//! Mission: Request/response shapes for the prediction and status surface

use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// Longest input the prediction endpoint accepts, in characters.
pub const MAX_PREDICTION_CHARS: usize = 512;

/// Request body for POST /predict.
#[derive(Debug, Deserialize)]
pub struct PredictionRequest {
    pub text: String,
}

impl PredictionRequest {
    /// Normalize and bound-check the input before the model sees it.
    ///
    /// Collapses runs of whitespace, then rejects empty and overlong text.
    pub fn validated_text(&self) -> Result<String, ApiError> {
        let cleaned = self.text.split_whitespace().collect::<Vec<_>>().join(" ");

        if cleaned.is_empty() {
            return Err(ApiError::validation("text", "Text must not be empty"));
        }
        if cleaned.chars().count() > MAX_PREDICTION_CHARS {
            return Err(ApiError::validation(
                "text",
                format!("Text must be at most {MAX_PREDICTION_CHARS} characters"),
            ));
        }

        Ok(cleaned)
    }
}

/// Response body for POST /predict.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub label: String,
    pub score: f64,
    pub text: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub version: String,
}

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub health: String,
    pub authentication: String,
}
