use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use palletrack_core::SlotId;

/// A proposed storage slot.
///
/// This is advice, not a domain event. Field names follow the JSON shape
/// remote advisors answer with (`suggestedPosition`, `reason`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSuggestion {
    pub suggested_position: SlotId,
    pub reason: String,
}

impl StorageSuggestion {
    pub fn new(suggested_position: SlotId, reason: impl Into<String>) -> Self {
        Self {
            suggested_position,
            reason: reason.into(),
        }
    }

    /// Parse a JSON answer from a remote advisor.
    pub fn from_json(body: &str) -> Result<Self, AiError> {
        serde_json::from_str(body).map_err(|e| AiError::InvalidResponse(e.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("invalid suggestion input: {0}")]
    InvalidInput(String),

    #[error("advisor returned an unusable response: {0}")]
    InvalidResponse(String),

    #[error("inference failed: {0}")]
    InferenceFailed(String),

    #[error("advisor did not answer within {0:?}")]
    Timeout(Duration),
}
