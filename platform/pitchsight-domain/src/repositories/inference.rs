use crate::value_objects::prediction::{PitchTypeResult, ZoneResult};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("inference request failed: {0}")]
    Transport(String),
    #[error("inference http error: status {0}")]
    HttpStatus(u16),
    #[error("malformed inference response: {0}")]
    MalformedResponse(String),
}

/// Port to the external prediction service. Both calls take the same
/// 7-entry feature vector; see `GameState::features` for its order.
pub trait InferenceClient {
    fn predict_zone(&self, features: &[f64]) -> Result<ZoneResult, InferenceError>;

    fn predict_pitch_type(&self, features: &[f64]) -> Result<PitchTypeResult, InferenceError>;
}
