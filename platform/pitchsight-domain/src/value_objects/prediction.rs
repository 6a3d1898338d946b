use serde::{Deserialize, Serialize};

/// 9 grid cells plus 4 corner wedges.
pub const ZONE_COUNT: usize = 13;
pub const PITCH_TYPE_COUNT: usize = 14;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneResult {
    pub predicted_zone: Option<usize>,
    pub probabilities: Vec<f64>,
}

impl Default for ZoneResult {
    fn default() -> Self {
        Self {
            predicted_zone: None,
            probabilities: vec![0.0; ZONE_COUNT],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchTypeResult {
    pub predicted_type: Option<usize>,
    pub probabilities: Vec<f64>,
}

impl Default for PitchTypeResult {
    fn default() -> Self {
        Self {
            predicted_type: None,
            probabilities: vec![0.0; PITCH_TYPE_COUNT],
        }
    }
}

/// Merge of both inference responses. The orchestrator replaces this as a
/// whole value; readers never observe one half updated without the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub zone: ZoneResult,
    pub pitch_type: PitchTypeResult,
}

#[cfg(test)]
mod tests {
    use super::{PredictionResult, PITCH_TYPE_COUNT, ZONE_COUNT};

    #[test]
    fn default_result_is_zeroed_with_no_predictions() {
        let result = PredictionResult::default();
        assert_eq!(result.zone.predicted_zone, None);
        assert_eq!(result.pitch_type.predicted_type, None);
        assert_eq!(result.zone.probabilities.len(), ZONE_COUNT);
        assert_eq!(result.pitch_type.probabilities.len(), PITCH_TYPE_COUNT);
        assert!(result.zone.probabilities.iter().all(|p| *p == 0.0));
        assert!(result.pitch_type.probabilities.iter().all(|p| *p == 0.0));
    }
}
