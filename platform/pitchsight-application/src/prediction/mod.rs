use pitchsight_domain::repositories::inference::{InferenceClient, InferenceError};
use pitchsight_domain::services::pitch_rank::{top_n, RankedPitch};
use pitchsight_domain::services::zone_map::{render_model, CellView};
use pitchsight_domain::value_objects::game_state::GameState;
use pitchsight_domain::value_objects::prediction::PredictionResult;
use serde::Serialize;

pub const TOP_PITCH_COUNT: usize = 3;

/// Everything the presentation layer needs for one render cycle.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    pub cells: Vec<CellView>,
    pub top_pitches: Vec<RankedPitch>,
}

/// Runs both inference calls for one game state and merges them. The two
/// requests carry the same feature vector; either failure aborts the merge
/// so no partial result ever escapes.
pub fn predict(
    client: &dyn InferenceClient,
    state: &GameState,
) -> Result<PredictionResult, InferenceError> {
    let features = state.features();

    let zone = client.predict_zone(&features).map_err(|err| {
        tracing::warn!(error = %err, "zone prediction failed");
        err
    })?;
    let pitch_type = client.predict_pitch_type(&features).map_err(|err| {
        tracing::warn!(error = %err, "pitch type prediction failed");
        err
    })?;

    tracing::info!(
        predicted_zone = ?zone.predicted_zone,
        predicted_type = ?pitch_type.predicted_type,
        "prediction merged"
    );
    Ok(PredictionResult { zone, pitch_type })
}

/// Derives the heatmap cells and ranked pitch list from a merged result.
pub fn build_view(result: &PredictionResult) -> PredictionView {
    PredictionView {
        cells: render_model(&result.zone),
        top_pitches: top_n(&result.pitch_type, TOP_PITCH_COUNT),
    }
}

#[cfg(test)]
mod tests {
    use super::{build_view, predict};
    use pitchsight_domain::repositories::inference::{InferenceClient, InferenceError};
    use pitchsight_domain::value_objects::game_state::GameState;
    use pitchsight_domain::value_objects::prediction::{
        PitchTypeResult, ZoneResult, PITCH_TYPE_COUNT, ZONE_COUNT,
    };

    struct StubClient {
        zone: Result<ZoneResult, InferenceError>,
        pitch: Result<PitchTypeResult, InferenceError>,
    }

    impl InferenceClient for StubClient {
        fn predict_zone(&self, features: &[f64]) -> Result<ZoneResult, InferenceError> {
            assert_eq!(features.len(), 7);
            self.zone.clone()
        }

        fn predict_pitch_type(&self, features: &[f64]) -> Result<PitchTypeResult, InferenceError> {
            assert_eq!(features.len(), 7);
            self.pitch.clone()
        }
    }

    fn zone_peaked_at(idx: usize) -> ZoneResult {
        let mut probabilities = vec![0.05; ZONE_COUNT];
        probabilities[idx] = 0.4;
        ZoneResult {
            predicted_zone: Some(idx),
            probabilities,
        }
    }

    fn pitch_peaked_at(idx: usize) -> PitchTypeResult {
        let mut probabilities = vec![0.02; PITCH_TYPE_COUNT];
        probabilities[idx] = 0.6;
        PitchTypeResult {
            predicted_type: Some(idx),
            probabilities,
        }
    }

    #[test]
    fn successful_merge_produces_coherent_view() {
        let client = StubClient {
            zone: Ok(zone_peaked_at(4)),
            pitch: Ok(pitch_peaked_at(3)),
        };
        let result = predict(&client, &GameState::default()).expect("merge");
        let view = build_view(&result);
        assert!(view.cells[4].is_predicted);
        assert_eq!(view.top_pitches[0].pitch_type_id, 3);
        assert_eq!(view.top_pitches.len(), 3);
    }

    #[test]
    fn pitch_type_failure_aborts_the_whole_merge() {
        let client = StubClient {
            zone: Ok(zone_peaked_at(4)),
            pitch: Err(InferenceError::HttpStatus(500)),
        };
        let err = predict(&client, &GameState::default()).expect_err("merge must fail");
        assert_eq!(err, InferenceError::HttpStatus(500));
    }

    #[test]
    fn zone_failure_aborts_without_touching_the_second_call() {
        struct PanicPitchClient;
        impl InferenceClient for PanicPitchClient {
            fn predict_zone(&self, _: &[f64]) -> Result<ZoneResult, InferenceError> {
                Err(InferenceError::Transport("connection refused".to_string()))
            }
            fn predict_pitch_type(
                &self,
                _: &[f64],
            ) -> Result<PitchTypeResult, InferenceError> {
                panic!("pitch type must not be requested after zone failure");
            }
        }
        let err = predict(&PanicPitchClient, &GameState::default()).expect_err("fail fast");
        assert!(matches!(err, InferenceError::Transport(_)));
    }
}
