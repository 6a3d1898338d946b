use crate::value_objects::game_state::GameState;
use crate::value_objects::pitch_record::PitchRecord;

/// Port to the pitch-log service that keeps previously submitted game
/// states. Out of the prediction path; errors are plain messages.
pub trait PitchLogRepository {
    fn list(&self) -> Result<Vec<PitchRecord>, String>;

    fn add(&self, state: &GameState) -> Result<PitchRecord, String>;

    fn update(&self, id: u64, state: &GameState) -> Result<(), String>;

    fn delete(&self, id: u64) -> Result<(), String>;
}
