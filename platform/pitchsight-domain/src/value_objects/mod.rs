pub mod game_state;
pub mod pitch_record;
pub mod prediction;
