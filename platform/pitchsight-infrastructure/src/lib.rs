pub mod inference;
pub mod pitch_log;
