pub mod pitch_rank;
pub mod validation;
pub mod zone_map;
