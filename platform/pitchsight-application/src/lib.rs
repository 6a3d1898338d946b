pub mod config;
pub mod prediction;
