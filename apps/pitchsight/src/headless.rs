use crate::tasks::build_inference_client;
use pitchsight_application::config::load_config;
use pitchsight_application::prediction;
use pitchsight_domain::services::validation::{self, RawGameForm};
use std::path::PathBuf;

/// One-shot prediction without the TUI. Raw field values come straight from
/// the CLI so the same validation path runs as in the form.
pub struct HeadlessArgs {
    pub config_path: PathBuf,
    pub inning: String,
    pub balls: String,
    pub strikes: String,
    pub outs: String,
    pub batting_score: String,
    pub fielding_score: String,
    pub stand: String,
}

pub fn run_headless(args: HeadlessArgs) -> Result<serde_json::Value, String> {
    let form = RawGameForm {
        inning: args.inning,
        balls: args.balls,
        strikes: args.strikes,
        outs_when_up: args.outs,
        batting_score: args.batting_score,
        fielding_score: args.fielding_score,
        stand: args.stand,
    };
    let state = validation::validate(&form).map_err(|errors| {
        let details: Vec<String> = errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field.label(), message))
            .collect();
        format!("invalid game state: {}", details.join("; "))
    })?;

    let config = load_config(&args.config_path)?;
    let client = build_inference_client(&config)?;
    let result = prediction::predict(&client, &state).map_err(|err| err.to_string())?;
    let view = prediction::build_view(&result);

    let payload = serde_json::json!({
        "status": "ok",
        "game_state": state,
        "cells": view.cells,
        "top_pitches": view.top_pitches,
    });
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::{run_headless, HeadlessArgs};
    use std::path::PathBuf;

    fn args() -> HeadlessArgs {
        HeadlessArgs {
            config_path: PathBuf::from("does-not-exist.toml"),
            inning: "1".to_string(),
            balls: "0".to_string(),
            strikes: "0".to_string(),
            outs: "0".to_string(),
            batting_score: "0".to_string(),
            fielding_score: "0".to_string(),
            stand: "L".to_string(),
        }
    }

    #[test]
    fn invalid_fields_fail_before_any_config_or_network_use() {
        let mut args = args();
        args.balls = "4".to_string();
        args.strikes = "oops".to_string();
        let err = run_headless(args).expect_err("must fail");
        assert!(err.contains("balls"));
        assert!(err.contains("strikes"));
        assert!(!err.contains("config"));
    }

    #[test]
    fn valid_fields_then_missing_config_is_a_config_error() {
        let err = run_headless(args()).expect_err("must fail");
        assert!(err.contains("failed to read config"));
    }
}
