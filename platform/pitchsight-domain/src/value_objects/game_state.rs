use serde::{Deserialize, Serialize};

pub const FEATURE_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatterStand {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

impl BatterStand {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatterStand::Left => "L",
            BatterStand::Right => "R",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BatterStand::Left => "Left",
            BatterStand::Right => "Right",
        }
    }
}

/// One pitch situation as the operator describes it. All fields are
/// range-checked by `services::validation` before a prediction is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub inning: u32,
    pub balls: u32,
    pub strikes: u32,
    pub outs_when_up: u32,
    pub batting_score: u32,
    pub fielding_score: u32,
    pub stand: BatterStand,
}

impl GameState {
    /// Model input vector. The order is part of the service contract and
    /// must not change: [inning, outs, balls, strikes, bat score, field
    /// score, handedness], handedness 1.0 for a left-handed batter.
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.inning as f64,
            self.outs_when_up as f64,
            self.balls as f64,
            self.strikes as f64,
            self.batting_score as f64,
            self.fielding_score as f64,
            match self.stand {
                BatterStand::Left => 1.0,
                BatterStand::Right => 0.0,
            },
        ]
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            inning: 1,
            balls: 0,
            strikes: 0,
            outs_when_up: 0,
            batting_score: 0,
            fielding_score: 0,
            stand: BatterStand::Left,
        }
    }
}
