use crate::value_objects::game_state::{BatterStand, GameState};
use std::collections::BTreeMap;

const INNING_MIN: u32 = 1;
const INNING_MAX: u32 = 20;
const BALLS_MAX: u32 = 3;
const STRIKES_MAX: u32 = 2;
const OUTS_MAX: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    Inning,
    Balls,
    Strikes,
    Outs,
    BattingScore,
    FieldingScore,
    Stand,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Inning,
        FormField::Balls,
        FormField::Strikes,
        FormField::Outs,
        FormField::BattingScore,
        FormField::FieldingScore,
        FormField::Stand,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Inning => "inning",
            FormField::Balls => "balls",
            FormField::Strikes => "strikes",
            FormField::Outs => "outs",
            FormField::BattingScore => "bat score",
            FormField::FieldingScore => "field score",
            FormField::Stand => "stand",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FormField::Inning => FormField::Balls,
            FormField::Balls => FormField::Strikes,
            FormField::Strikes => FormField::Outs,
            FormField::Outs => FormField::BattingScore,
            FormField::BattingScore => FormField::FieldingScore,
            FormField::FieldingScore => FormField::Stand,
            FormField::Stand => FormField::Inning,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Inning => FormField::Stand,
            FormField::Balls => FormField::Inning,
            FormField::Strikes => FormField::Balls,
            FormField::Outs => FormField::Strikes,
            FormField::BattingScore => FormField::Outs,
            FormField::FieldingScore => FormField::BattingScore,
            FormField::Stand => FormField::FieldingScore,
        }
    }
}

/// Raw operator input, one string per form field, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGameForm {
    pub inning: String,
    pub balls: String,
    pub strikes: String,
    pub outs_when_up: String,
    pub batting_score: String,
    pub fielding_score: String,
    pub stand: String,
}

impl RawGameForm {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            inning: state.inning.to_string(),
            balls: state.balls.to_string(),
            strikes: state.strikes.to_string(),
            outs_when_up: state.outs_when_up.to_string(),
            batting_score: state.batting_score.to_string(),
            fielding_score: state.fielding_score.to_string(),
            stand: state.stand.as_str().to_string(),
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Inning => &self.inning,
            FormField::Balls => &self.balls,
            FormField::Strikes => &self.strikes,
            FormField::Outs => &self.outs_when_up,
            FormField::BattingScore => &self.batting_score,
            FormField::FieldingScore => &self.fielding_score,
            FormField::Stand => &self.stand,
        }
    }
}

pub type FieldErrors = BTreeMap<FormField, String>;

/// Checks one field, used for loss-of-focus feedback while editing.
pub fn validate_field(field: FormField, raw: &str) -> Result<(), String> {
    match field {
        FormField::Inning => parse_in_range(raw, INNING_MIN, INNING_MAX).map(|_| ()),
        FormField::Balls => parse_in_range(raw, 0, BALLS_MAX).map(|_| ()),
        FormField::Strikes => parse_in_range(raw, 0, STRIKES_MAX).map(|_| ()),
        FormField::Outs => parse_in_range(raw, 0, OUTS_MAX).map(|_| ()),
        FormField::BattingScore => parse_in_range(raw, 0, u32::MAX).map(|_| ()),
        FormField::FieldingScore => parse_in_range(raw, 0, u32::MAX).map(|_| ()),
        FormField::Stand => parse_stand(raw).map(|_| ()),
    }
}

/// Exhaustive check at submit time. Empty or non-numeric input is an error;
/// nothing is coerced to a default. On failure the complete error map comes
/// back so every invalid field can be surfaced at once.
pub fn validate(form: &RawGameForm) -> Result<GameState, FieldErrors> {
    let mut errors = FieldErrors::new();

    let inning = collect(&mut errors, FormField::Inning, {
        parse_in_range(&form.inning, INNING_MIN, INNING_MAX)
    });
    let balls = collect(&mut errors, FormField::Balls, {
        parse_in_range(&form.balls, 0, BALLS_MAX)
    });
    let strikes = collect(&mut errors, FormField::Strikes, {
        parse_in_range(&form.strikes, 0, STRIKES_MAX)
    });
    let outs_when_up = collect(&mut errors, FormField::Outs, {
        parse_in_range(&form.outs_when_up, 0, OUTS_MAX)
    });
    let batting_score = collect(&mut errors, FormField::BattingScore, {
        parse_in_range(&form.batting_score, 0, u32::MAX)
    });
    let fielding_score = collect(&mut errors, FormField::FieldingScore, {
        parse_in_range(&form.fielding_score, 0, u32::MAX)
    });
    let stand = collect(&mut errors, FormField::Stand, parse_stand(&form.stand));

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(GameState {
        inning: inning.unwrap_or(INNING_MIN),
        balls: balls.unwrap_or(0),
        strikes: strikes.unwrap_or(0),
        outs_when_up: outs_when_up.unwrap_or(0),
        batting_score: batting_score.unwrap_or(0),
        fielding_score: fielding_score.unwrap_or(0),
        stand: stand.unwrap_or(BatterStand::Left),
    })
}

fn collect<T>(
    errors: &mut FieldErrors,
    field: FormField,
    result: Result<T, String>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(message) => {
            errors.insert(field, message);
            None
        }
    }
}

fn parse_in_range(raw: &str, min: u32, max: u32) -> Result<u32, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("required".to_string());
    }
    let value: u32 = trimmed
        .parse()
        .map_err(|_| format!("not a number: {trimmed}"))?;
    if value < min || value > max {
        if max == u32::MAX {
            return Err(format!("must be at least {min}"));
        }
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(value)
}

fn parse_stand(raw: &str) -> Result<BatterStand, String> {
    // Absent stand defaults to Left; anything else must be L or R.
    match raw.trim() {
        "" => Ok(BatterStand::Left),
        "L" | "l" => Ok(BatterStand::Left),
        "R" | "r" => Ok(BatterStand::Right),
        other => Err(format!("must be L or R, got {other}")),
    }
}
