use crate::value_objects::game_state::GameState;
use serde::{Deserialize, Serialize};

/// A previously submitted game situation kept by the pitch-log service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchRecord {
    pub id: u64,
    #[serde(flatten)]
    pub state: GameState,
}

#[cfg(test)]
mod tests {
    use super::PitchRecord;
    use crate::value_objects::game_state::{BatterStand, GameState};

    #[test]
    fn record_round_trips_with_flattened_state() {
        let record = PitchRecord {
            id: 42,
            state: GameState {
                inning: 3,
                balls: 1,
                strikes: 2,
                outs_when_up: 0,
                batting_score: 5,
                fielding_score: 2,
                stand: BatterStand::Right,
            },
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"inning\":3"));
        let parsed: PitchRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
