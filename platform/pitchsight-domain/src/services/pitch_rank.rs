use crate::value_objects::prediction::{PitchTypeResult, PITCH_TYPE_COUNT};
use serde::Serialize;

pub const PITCH_TYPE_LABELS: [&str; PITCH_TYPE_COUNT] = [
    "Change-up",
    "Curveball",
    "Cutter",
    "Four-Seam Fastball",
    "Screwball",
    "Sinker",
    "Slider",
    "Splitter",
    "Sweeper",
    "Eephus",
    "Slurve",
    "Knuckleball",
    "Knuckle-curve",
    "Forkball",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPitch {
    pub rank: usize,
    pub pitch_type_id: usize,
    pub label: String,
    pub probability: f64,
}

pub fn label_for(pitch_type_id: usize) -> String {
    PITCH_TYPE_LABELS
        .get(pitch_type_id)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Pitch {pitch_type_id}"))
}

/// Top `n` pitch types by probability. Ties go to the lower id so the
/// ordering is deterministic across runs.
pub fn top_n(result: &PitchTypeResult, n: usize) -> Vec<RankedPitch> {
    let mut indexed: Vec<(usize, f64)> = result
        .probabilities
        .iter()
        .copied()
        .enumerate()
        .collect();
    indexed.sort_by(|(a_id, a_p), (b_id, b_p)| b_p.total_cmp(a_p).then(a_id.cmp(b_id)));

    indexed
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(idx, (pitch_type_id, probability))| RankedPitch {
            rank: idx + 1,
            pitch_type_id,
            label: label_for(pitch_type_id),
            probability,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{label_for, top_n};
    use crate::value_objects::prediction::{PitchTypeResult, PITCH_TYPE_COUNT};

    fn result_with(probabilities: Vec<f64>) -> PitchTypeResult {
        PitchTypeResult {
            predicted_type: None,
            probabilities,
        }
    }

    #[test]
    fn ranks_descending_with_one_based_rank() {
        let mut probs = vec![0.0; PITCH_TYPE_COUNT];
        probs[0] = 0.5;
        probs[1] = 0.3;
        probs[2] = 0.2;
        let ranked = top_n(&result_with(probs), 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(
            ranked
                .iter()
                .map(|r| (r.rank, r.pitch_type_id, r.probability))
                .collect::<Vec<_>>(),
            vec![(1, 0, 0.5), (2, 1, 0.3), (3, 2, 0.2)]
        );
        assert_eq!(ranked[0].label, "Change-up");
    }

    #[test]
    fn tie_at_the_top_goes_to_the_lower_id() {
        let mut probs = vec![0.0; PITCH_TYPE_COUNT];
        probs[3] = 0.4;
        probs[7] = 0.4;
        let ranked = top_n(&result_with(probs), 3);
        assert_eq!(ranked[0].pitch_type_id, 3);
        assert_eq!(ranked[1].pitch_type_id, 7);
    }

    #[test]
    fn returns_at_most_the_vector_length() {
        let ranked = top_n(&result_with(vec![0.6, 0.4]), 3);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn unknown_id_falls_back_to_generic_label() {
        assert_eq!(label_for(13), "Forkball");
        assert_eq!(label_for(14), "Pitch 14");
    }
}
