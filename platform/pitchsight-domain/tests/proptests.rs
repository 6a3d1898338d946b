use pitchsight_domain::services::pitch_rank::top_n;
use pitchsight_domain::services::zone_map::render_model;
use pitchsight_domain::value_objects::prediction::{
    PitchTypeResult, ZoneResult, PITCH_TYPE_COUNT, ZONE_COUNT,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn render_model_always_yields_thirteen_bounded_cells(
        probs in prop::collection::vec(0.0f64..1.0, ZONE_COUNT),
        predicted in prop::option::of(0usize..ZONE_COUNT),
    ) {
        let cells = render_model(&ZoneResult {
            predicted_zone: predicted,
            probabilities: probs,
        });
        prop_assert_eq!(cells.len(), ZONE_COUNT);
        for cell in &cells {
            prop_assert!((0.0..=1.0).contains(&cell.color_intensity));
        }
        let predicted_count = cells.iter().filter(|c| c.is_predicted).count();
        prop_assert_eq!(predicted_count, usize::from(predicted.is_some()));
    }

    #[test]
    fn top_n_is_sorted_and_deterministic(
        probs in prop::collection::vec(0.0f64..1.0, PITCH_TYPE_COUNT),
        n in 0usize..20,
    ) {
        let result = PitchTypeResult { predicted_type: None, probabilities: probs };
        let ranked = top_n(&result, n);
        prop_assert_eq!(ranked.len(), n.min(PITCH_TYPE_COUNT));
        for window in ranked.windows(2) {
            prop_assert!(window[0].probability >= window[1].probability);
            if window[0].probability == window[1].probability {
                prop_assert!(window[0].pitch_type_id < window[1].pitch_type_id);
            }
        }
        for (idx, pitch) in ranked.iter().enumerate() {
            prop_assert_eq!(pitch.rank, idx + 1);
        }
    }
}
