//! Property tests for the moderator duration parser.

use modwatch_common::utils::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_well_formed_durations_scale_by_unit(
        amount in 1u64..=10_000,
        unit in prop::sample::select(vec![('s', 1u64), ('m', 60), ('h', 3_600), ('d', 86_400)]),
    ) {
        let (suffix, multiplier) = unit;
        let input = format!("{amount}{suffix}");
        prop_assert_eq!(parse_mute_duration(Some(&input)), amount * multiplier);
    }

    #[test]
    fn test_parser_never_returns_zero(input in ".{0,12}") {
        prop_assert!(parse_mute_duration(Some(&input)) > 0);
    }

    #[test]
    fn test_unknown_suffixes_fall_back(amount in 1u64..=10_000, suffix in "[a-zA-Z&&[^sSmMhHdD]]") {
        let input = format!("{amount}{suffix}");
        prop_assert_eq!(parse_mute_duration(Some(&input)), DEFAULT_MUTE_SECONDS);
    }
}

#[test]
fn test_format_duration_round_numbers() {
    assert_eq!(format_duration_secs(86_400), "1d");
    assert_eq!(format_duration_secs(3_600), "1h");
    assert_eq!(format_duration_secs(59), "59s");
}
