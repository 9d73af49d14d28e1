//! Property-based storm invariants.
//!
//! 1. Any custom storm ends hidden with no listener left attached.
//! 2. Shows and hides pair up.
//! 3. Replaying the same storm reproduces the checksum.

use proptest::prelude::*;
use scrollpeek_harness::{ProviderKind, StormConfig, StormPattern, run_storm};

fn provider_strategy() -> impl Strategy<Value = ProviderKind> {
    prop_oneof![
        Just(ProviderKind::WholeViewport),
        Just(ProviderKind::ScopedContainer),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1–3. Custom storms
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn custom_storms_settle_and_replay(
        events in prop::collection::vec((0.0f64..20_000.0, 0u64..2_500), 1..40),
        provider in provider_strategy(),
        seed in any::<u64>(),
    ) {
        let config = StormConfig::default()
            .with_seed(seed)
            .with_rows(600)
            .with_provider(provider)
            .with_pattern(StormPattern::Custom { events });

        let first = run_storm(&config).unwrap();
        prop_assert!(first.ended_hidden);
        prop_assert_eq!(first.leaked_listeners, 0);
        prop_assert_eq!(first.stats.shows, first.stats.hides);
        prop_assert!(first.stats.shows >= 1);

        let second = run_storm(&config).unwrap();
        prop_assert_eq!(first.checksum, second.checksum);
    }

    #[test]
    fn generated_patterns_pass(seed in any::<u64>(), provider in provider_strategy()) {
        for name in ["burst", "fling", "sweep"] {
            let config = StormConfig::default()
                .with_seed(seed)
                .with_rows(300)
                .with_provider(provider)
                .with_pattern(StormPattern::parse(name).unwrap());
            let result = run_storm(&config).unwrap();
            prop_assert!(result.passed(), "{} failed", name);
        }
    }
}
