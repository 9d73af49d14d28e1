//! # Scroll Storm Replay Tests
//!
//! End-to-end storms over both providers: every pattern must end hidden
//! with its listener detached, and identical inputs must replay to an
//! identical state checksum.

use scrollpeek_harness::{ProviderKind, StormConfig, StormPattern, run_storm};

// =============================================================================
// Helpers
// =============================================================================

fn patterns() -> Vec<StormPattern> {
    vec![
        StormPattern::default(),
        StormPattern::parse("fling").unwrap(),
        StormPattern::parse("sweep").unwrap(),
        StormPattern::Custom {
            events: vec![(0.0, 0), (1_000.0, 5), (500.0, 5_000), (500.0, 0)],
        },
    ]
}

fn providers() -> [ProviderKind; 2] {
    [ProviderKind::WholeViewport, ProviderKind::ScopedContainer]
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn every_pattern_passes_on_both_providers() {
    for provider in providers() {
        for pattern in patterns() {
            let name = pattern.name();
            let config = StormConfig::default()
                .with_seed(7)
                .with_rows(800)
                .with_provider(provider)
                .with_pattern(pattern);
            let result = run_storm(&config).unwrap();
            assert!(result.passed(), "{name} on {}: {}", provider.name(), result.jsonl);
            assert!(result.stats.shows >= 1);
        }
    }
}

#[test]
fn fling_shows_once_per_burst() {
    let config = StormConfig::default().with_pattern(StormPattern::Fling {
        bursts: 3,
        per_burst: 10,
        pause_ms: 2_000,
    });
    let result = run_storm(&config).unwrap();
    assert_eq!(result.stats.shows, 3);
    assert_eq!(result.stats.hides, 3);
}

#[test]
fn sweep_labels_never_go_backwards() {
    let config = StormConfig::default()
        .with_seed(11)
        .with_pattern(StormPattern::Sweep {
            steps: 30,
            interval_ms: 200,
        });
    let result = run_storm(&config).unwrap();

    let mut months: Vec<(u32, u32)> = Vec::new();
    for record in &result.states {
        let Some((mon, year)) = record.state.label.split_once(' ') else {
            continue;
        };
        let month = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ]
        .iter()
        .position(|m| *m == mon)
        .unwrap() as u32;
        months.push((year.parse().unwrap(), month));
    }
    assert!(!months.is_empty());
    assert!(months.windows(2).all(|w| w[0] <= w[1]), "{months:?}");
}

#[test]
fn states_are_timestamped_in_order() {
    let result = run_storm(&StormConfig::default().with_seed(5)).unwrap();
    assert!(result.states.windows(2).all(|w| w[0].at_ms <= w[1].at_ms));
    assert_eq!(result.states.last().map(|r| r.at_ms), Some(result.duration_ms));
}

#[test]
fn popup_never_leaves_the_screen() {
    for provider in providers() {
        for pattern in patterns() {
            let config = StormConfig::default()
                .with_seed(21)
                .with_provider(provider)
                .with_pattern(pattern);
            let (width, height) = config.screen;
            let popup = config.popup.clone();
            let result = run_storm(&config).unwrap();
            for record in result.states.iter().filter(|r| r.state.visible) {
                let state = &record.state;
                assert!(state.left >= 0.0, "{}: left {}", provider.name(), state.left);
                assert!(
                    state.left + popup.indicator_width <= width,
                    "{}: left {} past {width}",
                    provider.name(),
                    state.left
                );
                assert!(state.top + popup.indicator_height <= height);
            }
        }
    }
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn same_seed_replays_identically() {
    for provider in providers() {
        let config = StormConfig::default()
            .with_seed(1234)
            .with_provider(provider)
            .with_pattern(StormPattern::parse("fling").unwrap());
        let a = run_storm(&config).unwrap();
        let b = run_storm(&config).unwrap();
        assert_eq!(a.checksum, b.checksum);
        assert_eq!(a.states, b.states);
    }
}

#[test]
fn different_seeds_diverge() {
    let a = run_storm(&StormConfig::default().with_seed(1)).unwrap();
    let b = run_storm(&StormConfig::default().with_seed(2)).unwrap();
    assert_ne!(a.checksum, b.checksum);
}

// =============================================================================
// JSONL
// =============================================================================

#[test]
fn jsonl_has_start_scrolls_states_and_complete() {
    let config = StormConfig::default().with_pattern(StormPattern::Burst {
        count: 12,
        interval_ms: 16,
    });
    let result = run_storm(&config).unwrap();
    let events: Vec<serde_json::Value> = result
        .jsonl
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(events.first().unwrap()["event"], "storm_start");
    let complete = events.last().unwrap();
    assert_eq!(complete["event"], "storm_complete");
    assert_eq!(complete["outcome"], "pass");
    assert_eq!(complete["checksum"], result.checksum.as_str());

    let scrolls = events.iter().filter(|e| e["event"] == "storm_scroll").count();
    let states = events.iter().filter(|e| e["event"] == "storm_state").count();
    assert_eq!(scrolls, 12);
    assert_eq!(states, result.states.len());
}
