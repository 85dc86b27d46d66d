//! Scoring and rules tests - line values, goals, timings and rules files

use blockfall::core::scoring::{drop_score, goal_reduction, line_clear_score, line_score_category};
use blockfall::core::{Rules, RulesError, Timing};
use blockfall::types::LineScore;

#[test]
fn test_line_scores_scale_with_level() {
    let rules = Rules::default();
    assert_eq!(line_clear_score(&rules, 0, 1, false), 0);
    assert_eq!(line_clear_score(&rules, 1, 1, false), 100);
    assert_eq!(line_clear_score(&rules, 2, 1, false), 300);
    assert_eq!(line_clear_score(&rules, 3, 2, false), 1000);
    assert_eq!(line_clear_score(&rules, 4, 3, false), 2400);
}

#[test]
fn test_back_to_back_only_boosts_tetris() {
    let rules = Rules::default();
    assert_eq!(line_clear_score(&rules, 4, 1, true), 1200);
    assert_eq!(line_clear_score(&rules, 1, 1, true), 100);
    assert_eq!(goal_reduction(&rules, 4, true), 12);
    assert_eq!(goal_reduction(&rules, 4, false), 8);
    assert_eq!(goal_reduction(&rules, 2, true), 3);
}

#[test]
fn test_categories() {
    assert_eq!(line_score_category(0, false), None);
    assert_eq!(line_score_category(1, true), Some(LineScore::Single));
    assert_eq!(line_score_category(3, false), Some(LineScore::Triple));
    assert_eq!(line_score_category(4, false), Some(LineScore::Tetris));
    assert_eq!(line_score_category(4, true), Some(LineScore::BackToBack));
}

#[test]
fn test_drop_points() {
    let rules = Rules::default();
    assert_eq!(drop_score(&rules, 10, false), 10);
    assert_eq!(drop_score(&rules, 10, true), 20);
    assert_eq!(drop_score(&rules, 0, true), 0);
}

#[test]
fn test_level_two_timing() {
    let rules = Rules::default();
    let one = Timing::for_level(&rules, 1);
    let two = Timing::for_level(&rules, 2);
    assert_eq!(one.fall, 1.0);
    assert_eq!(one.lock, 0.5);
    assert!((two.fall - 1.0 / 1.3).abs() < 1e-12);
    assert!((two.soft_drop - 0.068 / 1.15).abs() < 1e-12);
    assert_eq!(two.lock, two.fall / 2.0);
}

#[test]
fn test_goal_per_level() {
    let rules = Rules::default();
    assert_eq!(rules.goal_for_level(1), 5);
    assert_eq!(rules.goal_for_level(4), 20);
}

#[test]
fn test_partial_rules_file_keeps_defaults() {
    let rules = Rules::from_json_str(r#"{ "goal_per_level": 2, "lock_reset_cap": 15 }"#)
        .expect("valid rules");
    assert_eq!(rules.goal_per_level, 2);
    assert_eq!(rules.lock_reset_cap, 15);
    assert_eq!(rules.line_scores, Rules::default().line_scores);
}

#[test]
fn test_invalid_rules_are_rejected() {
    let err = Rules::from_json_str(r#"{ "gravity_base": 0.0 }"#).unwrap_err();
    assert!(matches!(
        err,
        RulesError::Invalid {
            field: "gravity_base",
            ..
        }
    ));

    let err = Rules::from_json_str(r#"{ "goal_per_level": 0 }"#).unwrap_err();
    assert!(matches!(
        err,
        RulesError::Invalid {
            field: "goal_per_level",
            ..
        }
    ));

    let err = Rules::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, RulesError::Parse(_)));
}

#[test]
fn test_missing_rules_file_is_io_error() {
    let err = Rules::from_path("/nonexistent/blockfall-rules.json").unwrap_err();
    assert!(matches!(err, RulesError::Io(_)));
}

#[test]
fn test_rules_file_round_trip_on_disk() {
    let path = std::env::temp_dir().join(format!("blockfall-rules-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "hard_drop_points": 3 }"#).expect("write rules");
    let rules = Rules::from_path(&path).expect("load rules");
    let _ = std::fs::remove_file(&path);
    assert_eq!(rules.hard_drop_points, 3);
    assert_eq!(drop_score(&rules, 4, true), 12);
}
