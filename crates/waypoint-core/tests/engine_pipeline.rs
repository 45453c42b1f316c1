//! End-to-end tests for the visit store, miner, predictor and metrics.
//!
//! These tests verify:
//! - Importing the workday fixture log (including malformed lines)
//! - Mining the lookback window into a snapshot
//! - Predicting from explicit and stored context
//! - Accuracy tracking when visits arrive after predictions

use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use waypoint_core::{EngineSettings, MetricsStore, PredictionConfig, PredictionEngine, VisitStore};
use waypoint_types::{PredictionMetrics, SuggestedAction, VisitRecord};

/// Time of the last visit in the fixture.
const FIXTURE_NOW: i64 = 1_767_431_040_000;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join("visit_logs")
        .join(name)
}

fn engine_with(settings: EngineSettings) -> PredictionEngine {
    let store = Arc::new(VisitStore::open_in_memory().unwrap());
    let stats = store.import_jsonl(&fixture_path("workday.jsonl")).unwrap();
    assert_eq!(stats.imported, 16);
    PredictionEngine::new(store, Arc::new(MetricsStore::new()), settings)
}

#[test]
fn test_import_skips_malformed_lines() {
    let store = VisitStore::open_in_memory().unwrap();
    let stats = store.import_jsonl(&fixture_path("workday.jsonl")).unwrap();

    assert_eq!(stats.imported, 16);
    assert_eq!(stats.skipped, 3);
    assert_eq!(store.count().unwrap(), 16);

    // Domains missing from the log are derived from the URL.
    let reddit = store.latest_for_domain("reddit.com").unwrap().unwrap();
    assert_eq!(reddit.title, "r/rust");
    let docs = store.latest_for_domain("docs.rs").unwrap().unwrap();
    assert_eq!(docs.time_spent, Some(240));
}

#[test]
fn test_remine_builds_snapshot() {
    let engine = engine_with(EngineSettings::default());
    assert!(engine.patterns(None).is_empty());

    let snapshot = engine.remine(FIXTURE_NOW).unwrap();
    assert_eq!(snapshot.visits_considered, 16);
    assert!(!snapshot.patterns.is_empty());

    let mail_calendar = snapshot
        .patterns
        .iter()
        .find(|p| p.sequence == ["mail.google.com", "calendar.google.com"])
        .unwrap();
    assert_eq!(mail_calendar.frequency, 3);
    assert_eq!(mail_calendar.next_domains.get("github.com"), Some(&3));

    assert_eq!(engine.patterns(Some(4)).len(), 4);
    assert_eq!(engine.snapshot().run_id, snapshot.run_id);

    let metrics = engine.metrics();
    assert_eq!(metrics.patterns_detected, snapshot.patterns.len() as u64);
    assert!(metrics.sequences_learned > 0);
    assert!(metrics.sequences_learned <= metrics.patterns_detected);
}

#[test]
fn test_lookback_excludes_old_visits() {
    let engine = engine_with(EngineSettings {
        history_lookback_days: 1,
        ..Default::default()
    });

    // The window starts exactly at the previous day's last visit.
    let snapshot = engine.remine(FIXTURE_NOW).unwrap();
    assert_eq!(snapshot.visits_considered, 6);
    assert!(snapshot.patterns.iter().all(|p| p.frequency == 1));

    // Mining far in the future leaves nothing.
    let snapshot = engine.remine(FIXTURE_NOW + 30 * DAY_MS).unwrap();
    assert_eq!(snapshot.visits_considered, 0);
    assert!(snapshot.patterns.is_empty());
}

#[test]
fn test_history_limit_caps_window() {
    let engine = engine_with(EngineSettings {
        history_limit: 10,
        ..Default::default()
    });
    let snapshot = engine.remine(FIXTURE_NOW).unwrap();
    assert_eq!(snapshot.visits_considered, 10);
}

#[test]
fn test_predict_for_explicit_context() {
    let engine = engine_with(EngineSettings::default());
    engine.remine(FIXTURE_NOW).unwrap();

    let batch = engine
        .predict_for(&["mail.google.com", "calendar.google.com"])
        .unwrap();
    assert_eq!(batch.snapshot.run_id, engine.snapshot().run_id);
    assert_eq!(batch.context, vec!["mail.google.com", "calendar.google.com"]);

    let predictions = batch.predictions;
    assert_eq!(predictions.len(), 1);
    let github = &predictions[0];
    assert_eq!(github.domain, "github.com");
    assert_eq!(github.url, "https://github.com/acme/api/pulls");
    assert_eq!(github.title, "Pull requests · acme/api");
    assert!(github.confidence > 0.7);
    assert_eq!(github.suggested_action, SuggestedAction::Preload);
    assert_eq!(github.patterns, vec!["mail.google.com → calendar.google.com"]);

    assert_eq!(engine.last_predictions(), predictions);
    let metrics = engine.metrics();
    assert_eq!(metrics.predictions_generated, 1);
    assert_eq!(metrics.predictions_shown, 1);
    assert!((metrics.avg_confidence - github.confidence).abs() < 1e-12);
}

#[test]
fn test_predict_current_uses_recent_history() {
    let engine = engine_with(EngineSettings {
        prediction: PredictionConfig {
            min_confidence_threshold: 0.2,
            ..Default::default()
        },
        ..Default::default()
    });
    engine.remine(FIXTURE_NOW).unwrap();

    let batch = engine.predict_current().unwrap();
    let predictions = batch.predictions;
    assert_eq!(
        batch.context,
        vec![
            "mail.google.com",
            "calendar.google.com",
            "github.com",
            "docs.rs",
            "news.ycombinator.com"
        ]
    );

    // After the news site the log went once to reddit and once back to mail.
    let domains: Vec<&str> = predictions.iter().map(|p| p.domain.as_str()).collect();
    assert_eq!(domains, vec!["mail.google.com", "reddit.com"]);
    assert!(predictions.iter().all(|p| p.confidence >= 0.2));
    assert_eq!(predictions[0].patterns.len(), 4);
}

#[test]
fn test_default_threshold_filters_weak_continuations() {
    let engine = engine_with(EngineSettings::default());
    engine.remine(FIXTURE_NOW).unwrap();

    let batch = engine.predict_current().unwrap();
    assert!(batch.predictions.is_empty());
}

#[test]
fn test_visits_score_accuracy() {
    let engine = engine_with(EngineSettings::default());
    engine.remine(FIXTURE_NOW).unwrap();

    // No standing predictions: nothing to evaluate.
    let first = engine
        .record_visit(VisitRecord::new(
            "https://mail.google.com/",
            "Inbox",
            "mail.google.com",
            FIXTURE_NOW + 60_000,
        ))
        .unwrap();
    assert_eq!(first.predicted, None);

    engine
        .predict_for(&["mail.google.com", "calendar.google.com"])
        .unwrap();
    let hit = engine
        .record_visit(VisitRecord::new(
            "https://github.com/acme/api",
            "acme/api",
            "github.com",
            FIXTURE_NOW + 120_000,
        ))
        .unwrap();
    assert_eq!(hit.predicted, Some(true));
    assert!(engine.last_predictions().is_empty());

    engine
        .predict_for(&["mail.google.com", "calendar.google.com"])
        .unwrap();
    let miss = engine
        .record_visit(VisitRecord::new(
            "https://docs.rs/",
            "Docs.rs",
            "docs.rs",
            FIXTURE_NOW + 180_000,
        ))
        .unwrap();
    assert_eq!(miss.predicted, Some(false));

    let metrics = engine.metrics();
    assert_eq!(metrics.outcomes_evaluated, 2);
    assert_eq!(metrics.outcomes_hit, 1);
    assert!((metrics.accuracy - 0.5).abs() < 1e-12);
    assert_eq!(engine.store().count().unwrap(), 19);

    engine.reset_metrics();
    assert_eq!(engine.metrics(), PredictionMetrics::default());
}

#[test]
fn test_malformed_visit_is_rejected() {
    let engine = engine_with(EngineSettings::default());
    let result = engine.record_visit(VisitRecord::new("about:blank", "", "", FIXTURE_NOW));
    assert!(result.is_err());
    assert_eq!(engine.store().count().unwrap(), 16);
}

#[test]
fn test_empty_store_yields_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(VisitStore::open(&temp_dir.path().join("nested").join("visits.db")).unwrap());
    let engine = PredictionEngine::new(store, Arc::new(MetricsStore::new()), EngineSettings::default());

    let snapshot = engine.remine(FIXTURE_NOW).unwrap();
    assert!(snapshot.patterns.is_empty());

    let batch = engine.predict_current().unwrap();
    assert!(batch.context.is_empty());
    assert!(batch.predictions.is_empty());
    assert_eq!(engine.metrics(), PredictionMetrics::default());
}

#[test]
fn test_failed_insert_leaves_metrics_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("visits.db");
    let store = Arc::new(VisitStore::open(&db_path).unwrap());
    store.import_jsonl(&fixture_path("workday.jsonl")).unwrap();
    let engine = PredictionEngine::new(store, Arc::new(MetricsStore::new()), EngineSettings::default());
    engine.remine(FIXTURE_NOW).unwrap();

    let batch = engine
        .predict_for(&["mail.google.com", "calendar.google.com"])
        .unwrap();
    assert_eq!(batch.predictions.len(), 1);
    let before = engine.metrics();

    // Break the schema behind the engine's back.
    rusqlite::Connection::open(&db_path)
        .unwrap()
        .execute("DROP TABLE visits", [])
        .unwrap();

    let result = engine.record_visit(VisitRecord::new(
        "https://github.com/acme/api",
        "acme/api",
        "github.com",
        FIXTURE_NOW + 60_000,
    ));
    assert!(result.is_err());
    assert_eq!(engine.metrics(), before);
    assert_eq!(engine.metrics().outcomes_evaluated, 0);
    assert_eq!(engine.last_predictions(), batch.predictions);
}

#[test]
fn test_batch_keeps_the_run_it_used() {
    let engine = engine_with(EngineSettings::default());
    let first = engine.remine(FIXTURE_NOW).unwrap();

    let batch = engine
        .predict_for(&["mail.google.com", "calendar.google.com"])
        .unwrap();
    let second = engine.remine(FIXTURE_NOW).unwrap();

    assert_eq!(batch.snapshot.run_id, first.run_id);
    assert_ne!(batch.snapshot.run_id, second.run_id);
    assert_eq!(engine.snapshot().run_id, second.run_id);
}

#[test]
fn test_single_domain_context_matches_nothing() {
    let engine = engine_with(EngineSettings {
        prediction: PredictionConfig {
            min_confidence_threshold: 0.0,
            ..Default::default()
        },
        ..Default::default()
    });
    engine.remine(FIXTURE_NOW).unwrap();

    let batch = engine.predict_for(&["calendar.google.com"]).unwrap();
    assert!(batch.predictions.is_empty());
    assert_eq!(engine.metrics().predictions_generated, 0);
}
