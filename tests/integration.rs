//! Integration tests for the selective validation engine

mod common;

use brand_forge::{
    domain::DEFAULT_SUFFIXES,
    trademark::TrademarkAssessor,
    types::{Availability, CandidateName, Confidence, SeoOutcome, TrademarkSource},
    validation::{NoProgress, ValidationCoordinator, ValidationReport, VerdictStatus},
    HeuristicSeoOptimizer,
};
use common::*;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn selection(names: &[&str]) -> Vec<CandidateName> {
    names.iter().map(|n| CandidateName::bare(*n)).collect()
}

#[tokio::test]
async fn test_selection_yields_one_record_per_name_in_order() {
    let probe = Arc::new(ScriptedProbe::new().taking(&["mealmind.io", "mealmind.co"]));
    let coordinator = coordinator(probe.clone());

    let report = coordinator
        .validate_selection(
            &selection(&["MealMind", "PlateWise", "Yumora"]),
            &brief(),
            &NoProgress,
            &CancellationToken::new(),
        )
        .await;

    let names: Vec<&str> = report.records.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["MealMind", "PlateWise", "Yumora"]);

    let mealmind = &report.records[0];
    assert_eq!(mealmind.domains.checks.len(), 10);
    assert_eq!(mealmind.domains.available().count(), 8);
    assert_eq!(mealmind.domains.taken().count(), 2);
    assert!(mealmind.domains.alternatives.is_empty());
    assert_eq!(mealmind.verdict.best_available.as_deref(), Some(".com"));
    assert_eq!(probe.calls(), 30);
}

#[tokio::test]
async fn test_fully_taken_name_gets_prefix_alternatives() {
    let taken: Vec<String> = DEFAULT_SUFFIXES.iter().map(|s| format!("mealmind.{}", s)).collect();
    let taken: Vec<&str> = taken.iter().map(String::as_str).collect();
    let probe = Arc::new(ScriptedProbe::new().taking(&taken));
    let coordinator = coordinator(probe.clone());

    let report = coordinator
        .validate_selection(&selection(&["MealMind"]), &brief(), &NoProgress, &CancellationToken::new())
        .await;

    let record = &report.records[0];
    assert_eq!(record.domains.taken().count(), 10);
    assert_eq!(
        record.alternative_suggestions(),
        vec![
            "getmealmind.com",
            "trymealmind.com",
            "yourmealmind.com",
            "mymealmind.com",
            "hellomealmind.com",
            "usemealmind.com",
        ]
    );
    assert_eq!(probe.calls(), 16);
    assert!(record.verdict.best_available.is_none());
    assert_ne!(record.verdict.status, VerdictStatus::Clear);
}

#[tokio::test]
async fn test_repeat_validation_is_served_from_cache() {
    let probe = Arc::new(ScriptedProbe::new());
    let coordinator = coordinator(probe.clone());
    let cancel = CancellationToken::new();
    let names = selection(&["PlateWise"]);

    let first = coordinator.validate_selection(&names, &brief(), &NoProgress, &cancel).await;
    let second = coordinator.validate_selection(&names, &brief(), &NoProgress, &cancel).await;

    assert_eq!(probe.calls(), 10);
    assert_eq!(coordinator.domain_validator().metrics().cache_hits, 10);
    let first_state: Vec<Availability> = first.records[0].domains.checks.iter().map(|c| c.availability).collect();
    let second_state: Vec<Availability> = second.records[0].domains.checks.iter().map(|c| c.availability).collect();
    assert_eq!(first_state, second_state);
    assert!(second.records[0]
        .domains
        .checks
        .iter()
        .all(|c| c.confidence == Confidence::Cached));
}

#[tokio::test]
async fn test_exhausted_retries_assume_available() {
    let probe = Arc::new(ScriptedProbe::new().flaky(&["yumora.ai"]));
    let coordinator = coordinator(probe.clone());

    let report = coordinator
        .validate_selection(&selection(&["Yumora"]), &brief(), &NoProgress, &CancellationToken::new())
        .await;

    let check = report.records[0]
        .domains
        .checks
        .iter()
        .find(|c| c.domain == "yumora.ai")
        .unwrap();
    assert_eq!(check.availability, Availability::Available);
    assert_eq!(check.confidence, Confidence::AssumedAvailable);
    assert!(check.error_message.is_some());
    // 1 attempt + 2 retries for the flaky domain, 1 for each other
    assert_eq!(probe.calls(), 12);
    assert_eq!(coordinator.domain_validator().metrics().fallbacks, 1);
    assert!(report.records[0]
        .verdict
        .concerns
        .iter()
        .any(|c| c.contains("could not be confirmed")));
}

#[tokio::test]
async fn test_seo_failure_becomes_unknown() {
    let coordinator = ValidationCoordinator::new(
        validator(Arc::new(ScriptedProbe::new())),
        TrademarkAssessor::simulated(),
        Arc::new(FailingSeo),
    );

    let report = coordinator
        .validate_selection(&selection(&["MealMind", "Yumora"]), &brief(), &NoProgress, &CancellationToken::new())
        .await;

    assert_eq!(report.len(), 2);
    for record in &report.records {
        match &record.seo {
            SeoOutcome::Unknown { reason } => assert!(reason.contains("unreachable")),
            other => panic!("expected unknown SEO, got {:?}", other),
        }
        assert_eq!(record.domains.checks.len(), 10);
    }
}

#[tokio::test]
async fn test_unreachable_trademark_service_degrades() {
    let coordinator = ValidationCoordinator::new(
        validator(Arc::new(ScriptedProbe::new())),
        TrademarkAssessor::with_service(Arc::new(UnreachableTrademarkService)),
        Arc::new(HeuristicSeoOptimizer::new()),
    );

    let report = coordinator
        .validate_selection(&selection(&["MealMind"]), &brief(), &NoProgress, &CancellationToken::new())
        .await;

    let record = &report.records[0];
    assert!(record.trademark_degraded);
    assert!(record.trademark.degraded);
    assert_eq!(record.trademark.source, TrademarkSource::Simulated);
    assert!(matches!(record.seo, SeoOutcome::Optimized(_)));
}

#[tokio::test]
async fn test_cancelled_validation_still_returns_full_records() {
    let coordinator = coordinator(Arc::new(StalledProbe));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        coordinator.validate_selection(&selection(&["MealMind", "Yumora"]), &brief(), &NoProgress, &cancel),
    )
    .await
    .expect("cancellation should stop validation promptly");

    assert_eq!(report.len(), 2);
    for record in &report.records {
        assert_eq!(record.domains.checks.len(), 10);
        assert!(record.domains.alternatives.is_empty());
        assert!(record
            .domains
            .checks
            .iter()
            .all(|c| c.confidence == Confidence::Cancelled && c.availability == Availability::Unknown));
    }
    assert_eq!(coordinator.domain_validator().cache().len(), 0);
}

#[tokio::test]
async fn test_invalid_name_is_folded_into_record() {
    let coordinator = coordinator(Arc::new(ScriptedProbe::new()));

    let report = coordinator
        .validate_selection(&selection(&["!!!", "Yumora"]), &brief(), &NoProgress, &CancellationToken::new())
        .await;

    assert_eq!(report.len(), 2);
    assert!(report.records[0].domains.error_message.is_some());
    assert!(report.records[0].domains.checks.is_empty());
    assert_eq!(report.records[1].domains.checks.len(), 10);
}

#[tokio::test]
async fn test_report_export_round_trip() {
    let coordinator = coordinator(Arc::new(ScriptedProbe::new().taking(&["yumora.com"])));
    let report = coordinator
        .validate_selection(&selection(&["MealMind", "Yumora"]), &brief(), &NoProgress, &CancellationToken::new())
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports").join("shortlist.json");
    report.export_json(&path).unwrap();

    let loaded = ValidationReport::load_json(&path).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.records[1].name(), "Yumora");
    assert_eq!(loaded.summary(), report.summary());
    assert_eq!(loaded.ranked()[0].name(), "MealMind");
}
