use gridtables::provider::DEFAULT_TIMEOUT_MESSAGE;
use gridtables::{GridConfig, GridProvider, GridSource};
use std::time::Duration;

mod common;
use common::{people_catalog, request_with_searches, setup_test_db};

#[tokio::test]
async fn spent_budget_degrades_to_an_empty_page() {
    let db = setup_test_db().await.expect("Failed to setup test database");

    let response = GridProvider::new(request_with_searches(&[("name", Some("Smith"))]))
        .time_budget(Duration::ZERO)
        .provide(&db, GridSource::new("people"), &people_catalog())
        .await
        .expect("provide failed");

    assert_eq!(response.draw, 1);
    assert_eq!(response.records_total, 0);
    assert_eq!(response.records_filtered, 0);
    assert!(response.data.is_empty());
    assert_eq!(response.error.as_deref(), Some(DEFAULT_TIMEOUT_MESSAGE));
}

#[tokio::test]
async fn degraded_responses_use_the_configured_message() {
    let db = setup_test_db().await.expect("Failed to setup test database");

    let response = GridProvider::new(request_with_searches(&[]))
        .time_budget(Duration::ZERO)
        .timeout_message("grid query took too long, narrow the search")
        .provide(&db, GridSource::new("people"), &people_catalog())
        .await
        .expect("provide failed");

    assert_eq!(
        response.error.as_deref(),
        Some("grid query took too long, narrow the search")
    );
}

#[tokio::test]
async fn config_default_budget_applies_when_no_per_call_override() {
    let db = setup_test_db().await.expect("Failed to setup test database");

    let config = GridConfig {
        time_budget: Some(Duration::ZERO),
        ..GridConfig::default()
    };
    let response = GridProvider::with_config(request_with_searches(&[]), config)
        .provide(&db, GridSource::new("people"), &people_catalog())
        .await
        .expect("provide failed");

    assert!(response.error.is_some());
}

#[tokio::test]
async fn per_call_budget_overrides_the_config_default() {
    let db = setup_test_db().await.expect("Failed to setup test database");

    // the config would degrade immediately, the per-call budget is generous
    let config = GridConfig {
        time_budget: Some(Duration::ZERO),
        ..GridConfig::default()
    };
    let response = GridProvider::with_config(request_with_searches(&[]), config)
        .time_budget(Duration::from_secs(60))
        .provide(&db, GridSource::new("people"), &people_catalog())
        .await
        .expect("provide failed");

    assert!(response.error.is_none());
    assert_eq!(response.records_total, 5);
}

#[tokio::test]
async fn unlimited_calls_never_degrade() {
    let db = setup_test_db().await.expect("Failed to setup test database");

    let response = GridProvider::new(request_with_searches(&[]))
        .provide(&db, GridSource::new("people"), &people_catalog())
        .await
        .expect("provide failed");

    assert!(response.error.is_none());
}
