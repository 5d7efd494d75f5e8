//! Integration tests for the admin index-report API and health probes.
//!
//! These tests require a running server and MongoDB; see the crate docs.
//! They skip themselves when `CARDFOLIO_BASE_URL` is not set.

use reqwest::{Client, StatusCode};
use serde_json::Value;

use cardfolio_integration_tests::base_url;

#[tokio::test]
async fn test_index_report_for_cards_collection() {
    let Some(base) = base_url() else {
        eprintln!("CARDFOLIO_BASE_URL not set, skipping");
        return;
    };
    let client = Client::new();

    let report: Value = client
        .get(format!("{base}/api/admin/indexes/pokemon_cards"))
        .send()
        .await
        .expect("Failed to fetch index report")
        .json()
        .await
        .expect("Invalid report response");

    assert_eq!(report["collection"], "pokemon_cards");
    let indexes = report["indexes"].as_array().expect("missing indexes");
    assert_eq!(report["totalIndexCount"], indexes.len());

    // The unique name+set index is provisioned at startup
    assert!(indexes.iter().any(|idx| {
        idx["key"]["name"] == 1 && idx["key"]["set"] == 1 && idx["unique"] == true
    }));
}

#[tokio::test]
async fn test_index_report_for_owners_collection() {
    let Some(base) = base_url() else {
        eprintln!("CARDFOLIO_BASE_URL not set, skipping");
        return;
    };
    let client = Client::new();

    let report: Value = client
        .get(format!("{base}/api/admin/indexes/card_owners"))
        .send()
        .await
        .expect("Failed to fetch index report")
        .json()
        .await
        .expect("Invalid report response");

    assert_eq!(report["collection"], "card_owners");
    let indexes = report["indexes"].as_array().expect("missing indexes");
    assert!(indexes.iter().any(|idx| {
        idx["key"]["email"] == 1 && idx["unique"] == true
    }));
}

#[tokio::test]
async fn test_unknown_collection_is_bad_request() {
    let Some(base) = base_url() else {
        eprintln!("CARDFOLIO_BASE_URL not set, skipping");
        return;
    };
    let client = Client::new();
    let resp = client
        .get(format!("{base}/api/admin/indexes/users"))
        .send()
        .await
        .expect("Failed to fetch index report");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_combined_report_covers_both_collections() {
    let Some(base) = base_url() else {
        eprintln!("CARDFOLIO_BASE_URL not set, skipping");
        return;
    };
    let client = Client::new();
    let combined: Value = client
        .get(format!("{base}/api/admin/indexes"))
        .send()
        .await
        .expect("Failed to fetch combined report")
        .json()
        .await
        .expect("Invalid report response");

    assert!(combined["pokemon_cards"].is_object());
    assert!(combined["card_owners"].is_object());
}

#[tokio::test]
async fn test_health_probes() {
    let Some(base) = base_url() else {
        eprintln!("CARDFOLIO_BASE_URL not set, skipping");
        return;
    };
    let client = Client::new();

    let health: Value = client
        .get(format!("{base}/health"))
        .send()
        .await
        .expect("Failed to fetch health")
        .json()
        .await
        .expect("Invalid health response");
    assert_eq!(health["status"], "UP");

    let liveness: Value = client
        .get(format!("{base}/health/liveness"))
        .send()
        .await
        .expect("Failed to fetch liveness")
        .json()
        .await
        .expect("Invalid liveness response");
    assert_eq!(liveness["status"], "ALIVE");

    let resp = client
        .get(format!("{base}/health/readiness"))
        .send()
        .await
        .expect("Failed to fetch readiness");
    assert_eq!(resp.status(), StatusCode::OK);
}
