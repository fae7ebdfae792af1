use axum::http::{Method, StatusCode};
use insta::assert_yaml_snapshot;
use planner_server::hydration::HydrationService;
use planner_server::schedule::reset_hydration;
use serde_json::json;

mod common;

use common::{send, setup_app, setup_db, snapshot, sorted_snapshots};

#[tokio::test]
async fn can_list_no_records_before_first_write() {
    let db = setup_db().await.expect("Failed to setup test database");
    let app = setup_app(db);

    let (status, records) = send(&app, Method::GET, "/water-hydration", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(records, json!([]));
}

#[tokio::test]
async fn can_reject_negative_liters() {
    let db = setup_db().await.expect("Failed to setup test database");
    let app = setup_app(db);
    let _sorted = sorted_snapshots();

    let response = snapshot(
        &app,
        Method::POST,
        "/water-hydration",
        Some(json!({ "liters": -1 })),
    )
    .await;

    assert_yaml_snapshot!(response, @r#"
    ---
    status: 400
    body:
      error: VALIDATION_ERROR
      message: Invalid data
      violations:
        - field: liters
          message: must be a non-negative number
    "#);
}

#[tokio::test]
async fn can_reject_non_numeric_liters() {
    let db = setup_db().await.expect("Failed to setup test database");
    let app = setup_app(db);

    let (status, _) = send(
        &app,
        Method::POST,
        "/water-hydration",
        Some(json!({ "liters": "2.5" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn can_upsert_single_record() {
    let db = setup_db().await.expect("Failed to setup test database");
    let app = setup_app(db);
    let _sorted = sorted_snapshots();

    for _ in 0..2 {
        let response = snapshot(
            &app,
            Method::POST,
            "/water-hydration",
            Some(json!({ "liters": 2.5 })),
        )
        .await;
        insta::allow_duplicates! {
            assert_yaml_snapshot!(response, {
                ".body.updatedAt" => "[timestamp]",
            }, @r#"
            ---
            status: 200
            body:
              liters: 2.5
              updatedAt: "[timestamp]"
            "#);
        }
    }

    let records = snapshot(&app, Method::GET, "/water-hydration", None).await;
    assert_yaml_snapshot!(records, {
        ".body[].updatedAt" => "[timestamp]",
    }, @r#"
    ---
    status: 200
    body:
      - liters: 2.5
        updatedAt: "[timestamp]"
    "#);
}

#[tokio::test]
async fn can_overwrite_previous_value() {
    let db = setup_db().await.expect("Failed to setup test database");
    let service = HydrationService::new(&db);

    service.record_liters(1.0).await.unwrap();
    let record = service.record_liters(3.25).await.unwrap();

    assert_eq!(record.liters(), 3.25);
    let records = service.get_all_records().await.unwrap();
    assert_eq!(records, vec![record]);
}

#[tokio::test]
async fn can_reset_liters_to_zero() {
    let db = setup_db().await.expect("Failed to setup test database");
    let service = HydrationService::new(&db);
    service.record_liters(1.75).await.unwrap();

    reset_hydration(&db).await;

    let record = service
        .get_current_record()
        .await
        .unwrap()
        .expect("record should still exist");
    assert_eq!(record.liters(), 0.0);
}

#[tokio::test]
async fn can_reset_without_existing_record() {
    let db = setup_db().await.expect("Failed to setup test database");
    let service = HydrationService::new(&db);

    reset_hydration(&db).await;

    assert!(service.get_all_records().await.unwrap().is_empty());
    assert!(matches!(
        service.reset_liters().await,
        Err(planner_server::hydration::HydrationServiceError::RecordMissing)
    ));
}

#[tokio::test]
async fn can_record_after_reset() {
    let db = setup_db().await.expect("Failed to setup test database");
    let service = HydrationService::new(&db);
    service.record_liters(2.0).await.unwrap();
    service.reset_liters().await.unwrap();

    let record = service.record_liters(0.5).await.unwrap();

    assert_eq!(record.liters(), 0.5);
    assert_eq!(service.get_all_records().await.unwrap().len(), 1);
}
