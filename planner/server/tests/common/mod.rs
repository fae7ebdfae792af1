#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use chrono::NaiveTime;
use migration::MigratorTrait;
use planner_server::config::Config;
use planner_server::web::{AppState, create_app};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Opens a fresh in-memory SQLite database with all migrations applied.
pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();

    // Every pooled connection would get its own in-memory database, so keep exactly one.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Builds the full application router on top of `db`.
pub fn setup_app(db: DatabaseConnection) -> Router {
    let state = AppState {
        config: Arc::new(Config {
            database_url: "sqlite::memory:".to_string(),
            port: 3100,
            hydration_reset_time: NaiveTime::MIN,
        }),
        db: Arc::new(db),
    };
    create_app(&state)
}

/// Sends a request to `app` and returns the status with the decoded JSON body
/// (`Value::Null` when the body is empty or not JSON).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Status and JSON body of a response, in the shape stored in snapshots.
#[derive(Debug, Serialize)]
pub struct ResponseSnapshot {
    pub status: u16,
    pub body: Value,
}

/// Sends a request and captures the response for `assert_yaml_snapshot!`.
pub async fn snapshot(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> ResponseSnapshot {
    let (status, body) = send(app, method, uri, body).await;
    ResponseSnapshot {
        status: status.as_u16(),
        body,
    }
}

/// Sorts JSON object keys in snapshots taken while the guard is alive.
pub fn sorted_snapshots() -> insta::internals::SettingsBindDropGuard {
    let mut settings = insta::Settings::clone_current();
    settings.set_sort_maps(true);
    settings.bind_to_scope()
}
