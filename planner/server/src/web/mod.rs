use axum::Json;
use migration::MigratorTrait;
use sea_orm::Database;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::ToSchema;

use crate::config::{self, Config};
use crate::hydration::api::HydrationState;
use crate::schedule::spawn_daily_reset;
use crate::task::api::TaskState;

pub mod api;

/// Process-wide context shared by the routers and the reset job.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// JSON response for the root endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusMessage {
    pub message: String,
}

/// Builds the complete application router.
pub fn create_app(state: &AppState) -> axum::Router {
    use axum::Router;

    let task_state = Arc::new(TaskState {
        db: state.db.clone(),
    });
    let hydration_state = Arc::new(HydrationState {
        db: state.db.clone(),
    });

    let public_routes = Router::new()
        .route("/", axum::routing::get(root_handler))
        .route("/health", axum::routing::get(health_check_handler));

    Router::new()
        .merge(public_routes)
        .merge(api::create_api_router(task_state, hydration_state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: config::Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(&config.database_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let state = AppState {
        config: Arc::new(config),
        db: Arc::new(db),
    };

    let reset_job = spawn_daily_reset(state.db.clone(), state.config.hydration_reset_time);

    let app = create_app(&state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    reset_job.abort();
    state.db.as_ref().clone().close().await?;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Handler for GET / - Reports that the API is up.
#[tracing::instrument]
pub async fn root_handler() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "API is running!".to_string(),
    })
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn can_report_api_is_running() {
        let app = axum::Router::new().route("/", axum::routing::get(root_handler));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let message: StatusMessage = serde_json::from_slice(&body).unwrap();
        assert_eq!(message.message, "API is running!");
    }
}
