use crate::hydration::{HydrationService, WaterHydration};
use crate::validation::validate_liters;
use crate::web::api::{ApiError, ErrorResponse, JsonBody};
use axum::{Router, extract::State, response::Json, routing::get};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone, Debug)]
pub struct HydrationState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// JSON representation of the hydration counter.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HydrationJson {
    /// Liters drunk today
    pub liters: f64,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<WaterHydration> for HydrationJson {
    fn from(record: WaterHydration) -> Self {
        Self {
            liters: record.liters(),
            updated_at: record.updated_at(),
        }
    }
}

/// Request body for POST /water-hydration.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordLitersRequest {
    /// Non-negative amount of water in liters
    pub liters: f64,
}

/// Handler for GET /water-hydration - Returns the hydration record(s).
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/water-hydration",
    responses(
        (status = 200, description = "Successfully retrieved hydration records", body = [HydrationJson]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Water hydration"
)]
pub async fn list_hydration_handler(
    State(state): State<Arc<HydrationState>>,
) -> Result<Json<Vec<HydrationJson>>, ApiError> {
    let service = HydrationService::new(&state.db);
    let records = service.get_all_records().await?;
    Ok(Json(records.into_iter().map(HydrationJson::from).collect()))
}

/// Handler for POST /water-hydration - Validates and upserts today's liters.
#[tracing::instrument(skip(state, body))]
#[utoipa::path(
    post,
    path = "/water-hydration",
    request_body = RecordLitersRequest,
    responses(
        (status = 200, description = "Successfully recorded liters", body = HydrationJson),
        (status = 400, description = "Invalid liters", body = ErrorResponse)
    ),
    tag = "Water hydration"
)]
pub async fn record_liters_handler(
    State(state): State<Arc<HydrationState>>,
    JsonBody(body): JsonBody,
) -> Result<Json<HydrationJson>, ApiError> {
    let liters = validate_liters(&body)?;
    let service = HydrationService::new(&state.db);
    let record = service.record_liters(liters).await?;
    Ok(Json(HydrationJson::from(record)))
}

/// Creates and returns the water hydration API router.
pub fn create_hydration_router(state: Arc<HydrationState>) -> Router {
    Router::new()
        .route(
            "/water-hydration",
            get(list_hydration_handler).post(record_liters_handler),
        )
        .with_state(state)
}
