//! The daily water hydration counter.
//!
//! Storage holds at most one row. Its key is private to this module, so callers only ever
//! talk about "the current record".

use crate::entities::*;
use chrono::{DateTime, FixedOffset};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::*;

pub mod api;

/// Key of the single row in `water_hydration`.
const CURRENT_RECORD_ID: i32 = 1;

#[derive(Debug, PartialEq, Clone)]
pub struct WaterHydration {
    liters: f64,
    updated_at: DateTime<FixedOffset>,
}

impl WaterHydration {
    /// Returns the liters drunk today.
    pub fn liters(&self) -> f64 {
        self.liters
    }

    /// Returns when the counter was last written.
    pub fn updated_at(&self) -> DateTime<FixedOffset> {
        self.updated_at
    }
}

impl From<water_hydration::Model> for WaterHydration {
    fn from(model: water_hydration::Model) -> Self {
        Self {
            liters: model.liters,
            updated_at: model.updated_at,
        }
    }
}

/// Error type for HydrationService operations.
#[derive(Debug, thiserror::Error)]
pub enum HydrationServiceError {
    /// The hydration record has not been written yet.
    #[error("Water hydration record does not exist yet")]
    RecordMissing,
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub struct HydrationService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl HydrationService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> HydrationService<'_> {
        HydrationService { db }
    }

    /// Retrieves all hydration records. There is never more than one.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_records(&self) -> Result<Vec<WaterHydration>, HydrationServiceError> {
        let records = water_hydration::Entity::find()
            .all(self.db)
            .await?
            .into_iter()
            .map(WaterHydration::from)
            .collect();
        Ok(records)
    }

    /// Retrieves the current record, if it has been written.
    #[tracing::instrument(skip(self))]
    pub async fn get_current_record(
        &self,
    ) -> Result<Option<WaterHydration>, HydrationServiceError> {
        let record = water_hydration::Entity::find_by_id(CURRENT_RECORD_ID)
            .one(self.db)
            .await?
            .map(WaterHydration::from);
        Ok(record)
    }

    /// Writes the liters value, creating the record on first use and overwriting it afterwards.
    ///
    /// # Arguments
    ///
    /// * `liters` - The validated, non-negative amount.
    ///
    /// # Returns
    ///
    /// A `Result` containing the stored `WaterHydration` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn record_liters(&self, liters: f64) -> Result<WaterHydration, HydrationServiceError> {
        let active_model = water_hydration::ActiveModel {
            id: ActiveValue::Set(CURRENT_RECORD_ID),
            liters: ActiveValue::Set(liters),
            updated_at: ActiveValue::Set(chrono::Utc::now().fixed_offset()),
        };

        water_hydration::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(water_hydration::Column::Id)
                    .update_columns([
                        water_hydration::Column::Liters,
                        water_hydration::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        self.get_current_record()
            .await?
            .ok_or(HydrationServiceError::RecordMissing)
    }

    /// Sets the liters of the current record back to zero.
    ///
    /// Fails with `RecordMissing` when nothing has been recorded yet; the record is never
    /// created by a reset.
    #[tracing::instrument(skip(self))]
    pub async fn reset_liters(&self) -> Result<WaterHydration, HydrationServiceError> {
        let result = water_hydration::Entity::update_many()
            .col_expr(water_hydration::Column::Liters, Expr::value(0.0))
            .col_expr(
                water_hydration::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().fixed_offset()),
            )
            .filter(water_hydration::Column::Id.eq(CURRENT_RECORD_ID))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(HydrationServiceError::RecordMissing);
        }

        self.get_current_record()
            .await?
            .ok_or(HydrationServiceError::RecordMissing)
    }
}
