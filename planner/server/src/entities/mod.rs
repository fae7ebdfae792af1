//! SeaORM entities for the planner schema.

pub mod prelude;

pub mod sea_orm_active_enums;
pub mod task;
pub mod water_hydration;
