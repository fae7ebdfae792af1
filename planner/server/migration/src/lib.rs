pub use sea_orm_migration::prelude::*;

mod m20251001_000001_create_tasks_table;
mod m20251001_000002_create_water_hydration_table;
mod m20251008_000003_add_tasks_created_at_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000001_create_tasks_table::Migration),
            Box::new(m20251001_000002_create_water_hydration_table::Migration),
            Box::new(m20251008_000003_add_tasks_created_at_index::Migration),
        ]
    }
}
