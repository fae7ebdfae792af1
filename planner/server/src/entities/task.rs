use super::sea_orm_active_enums::{TaskStatus, TimeOfDay};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub time: TimeOfDay,
    pub status: TaskStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Every new task gets a fresh UUID and both timestamps set to now.
    fn new() -> Self {
        let now = chrono::Utc::now().fixed_offset();
        Self {
            id: Set(uuid::Uuid::new_v4().to_string()),
            time: Set(TimeOfDay::default()),
            status: Set(TaskStatus::default()),
            created_at: Set(now),
            updated_at: Set(now),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(chrono::Utc::now().fixed_offset());
        }
        Ok(self)
    }
}
