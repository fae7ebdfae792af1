pub use super::task::Entity as Task;
pub use super::water_hydration::Entity as WaterHydration;
