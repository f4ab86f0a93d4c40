pub use sea_orm_migration::prelude::*;

mod m20250101_000001_people_and_positions;
mod m20250101_000002_process_tracking;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_people_and_positions::Migration),
            Box::new(m20250101_000002_process_tracking::Migration),
        ]
    }
}
