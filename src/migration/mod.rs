pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_catalog_tables;
mod m20240601_000002_create_order_tables;
mod m20240601_000003_create_audit_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_catalog_tables::Migration),
            Box::new(m20240601_000002_create_order_tables::Migration),
            Box::new(m20240601_000003_create_audit_logs::Migration),
        ]
    }
}
