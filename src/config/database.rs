//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust models.

use crate::entities::{
    AdditionalPeriod, AdditionalPrice, Admin, Owner, Period, PeriodPackage, PricingPackage, Room,
    RoomingHouse, Tenant, TenantAdditionalPrice, Transaction, TransactionCategory,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Default location of the local `SQLite` file.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/rooming_house.sqlite?mode=rwc";

/// Creates the parent directory of a file-backed `SQLite` URL.
///
/// In-memory and non-`SQLite` URLs are left alone.
pub fn ensure_sqlite_dir(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Opens a connection pool for the given URL.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Opening database connection");
    ensure_sqlite_dir(database_url)?;
    let db = Database::connect(database_url).await?;
    info!("Database connection opened");
    Ok(db)
}

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates every table used by the back office if it does not exist yet.
///
/// Parent tables are created before the join tables that reference them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, Owner).await?;
    create_table(db, &schema, RoomingHouse).await?;
    create_table(db, &schema, Admin).await?;
    create_table(db, &schema, Period).await?;
    create_table(db, &schema, PricingPackage).await?;
    create_table(db, &schema, PeriodPackage).await?;
    create_table(db, &schema, AdditionalPrice).await?;
    create_table(db, &schema, AdditionalPeriod).await?;
    create_table(db, &schema, Room).await?;
    create_table(db, &schema, Tenant).await?;
    create_table(db, &schema, TenantAdditionalPrice).await?;
    create_table(db, &schema, TransactionCategory).await?;
    create_table(db, &schema, Transaction).await?;

    info!("Database tables ensured");
    Ok(())
}
