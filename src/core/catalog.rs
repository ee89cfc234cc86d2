//! Period and transaction category catalogs.
//!
//! Both catalogs are seeded on startup. Seeding only inserts rows whose name is not
//! present yet, so it can run on every boot.

use crate::{
    config::catalog::CatalogConfig,
    core::scope::Identity,
    entities::{CategoryKind, Period, PeriodUnit, TransactionCategory, period, transaction_category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Built-in ledger categories as `(name, is_expense, kind)`.
pub const BUILTIN_CATEGORIES: [(&str, bool, CategoryKind); 7] = [
    ("Deposit", false, CategoryKind::Deposit),
    ("Rent", false, CategoryKind::Rent),
    ("Maintenance", true, CategoryKind::Generic),
    ("Salary", true, CategoryKind::Generic),
    ("Repairment", true, CategoryKind::Generic),
    ("Utilities", true, CategoryKind::Generic),
    ("Deposit Payback", true, CategoryKind::DepositPayback),
];

/// Every billing period, in catalog order.
pub const PERIOD_UNITS: [PeriodUnit; 4] = [
    PeriodUnit::Day,
    PeriodUnit::Week,
    PeriodUnit::Month,
    PeriodUnit::Year,
];

/// Seeds the period catalog, the built-in categories and any configured extras.
#[instrument(skip(db, catalog))]
pub async fn seed_catalog(db: &DatabaseConnection, catalog: &CatalogConfig) -> Result<()> {
    for unit in PERIOD_UNITS {
        let exists = Period::find()
            .filter(period::Column::Name.eq(unit.period_name()))
            .one(db)
            .await?
            .is_some();
        if !exists {
            period::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(unit.period_name().to_string()),
                unit: Set(unit),
                position: Set(unit.position()),
            }
            .insert(db)
            .await?;
            info!(period = unit.period_name(), "Seeded period");
        }
    }

    for (name, is_expense, kind) in BUILTIN_CATEGORIES {
        ensure_category(db, name, is_expense, kind).await?;
    }
    for extra in &catalog.transaction_categories {
        let name = extra.name.trim();
        if !name.is_empty() {
            ensure_category(db, name, extra.is_expense, CategoryKind::Generic).await?;
        }
    }

    Ok(())
}

/// Lists the billing periods, daily first.
pub async fn find_all_periods<C>(db: &C) -> Result<Vec<period::Model>>
where
    C: ConnectionTrait,
{
    Period::find()
        .order_by_asc(period::Column::Position)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Looks up the period billed in `unit`.
pub async fn find_period_by_unit<C>(db: &C, unit: PeriodUnit) -> Result<period::Model>
where
    C: ConnectionTrait,
{
    Period::find()
        .filter(period::Column::Unit.eq(unit))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(format!("{} period not found", unit.period_name())))
}

/// Lists all transaction categories, income first, then alphabetically.
pub async fn find_all_categories<C>(db: &C) -> Result<Vec<transaction_category::Model>>
where
    C: ConnectionTrait,
{
    TransactionCategory::find()
        .order_by_asc(transaction_category::Column::IsExpense)
        .order_by_asc(transaction_category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by exact name.
pub async fn find_category_by_name<C>(
    db: &C,
    name: &str,
) -> Result<Option<transaction_category::Model>>
where
    C: ConnectionTrait,
{
    TransactionCategory::find()
        .filter(transaction_category::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds a plain ledger category. Owner only.
#[instrument(skip(db))]
pub async fn create_category(
    db: &DatabaseConnection,
    identity: &Identity,
    name: &str,
    is_expense: bool,
) -> Result<transaction_category::Model> {
    identity.require_owner()?;

    let name = name.trim();
    if name.is_empty() {
        return Err(Error::bad_request("name is required"));
    }
    if find_category_by_name(db, name).await?.is_some() {
        return Err(Error::bad_request(format!("category {name} already exists")));
    }

    insert_category(db, name, is_expense, CategoryKind::Generic).await
}

async fn ensure_category(
    db: &DatabaseConnection,
    name: &str,
    is_expense: bool,
    kind: CategoryKind,
) -> Result<()> {
    if find_category_by_name(db, name).await?.is_none() {
        insert_category(db, name, is_expense, kind).await?;
        info!(category = name, ?kind, "Seeded transaction category");
    }
    Ok(())
}

async fn insert_category(
    db: &DatabaseConnection,
    name: &str,
    is_expense: bool,
    kind: CategoryKind,
) -> Result<transaction_category::Model> {
    transaction_category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        is_expense: Set(is_expense),
        kind: Set(kind),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
