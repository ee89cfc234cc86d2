//! Pricing package business logic.
//!
//! A package always carries exactly one `period_packages` row per billing period.
//! Creation and updates write the package and its four prices in one database
//! transaction, so readers never observe a package with a partial price matrix.

use crate::{
    core::{
        pricing::{
            PeriodPrices, PricedItem, PricedItemInput, period_ids_by_unit, period_names_by_id,
            price_map,
        },
        property::resolve_target_rooming_house,
        scope::{Identity, resolve_scope},
    },
    entities::{PeriodPackage, PricingPackage, Room, period_package, pricing_package, room},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Creates a package with its four period prices.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_package(
    db: &DatabaseConnection,
    identity: &Identity,
    input: &PricedItemInput,
) -> Result<PricedItem> {
    let name = input.validate()?;
    let house = resolve_target_rooming_house(db, identity, input.rooming_house_id).await?;

    let txn = db.begin().await?;
    let package = pricing_package::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        rooming_house_id: Set(house.id),
        created_at: Set(Utc::now()),
    }
    .insert(&txn)
    .await?;
    insert_prices(&txn, package.id, &input.prices).await?;
    txn.commit().await?;

    info!(package_id = %package.id, rooming_house_id = %house.id, "Created pricing package");
    find_package_by_id(db, identity, package.id).await
}

/// Lists the packages of every visible rooming house.
pub async fn find_all_packages(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<PricedItem>> {
    let scope = resolve_scope(db, identity).await?;
    let packages = PricingPackage::find()
        .filter(pricing_package::Column::RoomingHouseId.is_in(scope.rooming_house_ids().to_vec()))
        .order_by_asc(pricing_package::Column::Name)
        .find_with_related(PeriodPackage)
        .all(db)
        .await?;

    let names = period_names_by_id(db).await?;
    Ok(packages
        .into_iter()
        .map(|(package, prices)| to_priced_item(&names, package, prices))
        .collect())
}

/// Fetches one package with its prices.
pub async fn find_package_by_id<C>(db: &C, identity: &Identity, id: Uuid) -> Result<PricedItem>
where
    C: ConnectionTrait,
{
    let package = find_visible_package(db, identity, id).await?;
    let prices = package.find_related(PeriodPackage).all(db).await?;
    let names = period_names_by_id(db).await?;
    Ok(to_priced_item(&names, package, prices))
}

/// Renames a package and replaces its price matrix. Owner only.
#[instrument(skip(db, input))]
pub async fn update_package(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
    input: &PricedItemInput,
) -> Result<PricedItem> {
    identity.require_owner()?;
    let name = input.validate()?;
    let package = find_visible_package(db, identity, id).await?;

    let txn = db.begin().await?;
    let mut active: pricing_package::ActiveModel = package.into();
    active.name = Set(name.to_string());
    active.update(&txn).await?;
    PeriodPackage::delete_many()
        .filter(period_package::Column::PricingPackageId.eq(id))
        .exec(&txn)
        .await?;
    insert_prices(&txn, id, &input.prices).await?;
    txn.commit().await?;

    info!(package_id = %id, "Updated pricing package");
    find_package_by_id(db, identity, id).await
}

/// Removes a package and its prices. Owner only.
///
/// Rejected while any room is still billed with the package.
#[instrument(skip(db))]
pub async fn delete_package(db: &DatabaseConnection, identity: &Identity, id: Uuid) -> Result<()> {
    identity.require_owner()?;
    find_visible_package(db, identity, id).await?;

    let rooms = Room::find()
        .filter(room::Column::PricingPackageId.eq(id))
        .count(db)
        .await?;
    if rooms > 0 {
        return Err(Error::bad_request(format!(
            "pricing package is still used by {rooms} room(s)"
        )));
    }

    let txn = db.begin().await?;
    PeriodPackage::delete_many()
        .filter(period_package::Column::PricingPackageId.eq(id))
        .exec(&txn)
        .await?;
    PricingPackage::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    info!(package_id = %id, "Deleted pricing package");
    Ok(())
}

/// Fetches a package whose rooming house is visible to the caller.
pub async fn find_visible_package<C>(
    db: &C,
    identity: &Identity,
    id: Uuid,
) -> Result<pricing_package::Model>
where
    C: ConnectionTrait,
{
    let package = PricingPackage::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("pricing package not found"))?;
    resolve_scope(db, identity)
        .await?
        .ensure(package.rooming_house_id, "pricing package")?;
    Ok(package)
}

/// Price of one unit of `period_id` in a package.
///
/// Fails with `NotFound` when the package has no price for that period.
pub async fn find_period_package_price<C>(db: &C, package_id: Uuid, period_id: Uuid) -> Result<f64>
where
    C: ConnectionTrait,
{
    PeriodPackage::find()
        .filter(period_package::Column::PricingPackageId.eq(package_id))
        .filter(period_package::Column::PeriodId.eq(period_id))
        .one(db)
        .await?
        .map(|row| row.price)
        .ok_or_else(|| Error::not_found("price for the tenant's period not found"))
}

async fn insert_prices<C>(db: &C, package_id: Uuid, prices: &PeriodPrices) -> Result<()>
where
    C: ConnectionTrait,
{
    let period_ids = period_ids_by_unit(db).await?;
    let rows = prices
        .entries()
        .into_iter()
        .map(|(unit, price)| {
            let period_id = period_ids
                .get(&unit)
                .copied()
                .ok_or_else(|| Error::internal("period catalog is not seeded"))?;
            Ok(period_package::ActiveModel {
                id: Set(Uuid::new_v4()),
                period_id: Set(period_id),
                pricing_package_id: Set(package_id),
                price: Set(price),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    PeriodPackage::insert_many(rows).exec(db).await?;
    Ok(())
}

fn to_priced_item(
    names: &HashMap<Uuid, String>,
    package: pricing_package::Model,
    prices: Vec<period_package::Model>,
) -> PricedItem {
    PricedItem {
        id: package.id,
        name: package.name,
        rooming_house_id: package.rooming_house_id,
        created_at: package.created_at,
        prices: price_map(names, prices.into_iter().map(|p| (p.period_id, p.price))),
    }
}
