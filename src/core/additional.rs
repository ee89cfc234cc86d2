//! Add-on services (laundry, parking, ...) priced per period.
//!
//! Add-ons follow the same contract as pricing packages. Tenants select them at
//! registration, and rent payments add the price of every selected add-on at the
//! tenant's billing period.

use crate::{
    core::{
        pricing::{
            PeriodPrices, PricedItem, PricedItemInput, period_ids_by_unit, period_names_by_id,
            price_map,
        },
        property::resolve_target_rooming_house,
        scope::{Identity, resolve_scope},
    },
    entities::{
        AdditionalPeriod, AdditionalPrice, TenantAdditionalPrice, additional_period,
        additional_price, tenant_additional_price,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument};

/// An add-on selected by a tenant, priced at the tenant's billing period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdditionalLine {
    /// Add-on id
    pub id: Uuid,
    /// Add-on name
    pub name: String,
    /// Price for one unit of the tenant's period
    pub price: f64,
}

/// Creates an add-on with its four period prices.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_additional(
    db: &DatabaseConnection,
    identity: &Identity,
    input: &PricedItemInput,
) -> Result<PricedItem> {
    let name = input.validate()?;
    let house = resolve_target_rooming_house(db, identity, input.rooming_house_id).await?;

    let txn = db.begin().await?;
    let additional = additional_price::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        rooming_house_id: Set(house.id),
        created_at: Set(Utc::now()),
    }
    .insert(&txn)
    .await?;
    insert_prices(&txn, additional.id, &input.prices).await?;
    txn.commit().await?;

    info!(additional_id = %additional.id, rooming_house_id = %house.id, "Created add-on");
    find_additional_by_id(db, identity, additional.id).await
}

/// Lists the add-ons of every visible rooming house.
pub async fn find_all_additionals(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<PricedItem>> {
    let scope = resolve_scope(db, identity).await?;
    let additionals = AdditionalPrice::find()
        .filter(additional_price::Column::RoomingHouseId.is_in(scope.rooming_house_ids().to_vec()))
        .order_by_asc(additional_price::Column::Name)
        .find_with_related(AdditionalPeriod)
        .all(db)
        .await?;

    let names = period_names_by_id(db).await?;
    Ok(additionals
        .into_iter()
        .map(|(additional, prices)| to_priced_item(&names, additional, prices))
        .collect())
}

/// Fetches one add-on with its prices.
pub async fn find_additional_by_id<C>(db: &C, identity: &Identity, id: Uuid) -> Result<PricedItem>
where
    C: ConnectionTrait,
{
    let additional = find_visible_additional(db, identity, id).await?;
    let prices = additional.find_related(AdditionalPeriod).all(db).await?;
    let names = period_names_by_id(db).await?;
    Ok(to_priced_item(&names, additional, prices))
}

/// Renames an add-on and replaces its price matrix. Owner only.
#[instrument(skip(db, input))]
pub async fn update_additional(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
    input: &PricedItemInput,
) -> Result<PricedItem> {
    identity.require_owner()?;
    let name = input.validate()?;
    let additional = find_visible_additional(db, identity, id).await?;

    let txn = db.begin().await?;
    let mut active: additional_price::ActiveModel = additional.into();
    active.name = Set(name.to_string());
    active.update(&txn).await?;
    AdditionalPeriod::delete_many()
        .filter(additional_period::Column::AdditionalPriceId.eq(id))
        .exec(&txn)
        .await?;
    insert_prices(&txn, id, &input.prices).await?;
    txn.commit().await?;

    info!(additional_id = %id, "Updated add-on");
    find_additional_by_id(db, identity, id).await
}

/// Removes an add-on, its prices and every tenant selection of it. Owner only.
#[instrument(skip(db))]
pub async fn delete_additional(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
) -> Result<()> {
    identity.require_owner()?;
    find_visible_additional(db, identity, id).await?;

    let txn = db.begin().await?;
    TenantAdditionalPrice::delete_many()
        .filter(tenant_additional_price::Column::AdditionalPriceId.eq(id))
        .exec(&txn)
        .await?;
    AdditionalPeriod::delete_many()
        .filter(additional_period::Column::AdditionalPriceId.eq(id))
        .exec(&txn)
        .await?;
    AdditionalPrice::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    info!(additional_id = %id, "Deleted add-on");
    Ok(())
}

async fn find_visible_additional<C>(
    db: &C,
    identity: &Identity,
    id: Uuid,
) -> Result<additional_price::Model>
where
    C: ConnectionTrait,
{
    let additional = AdditionalPrice::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("additional price not found"))?;
    resolve_scope(db, identity)
        .await?
        .ensure(additional.rooming_house_id, "additional price")?;
    Ok(additional)
}

/// Checks that every id names an add-on of `rooming_house_id`.
pub async fn ensure_additionals_belong_to<C>(
    db: &C,
    rooming_house_id: Uuid,
    ids: &[Uuid],
) -> Result<()>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(());
    }
    let found: Vec<Uuid> = AdditionalPrice::find()
        .filter(additional_price::Column::Id.is_in(ids.to_vec()))
        .filter(additional_price::Column::RoomingHouseId.eq(rooming_house_id))
        .all(db)
        .await?
        .into_iter()
        .map(|a| a.id)
        .collect();
    match ids.iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(Error::not_found(format!(
            "additional price {missing} not found"
        ))),
        None => Ok(()),
    }
}

/// Add-ons selected by a tenant, priced at `period_id`.
///
/// An add-on without a price for that period is left out.
pub async fn find_tenant_additional_lines<C>(
    db: &C,
    tenant_id: Uuid,
    period_id: Uuid,
) -> Result<Vec<AdditionalLine>>
where
    C: ConnectionTrait,
{
    let selected: Vec<Uuid> = TenantAdditionalPrice::find()
        .filter(tenant_additional_price::Column::TenantId.eq(tenant_id))
        .all(db)
        .await?
        .into_iter()
        .map(|s| s.additional_price_id)
        .collect();
    if selected.is_empty() {
        return Ok(Vec::new());
    }

    let additionals = AdditionalPrice::find()
        .filter(additional_price::Column::Id.is_in(selected))
        .order_by_asc(additional_price::Column::Name)
        .find_with_related(AdditionalPeriod)
        .all(db)
        .await?;

    Ok(additionals
        .into_iter()
        .filter_map(|(additional, prices)| {
            prices
                .into_iter()
                .find(|p| p.period_id == period_id)
                .map(|p| AdditionalLine {
                    id: additional.id,
                    name: additional.name,
                    price: p.price,
                })
        })
        .collect())
}

async fn insert_prices<C>(db: &C, additional_id: Uuid, prices: &PeriodPrices) -> Result<()>
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
            Ok(additional_period::ActiveModel {
                id: Set(Uuid::new_v4()),
                additional_price_id: Set(additional_id),
                period_id: Set(period_id),
                price: Set(price),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    AdditionalPeriod::insert_many(rows).exec(db).await?;
    Ok(())
}

fn to_priced_item(
    names: &HashMap<Uuid, String>,
    additional: additional_price::Model,
    prices: Vec<additional_period::Model>,
) -> PricedItem {
    PricedItem {
        id: additional.id,
        name: additional.name,
        rooming_house_id: additional.rooming_house_id,
        created_at: additional.created_at,
        prices: price_map(names, prices.into_iter().map(|p| (p.period_id, p.price))),
    }
}
