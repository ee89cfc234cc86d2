//! Ledger business logic - posts transactions and applies their tenant side effects.
//!
//! Posting dispatches on the category's [`CategoryKind`]:
//!
//! - `Rent` computes the amount from the tenant's package and add-ons and sets the
//!   lease dates.
//! - `Deposit` records a deposit and marks it as held.
//! - `DepositPayback` returns a held deposit.
//! - `Generic` books a plain entry against a room or a rooming house.
//!
//! The ledger row and the tenant update commit together, and the tenant update is a
//! compare-and-set on `tenants.version`.

use crate::{
    core::{
        additional::find_tenant_additional_lines,
        lease::{lease_end, transaction_date},
        property::resolve_target_rooming_house,
        room::{claim_room, find_room_price, find_visible_room, load_occupancy, today},
        scope::{Identity, resolve_scope},
        tenant::find_visible_tenant,
    },
    entities::{
        CategoryKind, Period, Room, RoomingHouse, Tenant, Transaction, TransactionCategory,
        rooming_house, tenant, transaction, transaction_category,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*,
    sea_query::{Expr, SimpleExpr},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Posting payload. Which fields are required depends on the category.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransactionInput {
    /// Ledger category
    pub transaction_category_id: Option<Uuid>,
    /// Day of month
    pub day: i32,
    /// Month, 1-12
    pub month: i32,
    /// Year
    pub year: i32,
    /// Amount; ignored for rent, which is computed
    pub amount: Option<f64>,
    /// Optional note
    pub description: Option<String>,
    /// Tenant for rent, deposit and deposit payback
    pub tenant_id: Option<Uuid>,
    /// Room for plain entries booked against a room
    pub room_id: Option<Uuid>,
    /// Rooming house for plain entries booked against a property
    pub rooming_house_id: Option<Uuid>,
    /// Book a plain entry against `room_id` instead of `rooming_house_id`
    pub is_room: bool,
}

impl TransactionInput {
    fn positive_amount(&self) -> Result<f64> {
        self.amount
            .filter(|a| a.is_finite() && *a > 0.0)
            .ok_or_else(|| Error::bad_request("amount must be greater than zero"))
    }

    fn tenant_id(&self) -> Result<Uuid> {
        self.tenant_id
            .ok_or_else(|| Error::bad_request("tenant is required"))
    }

    fn description(&self) -> Option<String> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(ToString::to_string)
    }
}

/// Ledger row with its category and rooming house resolved.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionListItem {
    /// Stored transaction fields
    #[serde(flatten)]
    pub transaction: transaction::Model,
    /// Category name
    pub category_name: String,
    /// Whether the category counts as expense
    pub is_expense: bool,
    /// Rooming house name
    pub rooming_house_name: String,
}

/// Fields of a new ledger row, before it is written.
struct Posting {
    date: NaiveDate,
    amount: f64,
    category_id: Uuid,
    room_id: Option<Uuid>,
    tenant_id: Option<Uuid>,
    rooming_house_id: Uuid,
    description: Option<String>,
}

impl Posting {
    fn into_active_model(self) -> transaction::ActiveModel {
        use chrono::Datelike;
        transaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            day: Set(i32::try_from(self.date.day()).unwrap_or_default()),
            month: Set(i32::try_from(self.date.month()).unwrap_or_default()),
            year: Set(self.date.year()),
            amount: Set(self.amount),
            description: Set(self.description),
            transaction_category_id: Set(self.category_id),
            room_id: Set(self.room_id),
            tenant_id: Set(self.tenant_id),
            rooming_house_id: Set(self.rooming_house_id),
            created_at: Set(Utc::now()),
        }
    }
}

/// Posts a transaction and applies the side effects of its category.
#[instrument(skip(db, input), fields(category_id = ?input.transaction_category_id))]
pub async fn create_transaction(
    db: &DatabaseConnection,
    identity: &Identity,
    input: &TransactionInput,
) -> Result<transaction::Model> {
    let category_id = input
        .transaction_category_id
        .ok_or_else(|| Error::bad_request("transaction category is required"))?;
    let category = TransactionCategory::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("transaction category not found"))?;
    let date = transaction_date(input.day, input.month, input.year)?;

    match category.kind {
        CategoryKind::Rent => post_rent(db, identity, input, &category, date).await,
        CategoryKind::Deposit => post_deposit(db, identity, input, &category, date).await,
        CategoryKind::DepositPayback => {
            post_deposit_payback(db, identity, input, &category, date).await
        }
        CategoryKind::Generic => post_generic(db, identity, input, &category, date).await,
    }
}

async fn post_rent(
    db: &DatabaseConnection,
    identity: &Identity,
    input: &TransactionInput,
    category: &transaction_category::Model,
    start: NaiveDate,
) -> Result<transaction::Model> {
    let tenant = find_visible_tenant(db, identity, input.tenant_id()?).await?;
    let (room_id, period_id, duration) =
        match (tenant.is_tenant, tenant.room_id, tenant.period_id, tenant.regular_payment_duration) {
            (true, Some(room_id), Some(period_id), Some(duration)) => (room_id, period_id, duration),
            _ => return Err(Error::bad_request("need a tenant")),
        };

    let room = Room::find_by_id(room_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("room not found"))?;
    let period = Period::find_by_id(period_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("period not found"))?;
    let price = find_room_price(db, &room, period.id).await?;
    let additional_total: f64 = find_tenant_additional_lines(db, tenant.id, period.id)
        .await?
        .iter()
        .map(|line| line.price)
        .sum();

    let amount = rent_amount(price, duration, additional_total);
    let end = lease_end(start, period.unit, duration)?;
    if input.amount.is_some_and(|supplied| (supplied - amount).abs() > f64::EPSILON) {
        warn!(tenant_id = %tenant.id, computed = amount, "Ignoring supplied rent amount");
    }

    let txn = db.begin().await?;
    readmit_tenant(&txn, &tenant, room.id, end).await?;
    let posted = Posting {
        date: start,
        amount,
        category_id: category.id,
        room_id: Some(room.id),
        tenant_id: Some(tenant.id),
        rooming_house_id: tenant.rooming_house_id,
        description: input.description(),
    }
    .into_active_model()
    .insert(&txn)
    .await?;
    update_tenant_guarded(
        &txn,
        &tenant,
        vec![
            (tenant::Column::StartDate, Expr::value(Some(start))),
            (tenant::Column::EndDate, Expr::value(Some(end))),
        ],
    )
    .await?;
    txn.commit().await?;

    info!(
        tenant_id = %tenant.id,
        amount,
        %start,
        %end,
        "Posted rent"
    );
    Ok(posted)
}

/// Takes a seat back in the room for a tenant whose lease had lapsed.
///
/// A tenant that still holds its room, or whose new lease ends before today, changes
/// nothing. Otherwise the tenant and its assistants must fit next to the current
/// occupants, and the room's version is bumped.
async fn readmit_tenant<C>(
    db: &C,
    tenant: &tenant::Model,
    room_id: Uuid,
    end: NaiveDate,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let day = today();
    if end < day {
        return Ok(());
    }
    let occupancy = load_occupancy(db, room_id, day).await?;
    if occupancy.holders.iter().any(|h| h.id == tenant.id) {
        return Ok(());
    }

    let room = Room::find_by_id(room_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("room not found"))?;
    let assistants = Tenant::find()
        .filter(tenant::Column::ParentTenantId.eq(tenant.id))
        .filter(tenant::Column::IsTenant.eq(false))
        .count(db)
        .await?;
    let returning = usize::try_from(assistants).unwrap_or(usize::MAX).saturating_add(1);
    let fits = usize::try_from(room.max_capacity)
        .is_ok_and(|max| occupancy.occupant_count().saturating_add(returning) <= max);
    if !fits {
        return Err(Error::bad_request("room is full"));
    }
    claim_room(db, &room).await
}

/// Rent for `duration` periods plus one period of every selected add-on.
#[must_use]
pub fn rent_amount(period_price: f64, duration: i32, additional_total: f64) -> f64 {
    period_price.mul_add(f64::from(duration), additional_total)
}

async fn post_deposit(
    db: &DatabaseConnection,
    identity: &Identity,
    input: &TransactionInput,
    category: &transaction_category::Model,
    date: NaiveDate,
) -> Result<transaction::Model> {
    let tenant_id = input.tenant_id()?;
    let amount = input.positive_amount()?;
    let tenant = find_visible_tenant(db, identity, tenant_id).await?;
    if !tenant.is_tenant {
        return Err(Error::bad_request("need a tenant"));
    }
    if tenant.is_deposit_paid {
        return Err(Error::bad_request("deposit already paid"));
    }

    let txn = db.begin().await?;
    let posted = Posting {
        date,
        amount,
        category_id: category.id,
        room_id: tenant.room_id,
        tenant_id: Some(tenant.id),
        rooming_house_id: tenant.rooming_house_id,
        description: input.description(),
    }
    .into_active_model()
    .insert(&txn)
    .await?;
    update_tenant_guarded(
        &txn,
        &tenant,
        vec![
            (tenant::Column::IsDepositPaid, Expr::value(true)),
            (tenant::Column::IsDepositBack, Expr::value(false)),
        ],
    )
    .await?;
    txn.commit().await?;

    info!(tenant_id = %tenant.id, amount, "Posted deposit");
    Ok(posted)
}

async fn post_deposit_payback(
    db: &DatabaseConnection,
    identity: &Identity,
    input: &TransactionInput,
    category: &transaction_category::Model,
    date: NaiveDate,
) -> Result<transaction::Model> {
    let tenant_id = input.tenant_id()?;
    let amount = input.positive_amount()?;
    let tenant = find_visible_tenant(db, identity, tenant_id).await?;
    if !tenant.is_deposit_paid {
        return Err(Error::bad_request("deposit not paid"));
    }

    let txn = db.begin().await?;
    let posted = Posting {
        date,
        amount,
        category_id: category.id,
        room_id: None,
        tenant_id: Some(tenant.id),
        rooming_house_id: tenant.rooming_house_id,
        description: input.description(),
    }
    .into_active_model()
    .insert(&txn)
    .await?;
    update_tenant_guarded(
        &txn,
        &tenant,
        vec![
            (tenant::Column::IsDepositPaid, Expr::value(false)),
            (tenant::Column::IsDepositBack, Expr::value(true)),
        ],
    )
    .await?;
    txn.commit().await?;

    info!(tenant_id = %tenant.id, amount, "Posted deposit payback");
    Ok(posted)
}

async fn post_generic(
    db: &DatabaseConnection,
    identity: &Identity,
    input: &TransactionInput,
    category: &transaction_category::Model,
    date: NaiveDate,
) -> Result<transaction::Model> {
    let amount = input.positive_amount()?;
    let (room_id, rooming_house_id) = if input.is_room {
        let room_id = input
            .room_id
            .ok_or_else(|| Error::bad_request("room is required"))?;
        let room = find_visible_room(db, identity, room_id).await?;
        (Some(room.id), room.rooming_house_id)
    } else {
        let house = resolve_target_rooming_house(db, identity, input.rooming_house_id).await?;
        (None, house.id)
    };

    let posted = Posting {
        date,
        amount,
        category_id: category.id,
        room_id,
        tenant_id: None,
        rooming_house_id,
        description: input.description(),
    }
    .into_active_model()
    .insert(db)
    .await?;

    info!(
        transaction_id = %posted.id,
        category = %category.name,
        amount,
        "Posted ledger entry"
    );
    Ok(posted)
}

/// Applies `changes` to a tenant and bumps its version, unless the tenant changed
/// since it was read.
async fn update_tenant_guarded<C>(
    db: &C,
    tenant: &tenant::Model,
    changes: Vec<(tenant::Column, SimpleExpr)>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut update = Tenant::update_many();
    for (column, value) in changes {
        update = update.col_expr(column, value);
    }
    let result = update
        .col_expr(
            tenant::Column::Version,
            Expr::col(tenant::Column::Version).add(1),
        )
        .filter(tenant::Column::Id.eq(tenant.id))
        .filter(tenant::Column::Version.eq(tenant.version))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::conflict("tenant was modified concurrently, please retry"));
    }
    Ok(())
}

/// Lists every ledger row of the visible rooming houses, newest first.
pub async fn find_all_transactions(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<TransactionListItem>> {
    let scope = resolve_scope(db, identity).await?;
    let house_ids = scope.rooming_house_ids().to_vec();

    let transactions = Transaction::find()
        .filter(transaction::Column::RoomingHouseId.is_in(house_ids.clone()))
        .order_by_desc(transaction::Column::Year)
        .order_by_desc(transaction::Column::Month)
        .order_by_desc(transaction::Column::Day)
        .order_by_desc(transaction::Column::CreatedAt)
        .all(db)
        .await?;

    let categories: HashMap<Uuid, transaction_category::Model> = TransactionCategory::find()
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let house_names: HashMap<Uuid, String> = RoomingHouse::find()
        .filter(rooming_house::Column::Id.is_in(house_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|h| (h.id, h.name))
        .collect();

    Ok(transactions
        .into_iter()
        .map(|transaction| {
            let category = categories.get(&transaction.transaction_category_id);
            TransactionListItem {
                category_name: category.map(|c| c.name.clone()).unwrap_or_default(),
                is_expense: category.is_some_and(|c| c.is_expense),
                rooming_house_name: house_names
                    .get(&transaction.rooming_house_id)
                    .cloned()
                    .unwrap_or_default(),
                transaction,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]
    use super::*;
    use crate::{
        core::{
            additional::create_additional,
            catalog::find_category_by_name,
            pricing::{PeriodPrices, PricedItemInput},
            tenant::delete_tenant,
        },
        entities::{PeriodPackage, period_package},
        test_utils::*,
    };
    use chrono::Datelike;

    async fn category_id(db: &DatabaseConnection, name: &str) -> Uuid {
        find_category_by_name(db, name).await.unwrap().unwrap().id
    }

    fn on(day: i32, month: i32, year: i32) -> TransactionInput {
        TransactionInput {
            day,
            month,
            year,
            ..TransactionInput::default()
        }
    }

    #[test]
    fn test_rent_amount() {
        assert_eq!(rent_amount(1_000_000.0, 3, 50_000.0), 3_050_000.0);
        assert_eq!(rent_amount(75_000.0, 1, 0.0), 75_000.0);
    }

    #[tokio::test]
    async fn test_rent_computes_amount_and_lease() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_test_fixture(&db).await?;
        let owner = Identity::owner(fixture.owner.id);
        let laundry = create_additional(
            &db,
            &owner,
            &PricedItemInput {
                name: "Laundry".to_string(),
                rooming_house_id: Some(fixture.house.id),
                prices: PeriodPrices {
                    daily: 2_000.0,
                    weekly: 12_000.0,
                    monthly: 50_000.0,
                    annual: 550_000.0,
                },
            },
        )
        .await?;
        let tenant = create_test_primary_tenant(&db, &fixture, "Budi", 3, &[laundry.id]).await?;

        let input = TransactionInput {
            transaction_category_id: Some(category_id(&db, "Rent").await),
            tenant_id: Some(tenant.id),
            amount: Some(1.0),
            ..on(31, 1, 2024)
        };
        let posted = create_transaction(&db, &owner, &input).await?;
        assert_eq!(posted.amount, 3_050_000.0);
        assert_eq!(posted.room_id, Some(fixture.room.id));
        assert_eq!(posted.rooming_house_id, fixture.house.id);

        let updated = Tenant::find_by_id(tenant.id).one(&db).await?.unwrap();
        assert_eq!(updated.start_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(updated.end_date, NaiveDate::from_ymd_opt(2024, 4, 30));
        assert_eq!(updated.version, tenant.version + 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_rent_requires_primary_tenant() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_test_fixture(&db).await?;
        let owner = Identity::owner(fixture.owner.id);
        let primary = create_test_primary_tenant(&db, &fixture, "Budi", 1, &[]).await?;
        let helper = create_test_assistant(&db, &fixture, "Siti", primary.id).await?;
        let rent = category_id(&db, "Rent").await;

        let missing = create_transaction(
            &db,
            &owner,
            &TransactionInput {
                transaction_category_id: Some(rent),
                ..on(1, 2, 2024)
            },
        )
        .await;
        assert_eq!(missing.unwrap_err().to_string(), "tenant is required");

        let assistant = create_transaction(
            &db,
            &owner,
            &TransactionInput {
                transaction_category_id: Some(rent),
                tenant_id: Some(helper.id),
                ..on(1, 2, 2024)
            },
        )
        .await;
        assert!(matches!(assistant, Err(Error::BadRequest { .. })));

        let bad_date = create_transaction(
            &db,
            &owner,
            &TransactionInput {
                transaction_category_id: Some(rent),
                tenant_id: Some(primary.id),
                ..on(30, 2, 2024)
            },
        )
        .await;
        assert!(matches!(bad_date, Err(Error::BadRequest { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_rent_without_period_price_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_test_fixture(&db).await?;
        let owner = Identity::owner(fixture.owner.id);
        let tenant = create_test_primary_tenant(&db, &fixture, "Budi", 1, &[]).await?;

        PeriodPackage::delete_many()
            .filter(period_package::Column::PricingPackageId.eq(fixture.package.id))
            .filter(period_package::Column::PeriodId.eq(fixture.monthly.id))
            .exec(&db)
            .await?;

        let result = create_transaction(
            &db,
            &owner,
            &TransactionInput {
                transaction_category_id: Some(category_id(&db, "Rent").await),
                tenant_id: Some(tenant.id),
                ..on(1, 2, 2024)
            },
        )
        .await;
        assert!(matches!(result, Err(Error::NotFound { .. })));

        assert!(Transaction::find().all(&db).await?.is_empty());
        let stored = Tenant::find_by_id(tenant.id).one(&db).await?.unwrap();
        assert_eq!(stored.start_date, None);
        assert_eq!(stored.end_date, None);
        assert_eq!(stored.version, tenant.version);
        Ok(())
    }

    #[tokio::test]
    async fn test_rent_after_lapse_respects_capacity() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_test_fixture(&db).await?;
        let owner = Identity::owner(fixture.owner.id);
        let rent = category_id(&db, "Rent").await;
        let returning = create_test_primary_tenant(&db, &fixture, "Budi", 1, &[]).await?;

        create_transaction(
            &db,
            &owner,
            &TransactionInput {
                transaction_category_id: Some(rent),
                tenant_id: Some(returning.id),
                ..on(1, 1, 2020)
            },
        )
        .await?;
        create_test_primary_tenant(&db, &fixture, "Andi", 1, &[]).await?;
        let last = create_test_primary_tenant(&db, &fixture, "Joko", 1, &[]).await?;

        let now = today();
        let current = TransactionInput {
            transaction_category_id: Some(rent),
            tenant_id: Some(returning.id),
            ..on(
                i32::try_from(now.day()).unwrap(),
                i32::try_from(now.month()).unwrap(),
                now.year(),
            )
        };
        let full = create_transaction(&db, &owner, &current).await;
        assert_eq!(full.unwrap_err().to_string(), "room is full");

        let stored = Tenant::find_by_id(returning.id).one(&db).await?.unwrap();
        assert_eq!(stored.end_date, NaiveDate::from_ymd_opt(2020, 2, 1));
        assert_eq!(Transaction::find().all(&db).await?.len(), 1);
        let occupancy = load_occupancy(&db, fixture.room.id, now).await?;
        assert_eq!(occupancy.occupant_count(), 2);

        delete_tenant(&db, &owner, last.id).await?;
        let room_before = Room::find_by_id(fixture.room.id).one(&db).await?.unwrap();
        create_transaction(&db, &owner, &current).await?;
        let room_after = Room::find_by_id(fixture.room.id).one(&db).await?.unwrap();
        assert_eq!(room_after.version, room_before.version + 1);

        let occupancy = load_occupancy(&db, fixture.room.id, now).await?;
        assert_eq!(occupancy.occupant_count(), 2);
        assert!(occupancy.holders.iter().any(|h| h.id == returning.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_deposit_state_machine() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_test_fixture(&db).await?;
        let admin = Identity::admin(Uuid::new_v4(), fixture.house.id);
        let tenant = create_test_primary_tenant(&db, &fixture, "Budi", 1, &[]).await?;
        let deposit = category_id(&db, "Deposit").await;
        let payback = category_id(&db, "Deposit Payback").await;

        let early_payback = create_transaction(
            &db,
            &admin,
            &TransactionInput {
                transaction_category_id: Some(payback),
                tenant_id: Some(tenant.id),
                amount: Some(500_000.0),
                ..on(1, 3, 2024)
            },
        )
        .await;
        assert_eq!(early_payback.unwrap_err().to_string(), "deposit not paid");

        let no_amount = create_transaction(
            &db,
            &admin,
            &TransactionInput {
                transaction_category_id: Some(deposit),
                tenant_id: Some(tenant.id),
                ..on(1, 3, 2024)
            },
        )
        .await;
        assert!(matches!(no_amount, Err(Error::BadRequest { .. })));

        let paid = TransactionInput {
            transaction_category_id: Some(deposit),
            tenant_id: Some(tenant.id),
            amount: Some(500_000.0),
            ..on(1, 3, 2024)
        };
        let posted = create_transaction(&db, &admin, &paid).await?;
        assert_eq!(posted.amount, 500_000.0);
        let stored = Tenant::find_by_id(tenant.id).one(&db).await?.unwrap();
        assert!(stored.is_deposit_paid);
        assert!(!stored.is_deposit_back);

        let twice = create_transaction(&db, &admin, &paid).await;
        assert_eq!(twice.unwrap_err().to_string(), "deposit already paid");

        create_transaction(
            &db,
            &admin,
            &TransactionInput {
                transaction_category_id: Some(payback),
                tenant_id: Some(tenant.id),
                amount: Some(500_000.0),
                ..on(1, 9, 2024)
            },
        )
        .await?;
        let stored = Tenant::find_by_id(tenant.id).one(&db).await?.unwrap();
        assert!(!stored.is_deposit_paid);
        assert!(stored.is_deposit_back);
        Ok(())
    }

    #[tokio::test]
    async fn test_generic_entries_need_a_target() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_test_fixture(&db).await?;
        let owner = Identity::owner(fixture.owner.id);
        let maintenance = category_id(&db, "Maintenance").await;

        let no_room = create_transaction(
            &db,
            &owner,
            &TransactionInput {
                transaction_category_id: Some(maintenance),
                amount: Some(100.0),
                is_room: true,
                ..on(5, 3, 2024)
            },
        )
        .await;
        assert_eq!(no_room.unwrap_err().to_string(), "room is required");

        let on_room = create_transaction(
            &db,
            &owner,
            &TransactionInput {
                transaction_category_id: Some(maintenance),
                amount: Some(100.0),
                is_room: true,
                room_id: Some(fixture.room.id),
                ..on(5, 3, 2024)
            },
        )
        .await?;
        assert_eq!(on_room.room_id, Some(fixture.room.id));
        assert_eq!(on_room.tenant_id, None);

        let on_house = create_transaction(
            &db,
            &owner,
            &TransactionInput {
                transaction_category_id: Some(maintenance),
                amount: Some(250.0),
                rooming_house_id: Some(fixture.house.id),
                description: Some(" roof ".to_string()),
                ..on(6, 3, 2024)
            },
        )
        .await?;
        assert_eq!(on_house.room_id, None);
        assert_eq!(on_house.description.as_deref(), Some("roof"));

        let zero = create_transaction(
            &db,
            &owner,
            &TransactionInput {
                transaction_category_id: Some(maintenance),
                amount: Some(0.0),
                rooming_house_id: Some(fixture.house.id),
                ..on(6, 3, 2024)
            },
        )
        .await;
        assert!(matches!(zero, Err(Error::BadRequest { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_find_all_is_scoped() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_test_fixture(&db).await?;
        let other = create_test_rooming_house(&db, fixture.owner.id, "Kos Mawar").await?;
        let owner = Identity::owner(fixture.owner.id);
        let utilities = category_id(&db, "Utilities").await;

        for (house, amount) in [(fixture.house.id, 10.0), (other.id, 20.0)] {
            create_transaction(
                &db,
                &owner,
                &TransactionInput {
                    transaction_category_id: Some(utilities),
                    amount: Some(amount),
                    rooming_house_id: Some(house),
                    ..on(1, 1, 2024)
                },
            )
            .await?;
        }

        assert_eq!(find_all_transactions(&db, &owner).await?.len(), 2);

        let admin = Identity::admin(Uuid::new_v4(), other.id);
        let visible = find_all_transactions(&db, &admin).await?;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].transaction.amount, 20.0);
        assert_eq!(visible[0].category_name, "Utilities");
        assert!(visible[0].is_expense);
        assert_eq!(visible[0].rooming_house_name, "Kos Mawar");
        Ok(())
    }
}
