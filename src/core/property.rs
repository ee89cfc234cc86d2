//! Rooming house business logic.
//!
//! Only owners create, modify or remove rooming houses. Admins can read the one
//! rooming house they are bound to.

use crate::{
    core::scope::{Identity, resolve_scope},
    entities::{
        AdditionalPeriod, AdditionalPrice, Admin, PeriodPackage, PricingPackage, Room,
        RoomingHouse, additional_period, additional_price, admin, period_package,
        pricing_package, room, rooming_house,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Create/update payload for a rooming house.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomingHouseInput {
    /// Display name
    pub name: String,
    /// Street address
    pub address: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Number of floors
    pub floor_total: i32,
}

impl RoomingHouseInput {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::bad_request("name is required"));
        }
        if self.address.trim().is_empty() {
            return Err(Error::bad_request("address is required"));
        }
        if self.floor_total < 1 {
            return Err(Error::bad_request("floor total must be at least 1"));
        }
        Ok(())
    }

    fn description(&self) -> Option<String> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(ToString::to_string)
    }
}

/// Creates a rooming house owned by the calling owner.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_rooming_house(
    db: &DatabaseConnection,
    identity: &Identity,
    input: &RoomingHouseInput,
) -> Result<rooming_house::Model> {
    identity.require_owner()?;
    input.validate()?;

    let now = Utc::now();
    let house = rooming_house::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        address: Set(input.address.trim().to_string()),
        description: Set(input.description()),
        floor_total: Set(input.floor_total),
        owner_id: Set(identity.user_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    info!(rooming_house_id = %house.id, "Created rooming house");
    Ok(house)
}

/// Lists the rooming houses visible to the caller.
pub async fn find_all_rooming_houses(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<rooming_house::Model>> {
    let scope = resolve_scope(db, identity).await?;
    RoomingHouse::find()
        .filter(rooming_house::Column::Id.is_in(scope.rooming_house_ids().to_vec()))
        .order_by_asc(rooming_house::Column::CreatedAt)
        .order_by_asc(rooming_house::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Fetches a rooming house if it exists and is visible to the caller.
pub async fn find_rooming_house_by_id<C>(
    db: &C,
    identity: &Identity,
    id: Uuid,
) -> Result<rooming_house::Model>
where
    C: ConnectionTrait,
{
    let scope = resolve_scope(db, identity).await?;
    scope.ensure(id, "rooming house")?;
    RoomingHouse::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("rooming house not found"))
}

/// Resolves the rooming house a write targets and checks it is visible.
///
/// Owners pick it in the payload, admins always target their own.
pub async fn resolve_target_rooming_house<C>(
    db: &C,
    identity: &Identity,
    requested: Option<Uuid>,
) -> Result<rooming_house::Model>
where
    C: ConnectionTrait,
{
    let id = identity.target_rooming_house(requested)?;
    find_rooming_house_by_id(db, identity, id).await
}

/// Renames or re-describes a rooming house. Owner only.
///
/// The floor total may not drop below the highest floor used by a room.
#[instrument(skip(db, input))]
pub async fn update_rooming_house(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
    input: &RoomingHouseInput,
) -> Result<rooming_house::Model> {
    identity.require_owner()?;
    input.validate()?;
    let house = find_rooming_house_by_id(db, identity, id).await?;

    let highest_floor = Room::find()
        .filter(room::Column::RoomingHouseId.eq(id))
        .order_by_desc(room::Column::Floor)
        .one(db)
        .await?
        .map(|r| r.floor);
    if let Some(floor) = highest_floor.filter(|floor| *floor > input.floor_total) {
        return Err(Error::bad_request(format!(
            "floor total cannot be lower than floor {floor} used by a room"
        )));
    }

    let mut active: rooming_house::ActiveModel = house.into();
    active.name = Set(input.name.trim().to_string());
    active.address = Set(input.address.trim().to_string());
    active.description = Set(input.description());
    active.floor_total = Set(input.floor_total);
    active.updated_at = Set(Utc::now());

    let updated = active.update(db).await?;
    info!(rooming_house_id = %id, "Updated rooming house");
    Ok(updated)
}

/// Removes a rooming house together with its packages, add-ons and admins. Owner only.
///
/// Rejected while the rooming house still has rooms. Ledger rows are kept.
#[instrument(skip(db))]
pub async fn delete_rooming_house(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
) -> Result<()> {
    identity.require_owner()?;
    find_rooming_house_by_id(db, identity, id).await?;

    let rooms = Room::find()
        .filter(room::Column::RoomingHouseId.eq(id))
        .count(db)
        .await?;
    if rooms > 0 {
        return Err(Error::bad_request(format!(
            "rooming house still has {rooms} room(s)"
        )));
    }

    let txn = db.begin().await?;

    let package_ids: Vec<Uuid> = PricingPackage::find()
        .filter(pricing_package::Column::RoomingHouseId.eq(id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    PeriodPackage::delete_many()
        .filter(period_package::Column::PricingPackageId.is_in(package_ids))
        .exec(&txn)
        .await?;
    PricingPackage::delete_many()
        .filter(pricing_package::Column::RoomingHouseId.eq(id))
        .exec(&txn)
        .await?;

    let additional_ids: Vec<Uuid> = AdditionalPrice::find()
        .filter(additional_price::Column::RoomingHouseId.eq(id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|a| a.id)
        .collect();
    AdditionalPeriod::delete_many()
        .filter(additional_period::Column::AdditionalPriceId.is_in(additional_ids))
        .exec(&txn)
        .await?;
    AdditionalPrice::delete_many()
        .filter(additional_price::Column::RoomingHouseId.eq(id))
        .exec(&txn)
        .await?;

    Admin::delete_many()
        .filter(admin::Column::RoomingHouseId.eq(id))
        .exec(&txn)
        .await?;
    RoomingHouse::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    info!(rooming_house_id = %id, "Deleted rooming house");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn input(name: &str, floor_total: i32) -> RoomingHouseInput {
        RoomingHouseInput {
            name: name.to_string(),
            address: "Jl. Kenanga 12".to_string(),
            description: None,
            floor_total,
        }
    }

    #[tokio::test]
    async fn test_create_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let owner = Identity::owner(Uuid::new_v4());

        let result = create_rooming_house(&db, &owner, &input("   ", 3)).await;
        assert!(matches!(result, Err(Error::BadRequest { .. })));

        let result = create_rooming_house(&db, &owner, &input("Kos Melati", 0)).await;
        assert!(matches!(result, Err(Error::BadRequest { .. })));

        let admin = Identity::admin(Uuid::new_v4(), Uuid::new_v4());
        let result = create_rooming_house(&db, &admin, &input("Kos Melati", 3)).await;
        assert!(matches!(result, Err(Error::Forbidden { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_round_trip() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_owner(&db).await?;
        let identity = Identity::owner(owner.id);

        let created = create_rooming_house(&db, &identity, &input("Kos Melati", 3)).await?;
        let fetched = find_rooming_house_by_id(&db, &identity, created.id).await?;
        assert_eq!(fetched.name, "Kos Melati");
        assert_eq!(fetched.address, "Jl. Kenanga 12");
        assert_eq!(fetched.floor_total, 3);
        assert_eq!(fetched.owner_id, owner.id);

        let mut changed = input("Kos Melati Indah", 4);
        changed.description = Some("  near campus ".to_string());
        update_rooming_house(&db, &identity, created.id, &changed).await?;
        let fetched = find_rooming_house_by_id(&db, &identity, created.id).await?;
        assert_eq!(fetched.name, "Kos Melati Indah");
        assert_eq!(fetched.floor_total, 4);
        assert_eq!(fetched.description.as_deref(), Some("near campus"));

        delete_rooming_house(&db, &identity, created.id).await?;
        let gone = find_rooming_house_by_id(&db, &identity, created.id).await;
        assert!(matches!(gone, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_find_all_is_scoped() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_owner(&db).await?;
        let stranger = create_custom_owner(&db, "stranger@example.com").await?;
        let first = create_test_rooming_house(&db, owner.id, "Kos Melati").await?;
        let second = create_test_rooming_house(&db, owner.id, "Kos Mawar").await?;
        create_test_rooming_house(&db, stranger.id, "Kos Anggrek").await?;

        let owned = find_all_rooming_houses(&db, &Identity::owner(owner.id)).await?;
        let mut ids: Vec<_> = owned.iter().map(|h| h.id).collect();
        ids.sort();
        let mut expected = vec![first.id, second.id];
        expected.sort();
        assert_eq!(ids, expected);

        let admin = Identity::admin(Uuid::new_v4(), second.id);
        let visible = find_all_rooming_houses(&db, &admin).await?;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, second.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_property_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_owner(&db).await?;
        let stranger = create_custom_owner(&db, "stranger@example.com").await?;
        let foreign = create_test_rooming_house(&db, stranger.id, "Kos Anggrek").await?;
        let identity = Identity::owner(owner.id);

        let fetched = find_rooming_house_by_id(&db, &identity, foreign.id).await;
        assert!(matches!(fetched, Err(Error::NotFound { .. })));

        let deleted = delete_rooming_house(&db, &identity, foreign.id).await;
        assert!(matches!(deleted, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_validation_and_role_checks() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_owner(&db).await?;
        let identity = Identity::owner(owner.id);

        let zero_floors = create_rooming_house(&db, &identity, &input("Kos", 0)).await;
        assert!(matches!(zero_floors, Err(Error::BadRequest { .. })));

        let blank = create_rooming_house(&db, &identity, &input(" ", 2)).await;
        assert!(matches!(blank, Err(Error::BadRequest { .. })));

        let house = create_test_rooming_house(&db, owner.id, "Kos Melati").await?;
        let admin = Identity::admin(Uuid::new_v4(), house.id);
        let forbidden = update_rooming_house(&db, &admin, house.id, &input("Mine", 2)).await;
        assert!(matches!(forbidden, Err(Error::Forbidden { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_rejected_while_rooms_exist() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_test_fixture(&db).await?;
        let identity = Identity::owner(fixture.owner.id);

        let result = delete_rooming_house(&db, &identity, fixture.house.id).await;
        assert!(matches!(result, Err(Error::BadRequest { .. })));

        let shrink = update_rooming_house(&db, &identity, fixture.house.id, &input("Kos", 1)).await;
        assert!(shrink.is_ok());
        let room = create_test_room(&db, &fixture, "B-201", 2, 1).await;
        assert!(room.is_err());
        Ok(())
    }
}
