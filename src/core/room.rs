//! Rooms and their derived occupancy.
//!
//! Occupancy is never stored. A primary tenant holds a room while its lease has not
//! ended yet, which includes a tenant that registered but has not paid rent. Every
//! assistant attached to a holding tenant counts as an occupant too. A room is vacant
//! when no holding tenant's `[start_date, end_date]` covers today.
//!
//! Writes that depend on occupancy bump `rooms.version` with a compare-and-set in the
//! same database transaction, so two concurrent admissions cannot both pass the
//! capacity check.

use crate::{
    core::{
        package::find_period_package_price,
        pricing::{period_names_by_id, price_map},
        property::resolve_target_rooming_house,
        scope::{Identity, resolve_scope},
    },
    entities::{
        PeriodPackage, PricingPackage, Room, RoomingHouse, Tenant, period_package,
        pricing_package, room, rooming_house, tenant,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    QueryOrder, Set, TransactionTrait, prelude::*,
    sea_query::{Expr, Value},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument};

/// Create/update payload for a room.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomInput {
    /// Room label
    pub name: String,
    /// Floor, between 1 and the rooming house floor total
    pub floor: i32,
    /// Maximum number of occupants
    pub max_capacity: i32,
    /// Pricing package of the same rooming house
    pub pricing_package_id: Uuid,
    /// Optional size catalog reference
    #[serde(default)]
    pub size_id: Option<Uuid>,
    /// Target rooming house on create; owners must set it, admins use their own
    #[serde(default)]
    pub rooming_house_id: Option<Uuid>,
}

/// Short reference to an occupant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupantRef {
    /// Tenant id
    pub id: Uuid,
    /// Tenant name
    pub name: String,
    /// Lease start, if rent was paid
    pub start_date: Option<NaiveDate>,
    /// Lease end, if rent was paid
    pub end_date: Option<NaiveDate>,
}

impl From<&tenant::Model> for OccupantRef {
    fn from(tenant: &tenant::Model) -> Self {
        Self {
            id: tenant.id,
            name: tenant.name.clone(),
            start_date: tenant.start_date,
            end_date: tenant.end_date,
        }
    }
}

/// Who occupies a room on a given day.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    /// Primary tenants whose lease has not ended
    pub holders: Vec<tenant::Model>,
    /// Assistants attached to one of the holders
    pub assistants: Vec<tenant::Model>,
    today: Option<NaiveDate>,
}

impl Occupancy {
    /// Derives the occupancy of `room_id` from candidate tenants.
    ///
    /// `primaries` may contain tenants of other rooms; `assistants` may contain
    /// assistants of non-holding tenants. Both are filtered here.
    #[must_use]
    pub fn derive(
        room_id: Uuid,
        primaries: &[tenant::Model],
        assistants: &[tenant::Model],
        today: NaiveDate,
    ) -> Self {
        let holders: Vec<tenant::Model> = primaries
            .iter()
            .filter(|t| t.is_tenant && t.room_id == Some(room_id) && holds_on(t, today))
            .cloned()
            .collect();
        let assistants = assistants
            .iter()
            .filter(|a| {
                !a.is_tenant
                    && a.parent_tenant_id
                        .is_some_and(|parent| holders.iter().any(|h| h.id == parent))
            })
            .cloned()
            .collect();
        Self {
            holders,
            assistants,
            today: Some(today),
        }
    }

    /// Primary tenants plus their assistants.
    #[must_use]
    pub fn occupant_count(&self) -> usize {
        self.holders.len() + self.assistants.len()
    }

    /// Whether one more occupant fits under `max_capacity`.
    #[must_use]
    pub fn has_room_for_one_more(&self, max_capacity: i32) -> bool {
        usize::try_from(max_capacity).is_ok_and(|max| self.occupant_count() < max)
    }

    /// The primary tenant whose lease covers today.
    #[must_use]
    pub fn active_tenant(&self) -> Option<&tenant::Model> {
        let today = self.today?;
        self.holders.iter().find(|t| lease_covers(t, today))
    }

    /// The active primary tenant, else the earliest registered holder.
    #[must_use]
    pub fn primary_tenant(&self) -> Option<&tenant::Model> {
        self.active_tenant().or_else(|| self.holders.first())
    }

    /// No primary tenant's lease covers today.
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        self.active_tenant().is_none()
    }
}

/// Whether `tenant`'s paid lease interval contains `day`.
#[must_use]
pub fn lease_covers(tenant: &tenant::Model, day: NaiveDate) -> bool {
    matches!(
        (tenant.start_date, tenant.end_date),
        (Some(start), Some(end)) if start <= day && day <= end
    )
}

/// Whether a primary tenant still holds its room on `day`.
fn holds_on(tenant: &tenant::Model, day: NaiveDate) -> bool {
    tenant.end_date.is_none_or(|end| end >= day)
}

/// A room with its derived occupancy.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummary {
    /// Stored room fields
    #[serde(flatten)]
    pub room: room::Model,
    /// Name of the owning rooming house
    pub rooming_house_name: String,
    /// Name of the billing package
    pub pricing_package_name: String,
    /// Primary tenant holding the room, if any
    pub primary_tenant: Option<OccupantRef>,
    /// Primary tenants plus assistants
    pub occupant_count: usize,
    /// No lease covers today
    pub is_vacant: bool,
}

/// A room with occupancy, prices and assistants.
#[derive(Debug, Clone, Serialize)]
pub struct RoomDetail {
    /// Summary fields
    #[serde(flatten)]
    pub summary: RoomSummary,
    /// Package price per period name
    pub prices: BTreeMap<String, f64>,
    /// Assistants sharing the room
    pub assistants: Vec<OccupantRef>,
}

/// Today's date in UTC, the reference day for occupancy.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Loads the occupancy of a room on `day`.
pub async fn load_occupancy<C>(db: &C, room_id: Uuid, day: NaiveDate) -> Result<Occupancy>
where
    C: ConnectionTrait,
{
    let primaries = Tenant::find()
        .filter(tenant::Column::RoomId.eq(room_id))
        .filter(tenant::Column::IsTenant.eq(true))
        .order_by_asc(tenant::Column::CreatedAt)
        .all(db)
        .await?;
    let assistants = load_assistants_of(db, primaries.iter().map(|t| t.id).collect()).await?;
    Ok(Occupancy::derive(room_id, &primaries, &assistants, day))
}

async fn load_assistants_of<C>(db: &C, parent_ids: Vec<Uuid>) -> Result<Vec<tenant::Model>>
where
    C: ConnectionTrait,
{
    if parent_ids.is_empty() {
        return Ok(Vec::new());
    }
    Tenant::find()
        .filter(tenant::Column::IsTenant.eq(false))
        .filter(tenant::Column::ParentTenantId.is_in(parent_ids))
        .order_by_asc(tenant::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Bumps the room's version if nobody changed it since `room` was read.
///
/// Fails with `Conflict` when the stored version moved on.
pub async fn claim_room<C>(db: &C, room: &room::Model) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Room::update_many()
        .col_expr(
            room::Column::Version,
            Expr::col(room::Column::Version).add(1),
        )
        .filter(room::Column::Id.eq(room.id))
        .filter(room::Column::Version.eq(room.version))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        debug!(room_id = %room.id, version = room.version, "Room version moved on");
        return Err(Error::conflict("room was modified concurrently, please retry"));
    }
    Ok(())
}

/// Fetches a room whose rooming house is visible to the caller.
pub async fn find_visible_room<C>(db: &C, identity: &Identity, id: Uuid) -> Result<room::Model>
where
    C: ConnectionTrait,
{
    let room = Room::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("room not found"))?;
    resolve_scope(db, identity)
        .await?
        .ensure(room.rooming_house_id, "room")?;
    Ok(room)
}

fn validate(input: &RoomInput, house: &rooming_house::Model) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::bad_request("name is required"));
    }
    if input.floor < 1 || input.floor > house.floor_total {
        return Err(Error::bad_request(format!(
            "floor must be between 1 and {}",
            house.floor_total
        )));
    }
    if input.max_capacity < 1 {
        return Err(Error::bad_request("max capacity must be at least 1"));
    }
    Ok(())
}

async fn ensure_package_in_house<C>(db: &C, package_id: Uuid, house_id: Uuid) -> Result<()>
where
    C: ConnectionTrait,
{
    PricingPackage::find_by_id(package_id)
        .filter(pricing_package::Column::RoomingHouseId.eq(house_id))
        .one(db)
        .await?
        .map(|_| ())
        .ok_or_else(|| Error::not_found("pricing package not found"))
}

/// Creates a room in the target rooming house.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_room(
    db: &DatabaseConnection,
    identity: &Identity,
    input: &RoomInput,
) -> Result<room::Model> {
    let house = resolve_target_rooming_house(db, identity, input.rooming_house_id).await?;
    validate(input, &house)?;
    ensure_package_in_house(db, input.pricing_package_id, house.id).await?;

    let room = room::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        floor: Set(input.floor),
        max_capacity: Set(input.max_capacity),
        size_id: Set(input.size_id),
        pricing_package_id: Set(input.pricing_package_id),
        rooming_house_id: Set(house.id),
        version: Set(0),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    info!(room_id = %room.id, rooming_house_id = %house.id, "Created room");
    Ok(room)
}

/// Updates a room's label, floor, capacity, package and size.
///
/// The room stays in its rooming house. Capacity may not drop below the current
/// occupant count.
#[instrument(skip(db, input))]
pub async fn update_room(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
    input: &RoomInput,
) -> Result<room::Model> {
    let current = find_visible_room(db, identity, id).await?;
    let house = RoomingHouse::find_by_id(current.rooming_house_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("rooming house not found"))?;
    validate(input, &house)?;
    ensure_package_in_house(db, input.pricing_package_id, house.id).await?;

    let txn = db.begin().await?;
    let occupancy = load_occupancy(&txn, id, today()).await?;
    let occupants = occupancy.occupant_count();
    if usize::try_from(input.max_capacity).is_ok_and(|max| max < occupants) {
        return Err(Error::bad_request(format!(
            "max capacity cannot be lower than the {occupants} current occupant(s)"
        )));
    }

    let result = Room::update_many()
        .col_expr(room::Column::Name, Expr::value(input.name.trim().to_string()))
        .col_expr(room::Column::Floor, Expr::value(input.floor))
        .col_expr(room::Column::MaxCapacity, Expr::value(input.max_capacity))
        .col_expr(room::Column::PricingPackageId, Expr::value(input.pricing_package_id))
        .col_expr(room::Column::SizeId, Expr::value(Value::from(input.size_id)))
        .col_expr(room::Column::Version, Expr::col(room::Column::Version).add(1))
        .filter(room::Column::Id.eq(id))
        .filter(room::Column::Version.eq(current.version))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::conflict("room was modified concurrently, please retry"));
    }
    let updated = Room::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("room not found"))?;
    txn.commit().await?;

    info!(room_id = %id, "Updated room");
    Ok(updated)
}

/// Deletes an empty room. Owner only.
#[instrument(skip(db))]
pub async fn delete_room(db: &DatabaseConnection, identity: &Identity, id: Uuid) -> Result<()> {
    identity.require_owner()?;
    let room = find_visible_room(db, identity, id).await?;

    let txn = db.begin().await?;
    let occupancy = load_occupancy(&txn, id, today()).await?;
    if occupancy.occupant_count() > 0 {
        return Err(Error::bad_request("room is occupied"));
    }
    claim_room(&txn, &room).await?;
    Room::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    info!(room_id = %id, "Deleted room");
    Ok(())
}

/// Lists the rooms of every visible rooming house with their occupancy.
pub async fn find_all_rooms(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<RoomSummary>> {
    let scope = resolve_scope(db, identity).await?;
    let house_ids = scope.rooming_house_ids().to_vec();

    let rooms = Room::find()
        .filter(room::Column::RoomingHouseId.is_in(house_ids.clone()))
        .order_by_asc(room::Column::Floor)
        .order_by_asc(room::Column::Name)
        .all(db)
        .await?;
    let room_ids: Vec<Uuid> = rooms.iter().map(|r| r.id).collect();

    let house_names: HashMap<Uuid, String> = RoomingHouse::find()
        .filter(rooming_house::Column::Id.is_in(house_ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|h| (h.id, h.name))
        .collect();
    let package_names: HashMap<Uuid, String> = PricingPackage::find()
        .filter(pricing_package::Column::RoomingHouseId.is_in(house_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    let primaries = Tenant::find()
        .filter(tenant::Column::IsTenant.eq(true))
        .filter(tenant::Column::RoomId.is_in(room_ids))
        .order_by_asc(tenant::Column::CreatedAt)
        .all(db)
        .await?;
    let assistants = load_assistants_of(db, primaries.iter().map(|t| t.id).collect()).await?;

    let day = today();
    Ok(rooms
        .into_iter()
        .map(|room| {
            let occupancy = Occupancy::derive(room.id, &primaries, &assistants, day);
            summarize(room, &occupancy, &house_names, &package_names)
        })
        .collect())
}

/// Fetches one room with its prices, occupancy and assistants.
pub async fn find_room_by_id(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
) -> Result<RoomDetail> {
    let room = find_visible_room(db, identity, id).await?;
    let occupancy = load_occupancy(db, id, today()).await?;

    let house_names: HashMap<Uuid, String> = RoomingHouse::find_by_id(room.rooming_house_id)
        .one(db)
        .await?
        .into_iter()
        .map(|h| (h.id, h.name))
        .collect();
    let package_names: HashMap<Uuid, String> = PricingPackage::find_by_id(room.pricing_package_id)
        .one(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    let period_names = period_names_by_id(db).await?;
    let prices = PeriodPackage::find()
        .filter(period_package::Column::PricingPackageId.eq(room.pricing_package_id))
        .all(db)
        .await?;
    let prices = price_map(&period_names, prices.into_iter().map(|p| (p.period_id, p.price)));

    let primary = occupancy.primary_tenant().map(|t| t.id);
    let assistants = occupancy
        .assistants
        .iter()
        .filter(|a| a.parent_tenant_id == primary)
        .map(OccupantRef::from)
        .collect();

    Ok(RoomDetail {
        summary: summarize(room, &occupancy, &house_names, &package_names),
        prices,
        assistants,
    })
}

/// Price of one unit of `period_id` in the room's package.
pub async fn find_room_price<C>(db: &C, room: &room::Model, period_id: Uuid) -> Result<f64>
where
    C: ConnectionTrait,
{
    find_period_package_price(db, room.pricing_package_id, period_id).await
}

fn summarize(
    room: room::Model,
    occupancy: &Occupancy,
    house_names: &HashMap<Uuid, String>,
    package_names: &HashMap<Uuid, String>,
) -> RoomSummary {
    RoomSummary {
        rooming_house_name: house_names
            .get(&room.rooming_house_id)
            .cloned()
            .unwrap_or_default(),
        pricing_package_name: package_names
            .get(&room.pricing_package_id)
            .cloned()
            .unwrap_or_default(),
        primary_tenant: occupancy.primary_tenant().map(OccupantRef::from),
        occupant_count: occupancy.occupant_count(),
        is_vacant: occupancy.is_vacant(),
        room,
    }
}
