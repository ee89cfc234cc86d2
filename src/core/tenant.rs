//! Tenant registration, lookup and removal.
//!
//! Primary tenants book a room and a billing period. Assistants share the room of a
//! primary tenant and carry no billing state of their own. Registration checks the
//! room's derived occupancy and inserts the tenant with its add-on selections in one
//! database transaction guarded by the room's version.

use crate::{
    core::{
        additional::{AdditionalLine, ensure_additionals_belong_to, find_tenant_additional_lines},
        property::resolve_target_rooming_house,
        room::{claim_room, load_occupancy, today},
        scope::{Identity, resolve_scope},
    },
    entities::{
        Period, Room, RoomingHouse, Tenant, TenantAdditionalPrice, Transaction, period, room,
        rooming_house, tenant, tenant_additional_price, transaction,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Registration payload. Which fields are required depends on `is_tenant`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TenantInput {
    /// Full name
    pub name: String,
    /// Gender
    pub gender: String,
    /// Phone number
    pub phone_number: String,
    /// Emergency contact, required for primary tenants
    pub emergency_contact: Option<String>,
    /// Primary tenant (`true`) or assistant (`false`); must be present
    pub is_tenant: Option<bool>,
    /// Number of periods paid per rent payment, primary tenants only
    pub regular_payment_duration: Option<i32>,
    /// Booked room, primary tenants only
    pub room_id: Option<Uuid>,
    /// Billing period, primary tenants only
    pub period_id: Option<Uuid>,
    /// Target rooming house; owners must set it, admins use their own
    pub rooming_house_id: Option<Uuid>,
    /// Primary tenant an assistant joins
    pub parent_tenant_id: Option<Uuid>,
    /// Selected add-ons, primary tenants only
    pub tenant_additional_ids: Vec<Uuid>,
}

/// How a validated tenant enters a room.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Admission {
    Primary {
        emergency_contact: String,
        room_id: Uuid,
        period_id: Uuid,
        duration: i32,
    },
    Assistant {
        parent_id: Uuid,
    },
}

fn required(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(Error::bad_request(format!("{field} is required")))
    } else {
        Ok(value.to_string())
    }
}

impl TenantInput {
    /// Checks the role-dependent required fields, dropping fields the role ignores.
    fn admission(&self) -> Result<Admission> {
        let is_tenant = self
            .is_tenant
            .ok_or_else(|| Error::bad_request("is tenant is required"))?;
        if !is_tenant {
            let parent_id = self
                .parent_tenant_id
                .ok_or_else(|| Error::bad_request("need a tenant"))?;
            return Ok(Admission::Assistant { parent_id });
        }

        let emergency_contact = required(
            self.emergency_contact.as_deref().unwrap_or_default(),
            "emergency contact",
        )?;
        let room_id = self
            .room_id
            .ok_or_else(|| Error::bad_request("room is required"))?;
        let period_id = self
            .period_id
            .ok_or_else(|| Error::bad_request("period is required"))?;
        let duration = self
            .regular_payment_duration
            .filter(|d| *d > 0)
            .ok_or_else(|| Error::bad_request("regular payment duration must be positive"))?;
        Ok(Admission::Primary {
            emergency_contact,
            room_id,
            period_id,
            duration,
        })
    }
}

/// List filters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TenantFilter {
    /// Only primary tenants (`true`) or only assistants (`false`)
    #[serde(default, alias = "isTenant")]
    pub is_tenant: Option<bool>,
    /// Narrow to one visible rooming house
    #[serde(default, alias = "roomingHouseID", alias = "roomingHouseId")]
    pub rooming_house_id: Option<Uuid>,
}

/// Flattened tenant row for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantListItem {
    /// Tenant id
    pub id: Uuid,
    /// Full name
    pub name: String,
    /// Gender
    pub gender: String,
    /// Phone number
    pub phone_number: String,
    /// Primary tenant or assistant
    pub is_tenant: bool,
    /// Room occupied, through the parent for assistants
    pub room_id: Option<Uuid>,
    /// Name of that room
    pub room_name: Option<String>,
    /// Rooming house
    pub rooming_house_id: Uuid,
    /// Rooming house name
    pub rooming_house_name: String,
    /// Primary tenant of an assistant
    pub parent_tenant_id: Option<Uuid>,
    /// Lease start
    pub start_date: Option<NaiveDate>,
    /// Lease end
    pub end_date: Option<NaiveDate>,
    /// Deposit currently held
    pub is_deposit_paid: bool,
    /// Deposit paid back
    pub is_deposit_back: bool,
}

/// Full view of a primary tenant.
#[derive(Debug, Clone, Serialize)]
pub struct PrimaryTenantDetail {
    /// Stored tenant fields
    #[serde(flatten)]
    pub tenant: tenant::Model,
    /// Rooming house name
    pub rooming_house_name: String,
    /// Chosen billing period
    pub period: Option<period::Model>,
    /// Booked room
    pub room: Option<room::Model>,
    /// Assistants attached to this tenant
    pub assistants: Vec<tenant::Model>,
    /// Ledger rows booked for this tenant
    pub transactions: Vec<transaction::Model>,
    /// Selected add-ons priced at the tenant's period
    pub additional_prices: Vec<AdditionalLine>,
}

/// Reduced view of an assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantDetail {
    /// Tenant id
    pub id: Uuid,
    /// Full name
    pub name: String,
    /// Gender
    pub gender: String,
    /// Phone number
    pub phone_number: String,
    /// Emergency contact
    pub emergency_contact: Option<String>,
    /// Primary tenant shared with
    pub parent_tenant_id: Option<Uuid>,
    /// Rooming house
    pub rooming_house_id: Uuid,
    /// Rooming house name
    pub rooming_house_name: String,
    /// Registration time
    pub created_at: DateTimeUtc,
}

/// Tenant detail, shaped by role.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TenantDetail {
    /// Renter of record
    Primary(Box<PrimaryTenantDetail>),
    /// Co-occupant
    Assistant(AssistantDetail),
}

/// Registers a tenant.
///
/// Validation runs in this order: common fields, role fields, target rooming house,
/// then the room (primary) or parent tenant (assistant) and capacity.
#[instrument(skip(db, input), fields(is_tenant = ?input.is_tenant))]
pub async fn create_tenant(
    db: &DatabaseConnection,
    identity: &Identity,
    input: &TenantInput,
) -> Result<tenant::Model> {
    let name = required(&input.name, "name")?;
    let gender = required(&input.gender, "gender")?;
    let phone_number = required(&input.phone_number, "phone number")?;
    let admission = input.admission()?;
    let is_tenant = matches!(admission, Admission::Primary { .. });

    let house = resolve_target_rooming_house(db, identity, input.rooming_house_id).await?;

    let mut record = tenant::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        gender: Set(gender),
        phone_number: Set(phone_number),
        emergency_contact: Set(None),
        is_tenant: Set(is_tenant),
        regular_payment_duration: Set(None),
        room_id: Set(None),
        period_id: Set(None),
        rooming_house_id: Set(house.id),
        parent_tenant_id: Set(None),
        start_date: Set(None),
        end_date: Set(None),
        is_deposit_paid: Set(false),
        is_deposit_back: Set(false),
        version: Set(0),
        created_at: Set(Utc::now()),
    };

    match admission {
        Admission::Primary {
            emergency_contact,
            room_id,
            period_id,
            duration,
        } => {
            let room = find_room_in_house(db, room_id, house.id).await?;
            Period::find_by_id(period_id)
                .one(db)
                .await?
                .ok_or_else(|| Error::not_found("period not found"))?;
            ensure_additionals_belong_to(db, house.id, &input.tenant_additional_ids).await?;

            record.emergency_contact = Set(Some(emergency_contact));
            record.regular_payment_duration = Set(Some(duration));
            record.room_id = Set(Some(room.id));
            record.period_id = Set(Some(period_id));

            let txn = db.begin().await?;
            let room = find_room_in_house(&txn, room.id, house.id).await?;
            let occupancy = load_occupancy(&txn, room.id, today()).await?;
            if !occupancy.has_room_for_one_more(room.max_capacity) {
                return Err(Error::bad_request("room is full"));
            }
            let tenant = record.insert(&txn).await?;
            if !input.tenant_additional_ids.is_empty() {
                let selections = input.tenant_additional_ids.iter().map(|additional_id| {
                    tenant_additional_price::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        tenant_id: Set(tenant.id),
                        additional_price_id: Set(*additional_id),
                    }
                });
                TenantAdditionalPrice::insert_many(selections).exec(&txn).await?;
            }
            claim_room(&txn, &room).await?;
            txn.commit().await?;

            info!(tenant_id = %tenant.id, room_id = %room.id, "Registered primary tenant");
            Ok(tenant)
        }
        Admission::Assistant { parent_id } => {
            let parent = Tenant::find_by_id(parent_id)
                .filter(tenant::Column::RoomingHouseId.eq(house.id))
                .one(db)
                .await?
                .ok_or_else(|| Error::not_found("parent tenant not found"))?;
            let room_id = parent
                .room_id
                .filter(|_| parent.is_tenant)
                .ok_or_else(|| Error::bad_request("need a tenant"))?;

            record.emergency_contact = Set(input
                .emergency_contact
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(ToString::to_string));
            record.parent_tenant_id = Set(Some(parent.id));

            let txn = db.begin().await?;
            let room = find_room_in_house(&txn, room_id, house.id).await?;
            let occupancy = load_occupancy(&txn, room.id, today()).await?;
            if !occupancy.holders.iter().any(|h| h.id == parent.id) {
                return Err(Error::bad_request("need a tenant"));
            }
            if !occupancy.has_room_for_one_more(room.max_capacity) {
                return Err(Error::bad_request("room is full"));
            }
            let tenant = record.insert(&txn).await?;
            claim_room(&txn, &room).await?;
            txn.commit().await?;

            info!(tenant_id = %tenant.id, parent_id = %parent.id, "Registered assistant");
            Ok(tenant)
        }
    }
}

async fn find_room_in_house<C>(db: &C, room_id: Uuid, house_id: Uuid) -> Result<room::Model>
where
    C: ConnectionTrait,
{
    Room::find_by_id(room_id)
        .filter(room::Column::RoomingHouseId.eq(house_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("room not found"))
}

/// Lists tenants of the visible rooming houses as flat rows.
pub async fn find_all_tenants(
    db: &DatabaseConnection,
    identity: &Identity,
    filter: TenantFilter,
) -> Result<Vec<TenantListItem>> {
    let scope = resolve_scope(db, identity)
        .await?
        .narrow(filter.rooming_house_id)?;
    let house_ids = scope.rooming_house_ids().to_vec();

    let mut query = Tenant::find().filter(tenant::Column::RoomingHouseId.is_in(house_ids.clone()));
    if let Some(is_tenant) = filter.is_tenant {
        query = query.filter(tenant::Column::IsTenant.eq(is_tenant));
    }
    let tenants = query
        .order_by_asc(tenant::Column::CreatedAt)
        .all(db)
        .await?;

    let house_names: HashMap<Uuid, String> = RoomingHouse::find()
        .filter(rooming_house::Column::Id.is_in(house_ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|h| (h.id, h.name))
        .collect();
    let room_names: HashMap<Uuid, String> = Room::find()
        .filter(room::Column::RoomingHouseId.is_in(house_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.id, r.name))
        .collect();

    let parent_ids: Vec<Uuid> = tenants.iter().filter_map(|t| t.parent_tenant_id).collect();
    let parent_rooms: HashMap<Uuid, Uuid> = if parent_ids.is_empty() {
        HashMap::new()
    } else {
        Tenant::find()
            .filter(tenant::Column::Id.is_in(parent_ids))
            .all(db)
            .await?
            .into_iter()
            .filter_map(|p| p.room_id.map(|room_id| (p.id, room_id)))
            .collect()
    };

    Ok(tenants
        .into_iter()
        .map(|t| {
            let room_id = t
                .room_id
                .or_else(|| t.parent_tenant_id.and_then(|p| parent_rooms.get(&p).copied()));
            TenantListItem {
                room_name: room_id.and_then(|id| room_names.get(&id).cloned()),
                rooming_house_name: house_names
                    .get(&t.rooming_house_id)
                    .cloned()
                    .unwrap_or_default(),
                id: t.id,
                name: t.name,
                gender: t.gender,
                phone_number: t.phone_number,
                is_tenant: t.is_tenant,
                room_id,
                rooming_house_id: t.rooming_house_id,
                parent_tenant_id: t.parent_tenant_id,
                start_date: t.start_date,
                end_date: t.end_date,
                is_deposit_paid: t.is_deposit_paid,
                is_deposit_back: t.is_deposit_back,
            }
        })
        .collect())
}

/// Fetches a tenant whose rooming house is visible to the caller.
pub async fn find_visible_tenant<C>(db: &C, identity: &Identity, id: Uuid) -> Result<tenant::Model>
where
    C: ConnectionTrait,
{
    let tenant = Tenant::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("tenant not found"))?;
    resolve_scope(db, identity)
        .await?
        .ensure(tenant.rooming_house_id, "tenant")?;
    Ok(tenant)
}

/// Fetches a tenant's detail view.
pub async fn find_tenant_by_id(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
) -> Result<TenantDetail> {
    let tenant = find_visible_tenant(db, identity, id).await?;
    let rooming_house_name = RoomingHouse::find_by_id(tenant.rooming_house_id)
        .one(db)
        .await?
        .map(|h| h.name)
        .unwrap_or_default();

    if !tenant.is_tenant {
        return Ok(TenantDetail::Assistant(AssistantDetail {
            id: tenant.id,
            name: tenant.name,
            gender: tenant.gender,
            phone_number: tenant.phone_number,
            emergency_contact: tenant.emergency_contact,
            parent_tenant_id: tenant.parent_tenant_id,
            rooming_house_id: tenant.rooming_house_id,
            rooming_house_name,
            created_at: tenant.created_at,
        }));
    }

    let period = match tenant.period_id {
        Some(period_id) => Period::find_by_id(period_id).one(db).await?,
        None => None,
    };
    let room = match tenant.room_id {
        Some(room_id) => Room::find_by_id(room_id).one(db).await?,
        None => None,
    };
    let assistants = Tenant::find()
        .filter(tenant::Column::ParentTenantId.eq(tenant.id))
        .order_by_asc(tenant::Column::CreatedAt)
        .all(db)
        .await?;
    let transactions = Transaction::find()
        .filter(transaction::Column::TenantId.eq(tenant.id))
        .order_by_asc(transaction::Column::Year)
        .order_by_asc(transaction::Column::Month)
        .order_by_asc(transaction::Column::Day)
        .order_by_asc(transaction::Column::CreatedAt)
        .all(db)
        .await?;
    let additional_prices = match tenant.period_id {
        Some(period_id) => find_tenant_additional_lines(db, tenant.id, period_id).await?,
        None => Vec::new(),
    };

    Ok(TenantDetail::Primary(Box::new(PrimaryTenantDetail {
        tenant,
        rooming_house_name,
        period,
        room,
        assistants,
        transactions,
        additional_prices,
    })))
}

/// Removes a visible tenant and its add-on selections.
///
/// Ledger rows keep their weak reference to the tenant.
#[instrument(skip(db))]
pub async fn delete_tenant(db: &DatabaseConnection, identity: &Identity, id: Uuid) -> Result<()> {
    find_visible_tenant(db, identity, id).await?;

    let txn = db.begin().await?;
    TenantAdditionalPrice::delete_many()
        .filter(tenant_additional_price::Column::TenantId.eq(id))
        .exec(&txn)
        .await?;
    Tenant::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    info!(tenant_id = %id, "Deleted tenant");
    Ok(())
}
