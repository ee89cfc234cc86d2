//! Tenant entity - a primary tenant (renter of record) or an assistant co-occupant.
//!
//! Primary tenants carry the room, period and payment duration used for billing.
//! Assistants only point at their primary tenant through `parent_tenant_id` and never
//! hold billing state of their own. Lease dates stay empty until the first rent
//! payment is posted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tenant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Full name
    pub name: String,
    /// Gender as entered by staff
    pub gender: String,
    /// Contact phone number
    pub phone_number: String,
    /// Emergency contact (mandatory for primary tenants)
    pub emergency_contact: Option<String>,
    /// `true` for the renter of record, `false` for an assistant occupant
    pub is_tenant: bool,
    /// Number of periods prepaid by one rent payment (primary tenants only)
    pub regular_payment_duration: Option<i32>,
    /// Booked room (primary tenants only)
    pub room_id: Option<Uuid>,
    /// Chosen billing period (primary tenants only)
    pub period_id: Option<Uuid>,
    /// Rooming house the tenant belongs to
    pub rooming_house_id: Uuid,
    /// Primary tenant this assistant shares a room with
    pub parent_tenant_id: Option<Uuid>,
    /// Lease start, set by the first rent payment
    pub start_date: Option<Date>,
    /// Lease end, set by the first rent payment
    pub end_date: Option<Date>,
    /// Whether a deposit is currently held
    pub is_deposit_paid: bool,
    /// Whether a held deposit has been paid back
    pub is_deposit_back: bool,
    /// Optimistic lock, bumped on every billing state change
    pub version: i32,
    /// When the tenant was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Tenant and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One tenant selects many add-ons
    #[sea_orm(has_many = "super::tenant_additional_price::Entity")]
    AdditionalPrices,
}

impl Related<super::tenant_additional_price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdditionalPrices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
