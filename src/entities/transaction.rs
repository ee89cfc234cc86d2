//! Transaction entity - an immutable ledger row.
//!
//! Each transaction records a dated amount in a category against a rooming house, and
//! optionally a room and a tenant. Whether it is an expense comes from its category.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Day of month the payment happened
    pub day: i32,
    /// Month (1-12) the payment happened
    pub month: i32,
    /// Year the payment happened
    pub year: i32,
    /// Amount, always positive; direction comes from the category
    pub amount: f64,
    /// Optional note
    pub description: Option<String>,
    /// Ledger category
    pub transaction_category_id: Uuid,
    /// Room the transaction concerns, if any
    pub room_id: Option<Uuid>,
    /// Tenant the transaction concerns, if any
    pub tenant_id: Option<Uuid>,
    /// Rooming house the transaction is booked against
    pub rooming_house_id: Uuid,
    /// When the row was recorded
    pub created_at: DateTimeUtc,
}

/// Transactions keep weak references to tenants and rooms so they survive deletions
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
