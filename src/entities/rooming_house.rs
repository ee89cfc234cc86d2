//! Rooming house entity - a boarding house managed as one billing and occupancy unit.
//!
//! Every other record (rooms, packages, tenants, transactions) carries the id of the
//! rooming house it belongs to, which is what access scoping filters on.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Rooming house database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooming_houses")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Display name of the property
    pub name: String,
    /// Street address
    pub address: String,
    /// Free-form description shown to staff
    pub description: Option<String>,
    /// Number of floors; bounds the `floor` of every room
    pub floor_total: i32,
    /// Owner account that created the property
    pub owner_id: Uuid,
    /// When the property was created
    pub created_at: DateTimeUtc,
    /// When the property was last modified
    pub updated_at: DateTimeUtc,
}

/// Ownership links are enforced in the core layer
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
