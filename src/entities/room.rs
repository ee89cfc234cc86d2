//! Room entity - a rentable unit inside a rooming house.
//!
//! Vacancy is not stored here. It is derived from the tenants whose lease covers the
//! current date (see `core::room`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Room database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Room label (e.g. "A-101")
    pub name: String,
    /// Floor number, between 1 and the rooming house floor total
    pub floor: i32,
    /// Maximum number of occupants (primary tenants plus assistants)
    pub max_capacity: i32,
    /// Reference into the external size catalog
    pub size_id: Option<Uuid>,
    /// Pricing package used to bill the primary tenant
    pub pricing_package_id: Uuid,
    /// Owning rooming house
    pub rooming_house_id: Uuid,
    /// Optimistic lock, bumped whenever an occupant is admitted
    pub version: i32,
    /// When the room was created
    pub created_at: DateTimeUtc,
}

/// Rooms reference their package and property by id only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
