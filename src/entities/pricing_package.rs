//! Pricing package entity - a named rate plan attached to rooms.
//!
//! The actual prices live in `period_package` rows, one per period.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Pricing package database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pricing_packages")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Plan name (e.g. "Standard", "Premium")
    pub name: String,
    /// Owning rooming house
    pub rooming_house_id: Uuid,
    /// When the package was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `PricingPackage` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One package has one price per period
    #[sea_orm(has_many = "super::period_package::Entity")]
    PeriodPackages,
}

impl Related<super::period_package::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PeriodPackages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
