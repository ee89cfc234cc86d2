//! Additional price entity - an optional add-on service (laundry, parking, ...).
//!
//! Priced per period exactly like a pricing package, through `additional_period` rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Additional price database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "additional_prices")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Add-on name
    pub name: String,
    /// Owning rooming house
    pub rooming_house_id: Uuid,
    /// When the add-on was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `AdditionalPrice` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One add-on has one price per period
    #[sea_orm(has_many = "super::additional_period::Entity")]
    AdditionalPeriods,
}

impl Related<super::additional_period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdditionalPeriods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
