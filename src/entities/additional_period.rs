//! Additional period entity - the price of an add-on for one period.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Additional period database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "additional_periods")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Add-on this price belongs to
    pub additional_price_id: Uuid,
    /// Billing period this price applies to
    pub period_id: Uuid,
    /// Price for one unit of the period
    pub price: f64,
}

/// Defines relationships between `AdditionalPeriod` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each price belongs to one add-on and disappears with it
    #[sea_orm(
        belongs_to = "super::additional_price::Entity",
        from = "Column::AdditionalPriceId",
        to = "super::additional_price::Column::Id",
        on_delete = "Cascade"
    )]
    AdditionalPrice,
    /// Each price is quoted for one period
    #[sea_orm(
        belongs_to = "super::period::Entity",
        from = "Column::PeriodId",
        to = "super::period::Column::Id",
        on_delete = "Cascade"
    )]
    Period,
}

impl Related<super::additional_price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdditionalPrice.def()
    }
}

impl Related<super::period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Period.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
