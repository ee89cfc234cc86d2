//! Period package entity - the price of a pricing package for one period.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Period package database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "period_packages")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Billing period this price applies to
    pub period_id: Uuid,
    /// Package this price belongs to
    pub pricing_package_id: Uuid,
    /// Price for one unit of the period
    pub price: f64,
}

/// Defines relationships between `PeriodPackage` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each price belongs to one package and disappears with it
    #[sea_orm(
        belongs_to = "super::pricing_package::Entity",
        from = "Column::PricingPackageId",
        to = "super::pricing_package::Column::Id",
        on_delete = "Cascade"
    )]
    PricingPackage,
    /// Each price is quoted for one period
    #[sea_orm(
        belongs_to = "super::period::Entity",
        from = "Column::PeriodId",
        to = "super::period::Column::Id",
        on_delete = "Cascade"
    )]
    Period,
}

impl Related<super::pricing_package::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PricingPackage.def()
    }
}

impl Related<super::period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Period.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
