//! Period entity - the fixed catalog of billing cadences.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Calendar unit a period advances by when computing lease end dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    /// One calendar day
    #[sea_orm(string_value = "day")]
    Day,
    /// Seven calendar days
    #[sea_orm(string_value = "week")]
    Week,
    /// One calendar month
    #[sea_orm(string_value = "month")]
    Month,
    /// One calendar year
    #[sea_orm(string_value = "year")]
    Year,
}

impl PeriodUnit {
    /// Catalog name of the period billed in this unit.
    #[must_use]
    pub const fn period_name(self) -> &'static str {
        match self {
            Self::Day => "Daily",
            Self::Week => "Weekly",
            Self::Month => "Monthly",
            Self::Year => "Annually",
        }
    }

    /// Sort position within the catalog (daily first).
    #[must_use]
    pub const fn position(self) -> i32 {
        match self {
            Self::Day => 1,
            Self::Week => 2,
            Self::Month => 3,
            Self::Year => 4,
        }
    }
}

/// Period database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "periods")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Catalog name ("Daily", "Weekly", "Monthly", "Annually")
    #[sea_orm(unique)]
    pub name: String,
    /// Date arithmetic unit
    pub unit: PeriodUnit,
    /// Display order
    pub position: i32,
}

/// Periods are referenced by packages, add-ons and tenants
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
