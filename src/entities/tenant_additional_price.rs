//! Tenant additional price entity - an add-on selected by a tenant.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tenant add-on selection database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenant_additional_prices")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Tenant who selected the add-on
    pub tenant_id: Uuid,
    /// Selected add-on
    pub additional_price_id: Uuid,
}

/// Defines relationships between `TenantAdditionalPrice` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Selections are removed together with the tenant
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id",
        on_delete = "Cascade"
    )]
    Tenant,
    /// Selections are removed together with the add-on
    #[sea_orm(
        belongs_to = "super::additional_price::Entity",
        from = "Column::AdditionalPriceId",
        to = "super::additional_price::Column::Id",
        on_delete = "Cascade"
    )]
    AdditionalPrice,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::additional_price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdditionalPrice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
