//! Admin entity - a staff account scoped to exactly one rooming house.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Full name
    pub full_name: String,
    /// Display username
    pub username: String,
    /// Login email
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// The only rooming house this admin may see
    pub rooming_house_id: Uuid,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// Admins reference their rooming house by id only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
