//! Transaction category entity - the catalog of ledger categories.
//!
//! The `kind` column decides which side effects posting a transaction has. Only the
//! built-in Rent, Deposit and Deposit Payback categories carry a special kind; every
//! other category is a plain ledger entry.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Side-effect class of a transaction category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Computes the rent amount and sets the tenant's lease dates
    #[sea_orm(string_value = "rent")]
    Rent,
    /// Records a deposit and marks it as held
    #[sea_orm(string_value = "deposit")]
    Deposit,
    /// Returns a held deposit
    #[sea_orm(string_value = "deposit_payback")]
    DepositPayback,
    /// Plain ledger entry against a room or a rooming house
    #[sea_orm(string_value = "generic")]
    Generic,
}

/// Transaction category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_categories")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Category name (e.g. "Rent", "Utilities")
    #[sea_orm(unique)]
    pub name: String,
    /// Whether amounts in this category count as expense
    pub is_expense: bool,
    /// Side-effect class
    pub kind: CategoryKind,
}

/// Categories are referenced by transactions
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
