//! Monthly income/expense dashboard.
//!
//! Ledger rows of one rooming house and one year are bucketed into twelve months.
//! Income and expense are accumulated separately, using the `is_expense` flag of each
//! row's category.

use crate::{
    core::scope::{Identity, resolve_scope},
    entities::{RoomingHouse, Transaction, TransactionCategory, transaction, transaction_category},
    errors::{Error, Result},
};
use chrono::{Datelike, Utc};
use sea_orm::{JoinType, QuerySelect, prelude::*};
use serde::{Deserialize, Serialize};

/// Month names, January first.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Dashboard behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardOptions {
    /// Emit a zero-filled series for a rooming house without transactions in the year
    pub zero_fill: bool,
}

/// Dashboard request.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DashboardQuery {
    /// Rooming house to report on; defaults to the caller's first visible one
    #[serde(default, alias = "roomingHouseID", alias = "roomingHouseId")]
    pub rooming_house_id: Option<Uuid>,
    /// Calendar year; defaults to the current one
    #[serde(default)]
    pub year: Option<i32>,
}

/// Totals of one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyEntry {
    /// Month name
    pub month: String,
    /// Month number, 1-12
    pub index: u32,
    /// Year
    pub year: i32,
    /// Sum of non-expense amounts
    pub income: f64,
    /// Sum of expense amounts
    pub expense: f64,
}

/// Twelve-month series of one rooming house.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    /// Rooming house id
    pub rooming_house_id: Uuid,
    /// Rooming house name
    pub rooming_house_name: String,
    /// Reported year
    pub year: i32,
    /// One entry per month, January first
    pub months: Vec<MonthlyEntry>,
}

/// A ledger amount reduced to what the dashboard needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardRow {
    /// Rooming house the row is booked against
    pub rooming_house_id: Uuid,
    /// Month, 1-12
    pub month: i32,
    /// Amount
    pub amount: f64,
    /// Category is an expense
    pub is_expense: bool,
}

fn empty_months(year: i32) -> Vec<MonthlyEntry> {
    (1..=12u32)
        .zip(MONTHS)
        .map(|(index, month)| MonthlyEntry {
            month: month.to_string(),
            index,
            year,
            income: 0.0,
            expense: 0.0,
        })
        .collect()
}

/// Buckets `rows` into per-property monthly series.
///
/// `properties` fixes the output order. A property without rows only appears when
/// `zero_fill` is set. Rows with a month outside 1-12 are ignored.
#[must_use]
pub fn build_dashboard(
    properties: &[(Uuid, String)],
    rows: &[DashboardRow],
    year: i32,
    zero_fill: bool,
) -> Vec<DashboardData> {
    properties
        .iter()
        .filter_map(|(id, name)| {
            let mut months = empty_months(year);
            let mut seen = false;
            for row in rows.iter().filter(|r| r.rooming_house_id == *id) {
                let Some(entry) = usize::try_from(row.month - 1)
                    .ok()
                    .and_then(|slot| months.get_mut(slot))
                else {
                    continue;
                };
                seen = true;
                if row.is_expense {
                    entry.expense += row.amount;
                } else {
                    entry.income += row.amount;
                }
            }
            (seen || zero_fill).then(|| DashboardData {
                rooming_house_id: *id,
                rooming_house_name: name.clone(),
                year,
                months,
            })
        })
        .collect()
}

/// Builds the dashboard for the requested or first visible rooming house.
pub async fn dashboard<C>(
    db: &C,
    identity: &Identity,
    query: DashboardQuery,
    options: DashboardOptions,
) -> Result<Vec<DashboardData>>
where
    C: ConnectionTrait,
{
    let scope = resolve_scope(db, identity).await?;
    let target = match query.rooming_house_id {
        Some(id) => {
            scope.ensure(id, "rooming house")?;
            id
        }
        None => match scope.first() {
            Some(id) => id,
            None => return Ok(Vec::new()),
        },
    };
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    let house = RoomingHouse::find_by_id(target)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("rooming house not found"))?;

    let rows: Vec<(i32, f64, bool)> = Transaction::find()
        .select_only()
        .column(transaction::Column::Month)
        .column(transaction::Column::Amount)
        .column(transaction_category::Column::IsExpense)
        .join(JoinType::InnerJoin, transaction_category_relation())
        .filter(transaction::Column::RoomingHouseId.eq(target))
        .filter(transaction::Column::Year.eq(year))
        .into_tuple()
        .all(db)
        .await?;
    let rows: Vec<DashboardRow> = rows
        .into_iter()
        .map(|(month, amount, is_expense)| DashboardRow {
            rooming_house_id: target,
            month,
            amount,
            is_expense,
        })
        .collect();

    Ok(build_dashboard(
        &[(house.id, house.name)],
        &rows,
        year,
        options.zero_fill,
    ))
}

fn transaction_category_relation() -> sea_orm::RelationDef {
    Transaction::belongs_to(TransactionCategory)
        .from(transaction::Column::TransactionCategoryId)
        .to(transaction_category::Column::Id)
        .into()
}
