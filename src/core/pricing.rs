//! Per-period price matrices shared by pricing packages and add-ons.

use crate::{
    core::catalog::find_all_periods,
    entities::PeriodUnit,
    errors::{Error, Result},
};
use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One price for each billing period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodPrices {
    /// Price of one day
    pub daily: f64,
    /// Price of one week
    pub weekly: f64,
    /// Price of one month
    pub monthly: f64,
    /// Price of one year
    pub annual: f64,
}

impl PeriodPrices {
    /// Prices keyed by the period unit they apply to.
    #[must_use]
    pub const fn entries(&self) -> [(PeriodUnit, f64); 4] {
        [
            (PeriodUnit::Day, self.daily),
            (PeriodUnit::Week, self.weekly),
            (PeriodUnit::Month, self.monthly),
            (PeriodUnit::Year, self.annual),
        ]
    }

    /// Every price must be a finite, strictly positive amount.
    pub fn validate(&self) -> Result<()> {
        for (unit, price) in self.entries() {
            if !price.is_finite() || price <= 0.0 {
                return Err(Error::bad_request(format!(
                    "{} price must be greater than zero",
                    unit.period_name().to_lowercase()
                )));
            }
        }
        Ok(())
    }
}

/// Create/update payload for a package or an add-on.
#[derive(Debug, Clone, Deserialize)]
pub struct PricedItemInput {
    /// Display name
    pub name: String,
    /// Target rooming house; owners must set it, admins always use their own
    #[serde(default)]
    pub rooming_house_id: Option<Uuid>,
    /// Per-period prices
    #[serde(flatten)]
    pub prices: PeriodPrices,
}

impl PricedItemInput {
    /// Validates the name and the price matrix, returning the trimmed name.
    pub fn validate(&self) -> Result<&str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::bad_request("name is required"));
        }
        self.prices.validate()?;
        Ok(name)
    }
}

/// A package or add-on together with its prices keyed by period name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedItem {
    /// Package or add-on id
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Owning rooming house
    pub rooming_house_id: Uuid,
    /// Creation time
    pub created_at: DateTimeUtc,
    /// Price per period name ("Daily", "Monthly", ...)
    pub prices: BTreeMap<String, f64>,
}

/// Maps each period unit to the id of its catalog row.
pub async fn period_ids_by_unit<C>(db: &C) -> Result<HashMap<PeriodUnit, Uuid>>
where
    C: ConnectionTrait,
{
    let periods = find_all_periods(db).await?;
    let ids: HashMap<_, _> = periods.into_iter().map(|p| (p.unit, p.id)).collect();
    if ids.len() < 4 {
        return Err(Error::internal("period catalog is not seeded"));
    }
    Ok(ids)
}

/// Maps each period id to its display name.
pub async fn period_names_by_id<C>(db: &C) -> Result<HashMap<Uuid, String>>
where
    C: ConnectionTrait,
{
    Ok(find_all_periods(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect())
}

/// Resolves `(period id, price)` rows into a map keyed by period name.
pub(crate) fn price_map(
    names: &HashMap<Uuid, String>,
    rows: impl IntoIterator<Item = (Uuid, f64)>,
) -> BTreeMap<String, f64> {
    rows.into_iter()
        .filter_map(|(period_id, price)| names.get(&period_id).map(|name| (name.clone(), price)))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn prices() -> PeriodPrices {
        PeriodPrices {
            daily: 50_000.0,
            weekly: 300_000.0,
            monthly: 1_000_000.0,
            annual: 11_000_000.0,
        }
    }

    #[test]
    fn test_prices_must_be_positive() {
        assert!(prices().validate().is_ok());

        let zero_weekly = PeriodPrices {
            weekly: 0.0,
            ..prices()
        };
        let err = zero_weekly.validate().unwrap_err();
        assert_eq!(err.to_string(), "weekly price must be greater than zero");

        let negative_annual = PeriodPrices {
            annual: -1.0,
            ..prices()
        };
        assert!(negative_annual.validate().is_err());

        let nan_daily = PeriodPrices {
            daily: f64::NAN,
            ..prices()
        };
        assert!(nan_daily.validate().is_err());
    }

    #[test]
    fn test_input_deserializes_flat_prices() {
        let input: PricedItemInput = serde_json::from_str(
            r#"{"name":" Standard ","daily":1,"weekly":2,"monthly":3,"annual":4}"#,
        )
        .unwrap();
        assert_eq!(input.validate().unwrap(), "Standard");
        assert_eq!(input.rooming_house_id, None);
        assert_eq!(input.prices.monthly, 3.0);
    }

    #[test]
    fn test_price_map_uses_period_names() {
        let daily = Uuid::new_v4();
        let monthly = Uuid::new_v4();
        let names = HashMap::from([
            (daily, "Daily".to_string()),
            (monthly, "Monthly".to_string()),
        ]);

        let map = price_map(&names, [(daily, 10.0), (monthly, 250.0), (Uuid::new_v4(), 1.0)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map["Daily"], 10.0);
        assert_eq!(map["Monthly"], 250.0);
    }
}
