use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mapping of target currency code to rate, for one base currency.
pub type RateMap = HashMap<String, Decimal>;

/// Mapping of base currency to its full rate map.
pub type AllRates = HashMap<String, RateMap>;

/// One observed (base, target, rate) triple at a point in time.
///
/// Observations are append-only and serve the fallback path when the live
/// provider is unavailable; they are never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateObservation {
    pub id: String,
    pub base_currency: String,
    pub target_currency: String,
    pub rate: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Database model for exchange rate observations.
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::exchange_rates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExchangeRateDB {
    pub id: String,
    pub base_currency: String,
    pub target_currency: String,
    pub rate: String,
    pub timestamp: String,
}

impl From<ExchangeRateDB> for ExchangeRateObservation {
    fn from(db: ExchangeRateDB) -> Self {
        Self {
            id: db.id,
            base_currency: db.base_currency,
            target_currency: db.target_currency,
            rate: Decimal::from_str(&db.rate).unwrap_or(Decimal::ZERO),
            timestamp: DateTime::parse_from_rfc3339(&db.timestamp)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_default(),
        }
    }
}

impl From<&ExchangeRateObservation> for ExchangeRateDB {
    fn from(obs: &ExchangeRateObservation) -> Self {
        Self {
            id: obs.id.clone(),
            base_currency: obs.base_currency.clone(),
            target_currency: obs.target_currency.clone(),
            rate: obs.rate.to_string(),
            timestamp: obs.timestamp.to_rfc3339(),
        }
    }
}

/// Result of converting an amount between two currencies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub converted_amount: Decimal,
    pub rate: Decimal,
}
