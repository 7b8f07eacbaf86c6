use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use log::error;

use crate::db::{get_connection, DbPool};
use crate::fx::fx_errors::FxError;
use crate::fx::fx_model::{ExchangeRateDB, ExchangeRateObservation, RateMap};
use crate::fx::fx_traits::FxRepositoryTrait;
use crate::schema::exchange_rates;

/// SQLite-backed historical rate store.
pub struct FxRepository {
    pool: Arc<DbPool>,
}

impl FxRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl FxRepositoryTrait for FxRepository {
    fn save_observations(
        &self,
        base_currency: &str,
        rates: &RateMap,
    ) -> std::result::Result<(), FxError> {
        let mut conn = get_connection(&self.pool).map_err(|e| FxError::SaveFailed(e.to_string()))?;

        let now = Utc::now().to_rfc3339();
        let rows: Vec<ExchangeRateDB> = rates
            .iter()
            .map(|(target, rate)| ExchangeRateDB {
                id: uuid::Uuid::new_v4().to_string(),
                base_currency: base_currency.to_string(),
                target_currency: target.clone(),
                rate: rate.to_string(),
                timestamp: now.clone(),
            })
            .collect();

        diesel::insert_into(exchange_rates::table)
            .values(&rows)
            .execute(&mut conn)
            .map_err(|e| {
                error!("Failed to store rates for {}: {}", base_currency, e);
                FxError::SaveFailed(e.to_string())
            })?;

        Ok(())
    }

    fn latest_rates_for_base(
        &self,
        base_currency: &str,
        targets: &[String],
    ) -> std::result::Result<RateMap, FxError> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| FxError::DatabaseError(e.to_string()))?;

        let mut result = RateMap::new();
        for target in targets {
            let row = exchange_rates::table
                .filter(exchange_rates::base_currency.eq(base_currency))
                .filter(exchange_rates::target_currency.eq(target))
                .order_by(exchange_rates::timestamp.desc())
                .first::<ExchangeRateDB>(&mut conn)
                .optional()?;

            if let Some(row) = row {
                let obs = ExchangeRateObservation::from(row);
                result.insert(obs.target_currency, obs.rate);
            }
        }

        Ok(result)
    }

    fn observations_for_base(
        &self,
        base_currency: &str,
    ) -> std::result::Result<Vec<ExchangeRateObservation>, FxError> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| FxError::DatabaseError(e.to_string()))?;

        let rows = exchange_rates::table
            .filter(exchange_rates::base_currency.eq(base_currency))
            .order_by(exchange_rates::timestamp.desc())
            .load::<ExchangeRateDB>(&mut conn)?;

        Ok(rows.into_iter().map(ExchangeRateObservation::from).collect())
    }
}
