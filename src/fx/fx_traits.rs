use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::fx::fx_errors::FxError;
use crate::fx::fx_model::{AllRates, Conversion, ExchangeRateObservation, RateMap};

/// Boundary to the external rate feed.
///
/// Implementations must surface transport and parse failures as [`FxError`]
/// values; no raw network errors cross this boundary.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the rate mapping for one base currency, already narrowed to the
    /// supported currency set.
    async fn fetch_rates(&self, base_currency: &str) -> std::result::Result<RateMap, FxError>;
}

/// Trait defining the contract for the historical rate store.
///
/// The store is an append-only log of rate observations used exclusively as
/// the fallback tier; rows are never updated or deleted.
pub trait FxRepositoryTrait: Send + Sync {
    /// Appends one observation per target currency in `rates`.
    ///
    /// Callers treat this as best-effort: the resolver logs a failure and
    /// continues, so the result is returned rather than swallowed here.
    fn save_observations(
        &self,
        base_currency: &str,
        rates: &RateMap,
    ) -> std::result::Result<(), FxError>;

    /// The most recent observation per target currency for `base_currency`,
    /// restricted to `targets`. Empty mapping when nothing was ever stored.
    fn latest_rates_for_base(
        &self,
        base_currency: &str,
        targets: &[String],
    ) -> std::result::Result<RateMap, FxError>;

    /// All stored observations for a base, newest first. Used by reporting and
    /// tests; the resolver itself only needs `latest_rates_for_base`.
    fn observations_for_base(
        &self,
        base_currency: &str,
    ) -> std::result::Result<Vec<ExchangeRateObservation>, FxError>;
}

/// Trait defining the contract for rate resolution.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Resolves the rate mapping for one base currency through the
    /// cache -> live feed -> stored fallback pipeline.
    async fn rates_for_base(&self, base_currency: &str) -> Result<RateMap>;

    /// Resolves the aggregate mapping for every supported base.
    async fn all_rates(&self) -> Result<AllRates>;

    /// The rate from one supported currency to another; `1` for identical
    /// currencies without any lookup.
    async fn exchange_rate(&self, from_currency: &str, to_currency: &str) -> Result<Decimal>;

    /// Converts an amount, returning both the converted amount and the rate
    /// captured for it.
    async fn convert(
        &self,
        from_currency: &str,
        to_currency: &str,
        amount: Decimal,
    ) -> Result<Conversion>;

    /// The fixed supported currency set.
    fn supported_currencies(&self) -> Vec<String>;
}
