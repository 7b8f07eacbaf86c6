use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::config::WalletConfig;
use crate::errors::Result;
use crate::fx::fx_cache::RateCache;
use crate::fx::fx_errors::FxError;
use crate::fx::fx_model::{AllRates, Conversion, RateMap};
use crate::fx::fx_traits::{FxRepositoryTrait, FxServiceTrait, RateProvider};

/// Three-tier rate resolver: cache, then live feed, then stored fallback.
///
/// The fallback tier deliberately returns stale data during upstream outages,
/// trading freshness for availability. A caller only sees
/// [`FxError::RatesUnavailable`] when the feed is down *and* no observation was
/// ever stored for the base.
pub struct FxService {
    repository: Arc<dyn FxRepositoryTrait>,
    provider: Arc<dyn RateProvider>,
    cache: RateCache,
    config: WalletConfig,
}

impl FxService {
    pub fn new(
        repository: Arc<dyn FxRepositoryTrait>,
        provider: Arc<dyn RateProvider>,
        config: WalletConfig,
    ) -> Self {
        let cache = RateCache::new(config.base_rates_ttl, config.all_rates_ttl);
        Self {
            repository,
            provider,
            cache,
            config,
        }
    }

    async fn fetch_and_record(&self, base: &str) -> Result<RateMap> {
        match self.provider.fetch_rates(base).await {
            Ok(rates) => {
                // Best-effort historical write; a failure is logged, never fatal.
                if let Err(e) = self.repository.save_observations(base, &rates) {
                    log::error!("Failed to store rates for {}: {}", base, e);
                }

                self.cache.set_rates_for_base(base, rates.clone()).await;
                Ok(rates)
            }
            Err(fetch_err) => {
                log::error!("Error fetching rates for {}: {}", base, fetch_err);
                self.fallback_from_store(base)
            }
        }
    }

    fn fallback_from_store(&self, base: &str) -> Result<RateMap> {
        let stored = self
            .repository
            .latest_rates_for_base(base, &self.config.supported_currencies)
            .map_err(|e| {
                log::error!("Failed to get fallback rates for {}: {}", base, e);
                FxError::RatesUnavailable(base.to_string())
            })?;

        if stored.is_empty() {
            return Err(FxError::RatesUnavailable(base.to_string()).into());
        }

        log::warn!("Serving stale fallback rates for {}", base);
        Ok(stored)
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    async fn rates_for_base(&self, base_currency: &str) -> Result<RateMap> {
        let base = base_currency.to_uppercase();

        if let Some(cached) = self.cache.rates_for_base(&base).await {
            return Ok(cached);
        }

        self.fetch_and_record(&base).await
    }

    async fn all_rates(&self) -> Result<AllRates> {
        if let Some(cached) = self.cache.all_rates().await {
            return Ok(cached);
        }

        // Any single base failing fails the whole aggregate; nothing partial
        // is cached.
        let mut result = AllRates::with_capacity(self.config.supported_currencies.len());
        for base in &self.config.supported_currencies {
            let rates = self.rates_for_base(base).await?;
            result.insert(base.clone(), rates);
        }

        self.cache.set_all_rates(result.clone()).await;
        Ok(result)
    }

    async fn exchange_rate(&self, from_currency: &str, to_currency: &str) -> Result<Decimal> {
        let from = from_currency.to_uppercase();
        let to = to_currency.to_uppercase();

        if !self.config.is_supported(&from) {
            return Err(FxError::UnsupportedCurrency(from).into());
        }
        if !self.config.is_supported(&to) {
            return Err(FxError::UnsupportedCurrency(to).into());
        }

        if from == to {
            return Ok(Decimal::ONE);
        }

        let rates = self.rates_for_base(&from).await?;
        rates
            .get(&to)
            .copied()
            .ok_or_else(|| FxError::RateNotAvailable { from, to }.into())
    }

    async fn convert(
        &self,
        from_currency: &str,
        to_currency: &str,
        amount: Decimal,
    ) -> Result<Conversion> {
        let rate = self.exchange_rate(from_currency, to_currency).await?;

        Ok(Conversion {
            converted_amount: amount * rate,
            rate,
        })
    }

    fn supported_currencies(&self) -> Vec<String> {
        self.config.supported_currencies.clone()
    }
}
