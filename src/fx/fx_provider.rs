//! Upstream rate feed client.

use std::collections::HashMap;

use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::WalletConfig;
use crate::fx::fx_errors::FxError;
use crate::fx::fx_model::RateMap;
use crate::fx::fx_traits::RateProvider;

/// Upstream response shape: `{"base": "USD", "rates": {"EUR": 0.92, ...}}`.
#[derive(Deserialize, Debug)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

/// HTTP rate provider for exchangerate-api style feeds.
///
/// Fetches `{api_url}/{BASE}` and narrows the response to the supported
/// currency set. Transport and parse failures surface as
/// [`FxError::FetchFailed`]; nothing here panics on bad upstream data.
pub struct ExchangeRateApiProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    supported_currencies: Vec<String>,
}

impl ExchangeRateApiProvider {
    pub fn new(config: &WalletConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.exchange_rate_api_url.clone(),
            api_key: config.exchange_rate_api_key.clone(),
            supported_currencies: config.supported_currencies.clone(),
        }
    }

    fn filter_supported(&self, raw: HashMap<String, f64>) -> Result<RateMap, FxError> {
        let mut filtered = RateMap::with_capacity(self.supported_currencies.len());
        for currency in &self.supported_currencies {
            if let Some(rate) = raw.get(currency) {
                let rate = Decimal::from_f64(*rate)
                    .ok_or_else(|| FxError::InvalidRate(format!("{}={}", currency, rate)))?;
                filtered.insert(currency.clone(), rate);
            }
        }
        Ok(filtered)
    }
}

#[async_trait::async_trait]
impl RateProvider for ExchangeRateApiProvider {
    async fn fetch_rates(&self, base_currency: &str) -> Result<RateMap, FxError> {
        let url = format!("{}/{}", self.api_url, base_currency);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }

        let response = request.send().await.map_err(|e| {
            log::error!("Error fetching rates from API: {}", e);
            FxError::FetchFailed(e.to_string())
        })?;

        let response = response
            .error_for_status()
            .map_err(|e| FxError::FetchFailed(e.to_string()))?;

        let body: RatesResponse = response
            .json()
            .await
            .map_err(|e| FxError::FetchFailed(e.to_string()))?;

        self.filter_supported(body.rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn provider() -> ExchangeRateApiProvider {
        ExchangeRateApiProvider::new(&WalletConfig::default())
    }

    #[test]
    fn test_filter_drops_unsupported_codes() {
        let raw = HashMap::from([
            ("EUR".to_string(), 0.92),
            ("GBP".to_string(), 0.79),
            ("JPY".to_string(), 147.2),
        ]);

        let filtered = provider().filter_supported(raw).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.get("EUR"), Some(&dec!(0.92)));
        assert!(!filtered.contains_key("JPY"));
    }

    #[test]
    fn test_filter_rejects_non_finite_rates() {
        let raw = HashMap::from([("EUR".to_string(), f64::NAN)]);
        assert!(matches!(
            provider().filter_supported(raw),
            Err(FxError::InvalidRate(_))
        ));
    }
}
