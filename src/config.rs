//! Immutable runtime configuration.
//!
//! Services receive a [`WalletConfig`] at construction instead of reading
//! ambient global state, so tests can run with a fully local setup.

use std::time::Duration;

use crate::constants::{
    ALL_RATES_TTL_SECS, BASE_RATES_TTL_SECS, DEFAULT_EXCHANGE_RATE_API_URL, DEFAULT_PEG_CURRENCY,
    DEFAULT_SUPPORTED_CURRENCIES,
};

/// Configuration shared by the rate resolver and the transaction engine.
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// Upstream rate feed endpoint; the base currency is appended as a path segment.
    pub exchange_rate_api_url: String,
    /// Optional API key sent as an `apikey` header.
    pub exchange_rate_api_key: Option<String>,
    /// Fixed set of supported currency codes, uppercased.
    pub supported_currencies: Vec<String>,
    /// Currency required on exactly one side of a trade.
    pub peg_currency: String,
    /// TTL for a single base currency's cached rates.
    pub base_rates_ttl: Duration,
    /// TTL for the aggregate all-bases rates cache.
    pub all_rates_ttl: Duration,
}

impl WalletConfig {
    /// Builds a configuration from environment variables, falling back to defaults.
    ///
    /// Reads `EXCHANGE_RATE_API_URL` and `EXCHANGE_RATE_API_KEY`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("EXCHANGE_RATE_API_URL") {
            config.exchange_rate_api_url = url;
        }
        if let Ok(key) = std::env::var("EXCHANGE_RATE_API_KEY") {
            if !key.is_empty() {
                config.exchange_rate_api_key = Some(key);
            }
        }
        config
    }

    /// Returns true if `code` (already uppercased) is in the supported set.
    pub fn is_supported(&self, code: &str) -> bool {
        self.supported_currencies.iter().any(|c| c == code)
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            exchange_rate_api_url: DEFAULT_EXCHANGE_RATE_API_URL.to_string(),
            exchange_rate_api_key: None,
            supported_currencies: DEFAULT_SUPPORTED_CURRENCIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            peg_currency: DEFAULT_PEG_CURRENCY.to_string(),
            base_rates_ttl: Duration::from_secs(BASE_RATES_TTL_SECS),
            all_rates_ttl: Duration::from_secs(ALL_RATES_TTL_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_supported_set() {
        let config = WalletConfig::default();
        assert!(config.is_supported("NGN"));
        assert!(config.is_supported("USD"));
        assert!(!config.is_supported("ABC"));
        assert_eq!(config.peg_currency, "NGN");
    }

    #[test]
    fn test_supported_check_is_case_sensitive() {
        // Callers are expected to uppercase before checking.
        let config = WalletConfig::default();
        assert!(!config.is_supported("usd"));
    }
}
