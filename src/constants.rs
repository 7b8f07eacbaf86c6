//! Shared constants for the wallet ledger.

/// Cache key for the aggregate base -> (target -> rate) mapping.
pub const ALL_RATES_CACHE_KEY: &str = "all_exchange_rates";

/// Cache key prefix for a single base currency's rates.
pub const BASE_RATES_CACHE_PREFIX: &str = "exchange_rates_";

/// TTL for a single base currency's cached rates, in seconds.
pub const BASE_RATES_TTL_SECS: u64 = 60;

/// TTL for the aggregate rates cache, in seconds.
pub const ALL_RATES_TTL_SECS: u64 = 3600;

/// Default upstream rate feed endpoint.
pub const DEFAULT_EXCHANGE_RATE_API_URL: &str = "https://api.exchangerate-api.com/v4/latest";

/// Currencies a user holds one wallet for, created at account verification.
pub const DEFAULT_SUPPORTED_CURRENCIES: [&str; 4] = ["NGN", "USD", "EUR", "GBP"];

/// The local currency required on exactly one side of a trade.
pub const DEFAULT_PEG_CURRENCY: &str = "NGN";
