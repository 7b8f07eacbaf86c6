use thiserror::Error;

/// Errors raised while resolving or persisting exchange rates.
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Currency '{0}' is not supported")]
    UnsupportedCurrency(String),

    #[error("Exchange rate not available for {from}/{to}")]
    RateNotAvailable { from: String, to: String },

    #[error("Failed to get exchange rates for {0}")]
    RatesUnavailable(String),

    #[error("Failed to fetch rates from API: {0}")]
    FetchFailed(String),

    #[error("Failed to store rates: {0}")]
    SaveFailed(String),

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<diesel::result::Error> for FxError {
    fn from(err: diesel::result::Error) -> Self {
        FxError::DatabaseError(err.to_string())
    }
}

impl From<reqwest::Error> for FxError {
    fn from(err: reqwest::Error) -> Self {
        FxError::FetchFailed(err.to_string())
    }
}
