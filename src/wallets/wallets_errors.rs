use thiserror::Error;

/// Errors raised by wallet queries and ledger mutations.
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Source and target currency must differ")]
    SameCurrency,

    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("Insufficient balance in {currency} wallet: have {available}, need {required}")]
    InsufficientBalance {
        currency: String,
        available: rust_decimal::Decimal,
        required: rust_decimal::Decimal,
    },

    #[error("Trades must have the peg currency on exactly one side")]
    TradeRequiresPegCurrency,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<diesel::result::Error> for WalletError {
    fn from(err: diesel::result::Error) -> Self {
        WalletError::DatabaseError(err.to_string())
    }
}
