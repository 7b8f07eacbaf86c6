//! Domain event types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Domain events emitted after a committed ledger mutation.
///
/// Events are facts about state that has already been persisted. Delivery is
/// fire-and-forget: consumers must not assume ordering or exactly-once
/// delivery, and a delivery failure never affects the committed mutation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
#[serde(rename_all_fields = "camelCase")]
pub enum DomainEvent {
    /// A wallet was credited with new funds.
    WalletFunded {
        user_id: String,
        wallet_id: String,
        currency: String,
        amount: Decimal,
        transaction_id: String,
    },

    /// Value was moved between two of a user's own wallets.
    CurrencyConverted {
        user_id: String,
        source_wallet_id: String,
        target_wallet_id: String,
        from_currency: String,
        to_currency: String,
        amount: Decimal,
        converted_amount: Decimal,
        rate: Decimal,
        transaction_id: String,
    },

    /// A peg-currency trade was executed between two of a user's wallets.
    CurrencyTraded {
        user_id: String,
        source_wallet_id: String,
        target_wallet_id: String,
        from_currency: String,
        to_currency: String,
        amount: Decimal,
        traded_amount: Decimal,
        rate: Decimal,
        transaction_id: String,
    },
}

impl DomainEvent {
    /// The routing name consumers subscribe to.
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::WalletFunded { .. } => "wallet.funded",
            DomainEvent::CurrencyConverted { .. } => "wallet.currencyConverted",
            DomainEvent::CurrencyTraded { .. } => "wallet.currencyTraded",
        }
    }
}
