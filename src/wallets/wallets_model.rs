use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transactions::TransactionRecord;

/// One user's holding in one currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub user_id: String,
    pub currency: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for wallets.
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::wallets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WalletDB {
    pub id: String,
    pub user_id: String,
    pub currency: String,
    pub balance: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<WalletDB> for Wallet {
    fn from(db: WalletDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            currency: db.currency,
            balance: Decimal::from_str(&db.balance).unwrap_or(Decimal::ZERO),
            created_at: DateTime::parse_from_rfc3339(&db.created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_default(),
            updated_at: DateTime::parse_from_rfc3339(&db.updated_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_default(),
        }
    }
}

/// Outcome of a successful funding operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingOutcome {
    pub wallet: Wallet,
    pub transaction: TransactionRecord,
}

/// Outcome of a successful conversion or trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeOutcome {
    pub source_wallet: Wallet,
    pub target_wallet: Wallet,
    pub transaction: TransactionRecord,
    pub rate: Decimal,
    pub converted_amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_wallet_from_db_parses_balance() {
        let now = Utc::now().to_rfc3339();
        let db = WalletDB {
            id: "w1".to_string(),
            user_id: "u1".to_string(),
            currency: "NGN".to_string(),
            balance: "12500.75".to_string(),
            created_at: now.clone(),
            updated_at: now,
        };

        let wallet = Wallet::from(db);
        assert_eq!(wallet.balance, dec!(12500.75));
        assert_eq!(wallet.currency, "NGN");
    }
}
