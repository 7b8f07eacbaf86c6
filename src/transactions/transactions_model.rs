use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of ledger mutation a record documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Funding,
    Conversion,
    Trade,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Funding => "funding",
            TransactionType::Conversion => "conversion",
            TransactionType::Trade => "trade",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "funding" => Ok(TransactionType::Funding),
            "conversion" => Ok(TransactionType::Conversion),
            "trade" => Ok(TransactionType::Trade),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            _ => Err(format!("Unknown transaction status: {}", s)),
        }
    }
}

/// Immutable ledger entry. Once committed, rows are never updated or deleted;
/// wallet balances must always reconcile against the sum of these records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub user_id: String,
    pub wallet_id: String,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub amount: Decimal,
    pub source_currency: String,
    pub target_currency: Option<String>,
    pub exchange_rate: Decimal,
    /// Unique external reference for the operation.
    pub reference: String,
    pub metadata: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

/// Input for one ledger entry; ids, reference, and timestamp are assigned by
/// the repository at insert time.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: String,
    pub wallet_id: String,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub amount: Decimal,
    pub source_currency: String,
    pub target_currency: Option<String>,
    pub exchange_rate: Decimal,
    pub metadata: Option<serde_json::Value>,
}

/// Database model for transaction records.
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub wallet_id: String,
    pub transaction_type: String,
    pub status: String,
    pub amount: String,
    pub source_currency: String,
    pub target_currency: Option<String>,
    pub exchange_rate: String,
    pub reference: String,
    pub metadata: Option<String>,
    pub timestamp: String,
}

impl From<TransactionDB> for TransactionRecord {
    fn from(db: TransactionDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            wallet_id: db.wallet_id,
            transaction_type: TransactionType::from_str(&db.transaction_type)
                .unwrap_or(TransactionType::Funding),
            status: TransactionStatus::from_str(&db.status).unwrap_or(TransactionStatus::Failed),
            amount: Decimal::from_str(&db.amount).unwrap_or(Decimal::ZERO),
            source_currency: db.source_currency,
            target_currency: db.target_currency,
            exchange_rate: Decimal::from_str(&db.exchange_rate).unwrap_or(Decimal::ZERO),
            reference: db.reference,
            metadata: db
                .metadata
                .as_deref()
                .and_then(|m| serde_json::from_str(m).ok()),
            timestamp: DateTime::parse_from_rfc3339(&db.timestamp)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_default(),
        }
    }
}

/// One page of a history listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_type_and_status_string_forms() {
        assert_eq!(TransactionType::Funding.as_str(), "funding");
        assert_eq!(
            TransactionType::from_str("trade").unwrap(),
            TransactionType::Trade
        );
        assert_eq!(TransactionStatus::Completed.as_str(), "completed");
        assert!(TransactionStatus::from_str("unknown").is_err());
    }

    #[test]
    fn test_record_from_db_parses_metadata_and_amounts() {
        let db = TransactionDB {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            wallet_id: "w1".to_string(),
            transaction_type: "conversion".to_string(),
            status: "completed".to_string(),
            amount: "100.50".to_string(),
            source_currency: "USD".to_string(),
            target_currency: Some("NGN".to_string()),
            exchange_rate: "1530".to_string(),
            reference: "ref-1".to_string(),
            metadata: Some(r#"{"convertedAmount":"153765"}"#.to_string()),
            timestamp: Utc::now().to_rfc3339(),
        };

        let record = TransactionRecord::from(db);
        assert_eq!(record.transaction_type, TransactionType::Conversion);
        assert_eq!(record.amount, dec!(100.50));
        assert_eq!(record.exchange_rate, dec!(1530));
        assert!(record.metadata.unwrap().get("convertedAmount").is_some());
    }
}
