use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;

use crate::config::WalletConfig;
use crate::db::WriteHandle;
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};
use crate::fx::FxServiceTrait;
use crate::transactions::{
    NewTransaction, TransactionRepositoryTrait, TransactionStatus, TransactionType,
};
use crate::wallets::wallets_errors::WalletError;
use crate::wallets::wallets_model::{ExchangeOutcome, FundingOutcome, Wallet};
use crate::wallets::wallets_traits::WalletRepositoryTrait;

/// True when exactly one side of the pair is the peg currency.
fn has_one_peg_leg(from: &str, to: &str, peg: &str) -> bool {
    (from == peg) != (to == peg)
}

/// The transaction engine.
///
/// Every balance mutation follows the same skeleton: validate and resolve rates
/// outside any transaction, then submit one job to the writer actor. The job
/// re-reads wallet state on the writer connection, applies the balance writes,
/// and inserts exactly one COMPLETED ledger record; all of it commits or rolls
/// back together. The domain event goes out only after the commit.
pub struct WalletService {
    wallets: Arc<dyn WalletRepositoryTrait>,
    transactions: Arc<dyn TransactionRepositoryTrait>,
    fx: Arc<dyn FxServiceTrait>,
    writer: WriteHandle,
    events: Arc<dyn DomainEventSink>,
    config: WalletConfig,
}

impl WalletService {
    pub fn new(
        wallets: Arc<dyn WalletRepositoryTrait>,
        transactions: Arc<dyn TransactionRepositoryTrait>,
        fx: Arc<dyn FxServiceTrait>,
        writer: WriteHandle,
        events: Arc<dyn DomainEventSink>,
        config: WalletConfig,
    ) -> Self {
        Self {
            wallets,
            transactions,
            fx,
            writer,
            events,
            config,
        }
    }

    /// Credits a wallet with new funds.
    pub async fn fund_wallet(
        &self,
        user_id: &str,
        currency: &str,
        amount: Decimal,
    ) -> Result<FundingOutcome> {
        if amount <= Decimal::ZERO {
            return Err(WalletError::InvalidAmount.into());
        }
        let currency = currency.to_uppercase();

        // Cheap existence check before taking the write lock; the job re-reads
        // authoritatively.
        self.require_wallet(user_id, &currency)?;

        let wallets = Arc::clone(&self.wallets);
        let transactions = Arc::clone(&self.transactions);
        let user = user_id.to_string();
        let ccy = currency.clone();

        let (wallet, transaction) = self
            .writer
            .exec(move |conn| {
                let row = wallets
                    .find_in_transaction(conn, &user, &ccy)?
                    .ok_or_else(|| WalletError::WalletNotFound(wallet_label(&user, &ccy)))?;

                let balance = Decimal::from_str(&row.balance)?;
                let updated =
                    wallets.set_balance_in_transaction(conn, &row.id, balance + amount)?;

                let record = transactions.create_in_transaction(
                    conn,
                    NewTransaction {
                        user_id: user.clone(),
                        wallet_id: row.id.clone(),
                        transaction_type: TransactionType::Funding,
                        status: TransactionStatus::Completed,
                        amount,
                        source_currency: ccy.clone(),
                        target_currency: Some(ccy.clone()),
                        exchange_rate: Decimal::ONE,
                        metadata: Some(json!({ "fundingSource": "direct" })),
                    },
                )?;

                Ok((Wallet::from(updated), record))
            })
            .await?;

        self.events.emit(DomainEvent::WalletFunded {
            user_id: user_id.to_string(),
            wallet_id: wallet.id.clone(),
            currency,
            amount,
            transaction_id: transaction.id.clone(),
        });

        Ok(FundingOutcome {
            wallet,
            transaction,
        })
    }

    /// Moves value between two of the user's wallets at the current rate.
    pub async fn convert_currency(
        &self,
        user_id: &str,
        from_currency: &str,
        to_currency: &str,
        amount: Decimal,
    ) -> Result<ExchangeOutcome> {
        let from = from_currency.to_uppercase();
        let to = to_currency.to_uppercase();
        if from == to {
            return Err(WalletError::SameCurrency.into());
        }

        let outcome = self
            .execute_exchange(user_id, &from, &to, amount, TransactionType::Conversion)
            .await?;

        self.events.emit(DomainEvent::CurrencyConverted {
            user_id: user_id.to_string(),
            source_wallet_id: outcome.source_wallet.id.clone(),
            target_wallet_id: outcome.target_wallet.id.clone(),
            from_currency: from,
            to_currency: to,
            amount,
            converted_amount: outcome.converted_amount,
            rate: outcome.rate,
            transaction_id: outcome.transaction.id.clone(),
        });

        Ok(outcome)
    }

    /// Converts with the additional rule that one leg must be the peg currency.
    pub async fn trade_currency(
        &self,
        user_id: &str,
        from_currency: &str,
        to_currency: &str,
        amount: Decimal,
    ) -> Result<ExchangeOutcome> {
        let from = from_currency.to_uppercase();
        let to = to_currency.to_uppercase();
        if from == to {
            return Err(WalletError::SameCurrency.into());
        }
        if !has_one_peg_leg(&from, &to, &self.config.peg_currency) {
            return Err(WalletError::TradeRequiresPegCurrency.into());
        }

        let outcome = self
            .execute_exchange(user_id, &from, &to, amount, TransactionType::Trade)
            .await?;

        self.events.emit(DomainEvent::CurrencyTraded {
            user_id: user_id.to_string(),
            source_wallet_id: outcome.source_wallet.id.clone(),
            target_wallet_id: outcome.target_wallet.id.clone(),
            from_currency: from,
            to_currency: to,
            amount,
            traded_amount: outcome.converted_amount,
            rate: outcome.rate,
            transaction_id: outcome.transaction.id.clone(),
        });

        Ok(outcome)
    }

    /// Shared debit/credit path for conversions and trades. Callers have
    /// already normalized the currencies and checked pair-level rules.
    async fn execute_exchange(
        &self,
        user_id: &str,
        from: &str,
        to: &str,
        amount: Decimal,
        transaction_type: TransactionType,
    ) -> Result<ExchangeOutcome> {
        if amount <= Decimal::ZERO {
            return Err(WalletError::InvalidAmount.into());
        }

        // The resolver may hit the network; capture the rate once, before any
        // write lock is taken.
        let conversion = self.fx.convert(from, to, amount).await?;

        let source = self.require_wallet(user_id, from)?;
        self.require_wallet(user_id, to)?;
        if source.balance < amount {
            return Err(WalletError::InsufficientBalance {
                currency: from.to_string(),
                available: source.balance,
                required: amount,
            }
            .into());
        }

        let wallets = Arc::clone(&self.wallets);
        let transactions = Arc::clone(&self.transactions);
        let user = user_id.to_string();
        let from_ccy = from.to_string();
        let to_ccy = to.to_string();
        let converted_amount = conversion.converted_amount;
        let rate = conversion.rate;

        let (source_wallet, target_wallet, transaction) = self
            .writer
            .exec(move |conn| {
                let source_row = wallets
                    .find_in_transaction(conn, &user, &from_ccy)?
                    .ok_or_else(|| WalletError::WalletNotFound(wallet_label(&user, &from_ccy)))?;
                let target_row = wallets
                    .find_in_transaction(conn, &user, &to_ccy)?
                    .ok_or_else(|| WalletError::WalletNotFound(wallet_label(&user, &to_ccy)))?;

                // Authoritative balance check; the pre-check raced with other
                // writers.
                let source_balance = Decimal::from_str(&source_row.balance)?;
                if source_balance < amount {
                    return Err(WalletError::InsufficientBalance {
                        currency: from_ccy.clone(),
                        available: source_balance,
                        required: amount,
                    }
                    .into());
                }
                let target_balance = Decimal::from_str(&target_row.balance)?;

                let source_updated = wallets.set_balance_in_transaction(
                    conn,
                    &source_row.id,
                    source_balance - amount,
                )?;
                let target_updated = wallets.set_balance_in_transaction(
                    conn,
                    &target_row.id,
                    target_balance + converted_amount,
                )?;

                let record = transactions.create_in_transaction(
                    conn,
                    NewTransaction {
                        user_id: user.clone(),
                        wallet_id: source_row.id.clone(),
                        transaction_type,
                        status: TransactionStatus::Completed,
                        amount,
                        source_currency: from_ccy.clone(),
                        target_currency: Some(to_ccy.clone()),
                        exchange_rate: rate,
                        metadata: Some(json!({
                            "convertedAmount": converted_amount,
                            "sourceWalletId": source_row.id,
                            "targetWalletId": target_row.id,
                        })),
                    },
                )?;

                Ok((
                    Wallet::from(source_updated),
                    Wallet::from(target_updated),
                    record,
                ))
            })
            .await?;

        Ok(ExchangeOutcome {
            source_wallet,
            target_wallet,
            transaction,
            rate,
            converted_amount,
        })
    }

    /// Creates one zero-balance wallet per supported currency. Idempotent:
    /// currencies the user already holds are left untouched.
    pub async fn create_default_wallets(&self, user_id: &str) -> Result<Vec<Wallet>> {
        let wallets = Arc::clone(&self.wallets);
        let user = user_id.to_string();
        let currencies = self.config.supported_currencies.clone();

        self.writer
            .exec(move |conn| {
                let mut created = Vec::with_capacity(currencies.len());
                for currency in &currencies {
                    let row = wallets.create_if_absent_in_transaction(conn, &user, currency)?;
                    created.push(Wallet::from(row));
                }
                Ok(created)
            })
            .await
    }

    pub fn find_user_wallets(&self, user_id: &str) -> Result<Vec<Wallet>> {
        let found = self.wallets.list_for_user(user_id)?;
        if found.is_empty() {
            return Err(WalletError::WalletNotFound(format!("user {}", user_id)).into());
        }
        Ok(found)
    }

    pub fn find_wallet_by_currency(&self, user_id: &str, currency: &str) -> Result<Wallet> {
        let currency = currency.to_uppercase();
        self.require_wallet(user_id, &currency)
    }

    fn require_wallet(&self, user_id: &str, currency: &str) -> Result<Wallet> {
        self.wallets
            .find_by_currency(user_id, currency)?
            .ok_or_else(|| WalletError::WalletNotFound(wallet_label(user_id, currency)).into())
    }
}

fn wallet_label(user_id: &str, currency: &str) -> String {
    format!("{} wallet for user {}", currency, user_id)
}
