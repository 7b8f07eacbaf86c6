use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use fxwallet_core::config::WalletConfig;
use fxwallet_core::db::{self, DbPool};
use fxwallet_core::errors::{DatabaseError, Error, Result};
use fxwallet_core::events::MockDomainEventSink;
use fxwallet_core::fx::{
    AllRates, FxError, FxRepository, FxService, RateMap, RateProvider,
};
use fxwallet_core::transactions::{
    NewTransaction, Paged, TransactionQueryService, TransactionRecord, TransactionRepository,
    TransactionRepositoryTrait, TransactionType,
};
use fxwallet_core::wallets::{WalletRepository, WalletService};

/// Fixed-table rate feed with a call counter; set `fail` to simulate an outage.
pub struct StubRateProvider {
    tables: AllRates,
    pub fail: bool,
    calls: AtomicUsize,
}

impl StubRateProvider {
    pub fn new() -> Self {
        let mut tables = AllRates::new();
        tables.insert(
            "USD".to_string(),
            HashMap::from([
                ("NGN".to_string(), dec!(1500)),
                ("EUR".to_string(), dec!(0.9)),
                ("GBP".to_string(), dec!(0.8)),
            ]),
        );
        tables.insert(
            "NGN".to_string(),
            HashMap::from([
                ("USD".to_string(), dec!(0.00065)),
                ("EUR".to_string(), dec!(0.0006)),
                ("GBP".to_string(), dec!(0.00052)),
            ]),
        );
        tables.insert(
            "EUR".to_string(),
            HashMap::from([
                ("USD".to_string(), dec!(1.1)),
                ("NGN".to_string(), dec!(1650)),
                ("GBP".to_string(), dec!(0.88)),
            ]),
        );
        tables.insert(
            "GBP".to_string(),
            HashMap::from([
                ("USD".to_string(), dec!(1.25)),
                ("NGN".to_string(), dec!(1875)),
                ("EUR".to_string(), dec!(1.14)),
            ]),
        );

        Self {
            tables,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        let mut provider = Self::new();
        provider.fail = true;
        provider
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateProvider for StubRateProvider {
    async fn fetch_rates(&self, base_currency: &str) -> std::result::Result<RateMap, FxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FxError::FetchFailed("feed offline".to_string()));
        }
        self.tables
            .get(base_currency)
            .cloned()
            .ok_or_else(|| FxError::FetchFailed(format!("no table for {}", base_currency)))
    }
}

/// Ledger repository wrapper whose insert always fails, for rollback tests.
/// Reads delegate to the real repository.
pub struct FailingLedger {
    inner: TransactionRepository,
}

impl FailingLedger {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            inner: TransactionRepository::new(pool),
        }
    }
}

impl TransactionRepositoryTrait for FailingLedger {
    fn create_in_transaction(
        &self,
        _conn: &mut diesel::SqliteConnection,
        _new_transaction: NewTransaction,
    ) -> Result<TransactionRecord> {
        Err(Error::Database(DatabaseError::QueryFailed(
            "simulated insert failure".to_string(),
        )))
    }

    fn list_for_user(
        &self,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<Paged<TransactionRecord>> {
        self.inner.list_for_user(user_id, page, limit)
    }

    fn list_for_wallet(
        &self,
        wallet_id: &str,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<Paged<TransactionRecord>> {
        self.inner.list_for_wallet(wallet_id, user_id, page, limit)
    }

    fn list_by_type(
        &self,
        user_id: &str,
        transaction_type: TransactionType,
        page: i64,
        limit: i64,
    ) -> Result<Paged<TransactionRecord>> {
        self.inner
            .list_by_type(user_id, transaction_type, page, limit)
    }

    fn get_by_id(&self, transaction_id: &str, user_id: &str) -> Result<Option<TransactionRecord>> {
        self.inner.get_by_id(transaction_id, user_id)
    }
}

/// Fully wired engine over a throwaway on-disk database.
pub struct TestApp {
    // Held so the database directory outlives the test.
    _dir: TempDir,
    pub pool: Arc<DbPool>,
    pub service: WalletService,
    pub queries: TransactionQueryService,
    pub sink: MockDomainEventSink,
    pub provider: Arc<StubRateProvider>,
    pub fx_store: Arc<FxRepository>,
}

pub async fn setup() -> TestApp {
    setup_with(Arc::new(StubRateProvider::new()), false).await
}

pub async fn setup_with(provider: Arc<StubRateProvider>, failing_ledger: bool) -> TestApp {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db_path = db::init(dir.path().to_str().expect("utf-8 temp path")).expect("init database");
    let pool = db::create_pool(&db_path).expect("create pool");
    db::run_migrations(&pool).expect("run migrations");

    let config = WalletConfig::default();
    let fx_store = Arc::new(FxRepository::new(pool.clone()));
    let fx = Arc::new(FxService::new(
        fx_store.clone(),
        provider.clone(),
        config.clone(),
    ));

    let wallets = Arc::new(WalletRepository::new(pool.clone()));
    let transactions: Arc<dyn TransactionRepositoryTrait> = if failing_ledger {
        Arc::new(FailingLedger::new(pool.clone()))
    } else {
        Arc::new(TransactionRepository::new(pool.clone()))
    };
    let queries = TransactionQueryService::new(transactions.clone());

    let writer = db::spawn_writer(pool.clone()).expect("spawn writer");
    let sink = MockDomainEventSink::new();

    let service = WalletService::new(
        wallets,
        transactions,
        fx,
        writer,
        Arc::new(sink.clone()),
        config,
    );

    TestApp {
        _dir: dir,
        pool,
        service,
        queries,
        sink,
        provider,
        fx_store,
    }
}
