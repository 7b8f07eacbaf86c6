//! Single-writer actor for balance mutations.
//!
//! SQLite serializes writers at the file level; reading a wallet row, mutating
//! it in memory, and saving it from concurrent pooled connections would still
//! permit a lost update. All ledger writes therefore go through one dedicated
//! connection, and every job runs inside an `immediate_transaction`, which takes
//! the write lock at BEGIN. A job that returns an error rolls back every write
//! it performed.

use std::any::Any;
use std::sync::Arc;

use diesel::{Connection, SqliteConnection};
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::{DatabaseError, Error, Result};

/// A write job executed on the actor's dedicated connection.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type ErasedJob = Job<Box<dyn Any + Send + 'static>>;
type Reply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for submitting write jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(ErasedJob, Reply)>,
}

impl WriteHandle {
    /// Executes `job` inside one atomic unit on the writer's connection.
    ///
    /// The closure's writes commit together when it returns `Ok` and roll back
    /// together when it returns `Err`.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| {
                Error::Database(DatabaseError::TransactionFailed(
                    "writer actor stopped".to_string(),
                ))
            })?;

        match ret_rx.await {
            Ok(result) => result.map(|boxed| match boxed.downcast::<T>() {
                Ok(value) => *value,
                Err(_) => unreachable!("writer job reply carries the job's own return type"),
            }),
            Err(_) => Err(Error::Database(DatabaseError::TransactionFailed(
                "writer actor dropped the reply".to_string(),
            ))),
        }
    }
}

/// Spawns the background task that owns the single write connection and
/// processes jobs serially.
pub fn spawn_writer(pool: Arc<DbPool>) -> Result<WriteHandle> {
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, Reply)>(1024);

    let mut conn = pool.get()?;

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Box<dyn Any + Send + 'static>> =
                conn.immediate_transaction::<_, Error, _>(|c| job(c));

            // Receiver may have been dropped (caller cancelled); nothing to do.
            let _ = reply_tx.send(result);
        }
    });

    Ok(WriteHandle { tx })
}
