// SPDX-License-Identifier: MIT OR Apache-2.0

use std::num::TryFromIntError;
use std::sync::Arc;

use allotment_core::{IdError, ParseActionError, ParseSourceError, ParseStatusError};
use sqlx::migrate::{MigrateDatabase, Migrator};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, SqliteConnection, migrate};
use thiserror::Error;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};

/// Create SQLite database if it doesn't already exist.
pub async fn create_database(url: &str) -> Result<(), SqliteError> {
    if !Sqlite::database_exists(url).await? {
        Sqlite::create_database(url).await?
    }
    Ok(())
}

/// Drop SQLite database if it exists.
pub async fn drop_database(url: &str) -> Result<(), SqliteError> {
    if Sqlite::database_exists(url).await? {
        Sqlite::drop_database(url).await?
    }
    Ok(())
}

/// Get migrations from folder without running them.
pub fn migrations() -> Migrator {
    migrate!()
}

/// Run any pending database migrations from inside the application.
pub async fn run_pending_migrations(pool: &sqlx::SqlitePool) -> Result<(), SqliteError> {
    migrations().run(pool).await?;
    Ok(())
}

pub struct SqliteStoreBuilder {
    url: String,
    max_connections: u32,
    run_migrations: bool,
    create_database: bool,
}

impl Default for SqliteStoreBuilder {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".into(),
            max_connections: 16,
            create_database: true,
            run_migrations: true,
        }
    }
}

impl SqliteStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(any(test, feature = "test_utils"))]
    pub fn random_memory_url(mut self) -> Self {
        // Every temporary in-memory database gets a random name to keep tests running in
        // parallel isolated from each other.
        //
        // See related issue: https://github.com/launchbadge/sqlx/issues/2510
        self.url = format!(
            "sqlite://allotment{}?mode=memory&cache=private",
            rand::random::<u32>()
        );
        self
    }

    pub fn database_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn create_database(mut self, create_database: bool) -> Self {
        self.create_database = create_database;
        self
    }

    pub fn run_default_migrations(mut self, run_migrations: bool) -> Self {
        self.run_migrations = run_migrations;
        self
    }

    pub async fn build<'a>(self) -> Result<SqliteStore<'a>, SqliteError> {
        if self.create_database {
            create_database(&self.url).await?;
        }

        let pool: sqlx::SqlitePool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect(&self.url)
            .await?;

        if self.run_migrations {
            run_pending_migrations(&pool).await?;
        }

        Ok(SqliteStore::new(pool))
    }
}

pub type Transaction<'a> = sqlx::Transaction<'a, Sqlite>;

/// SQLite database with connection pool and transaction provider.
///
/// This struct can be cloned and used in multiple places in the application. Every cloned
/// instance re-uses the same connection pool and has access to the same transaction if one was
/// started.
///
/// Store methods run their queries through [`SqliteStore::execute`]: inside the current
/// transaction when a process holds a `TransactionPermit`, otherwise directly on a pooled
/// connection where every statement commits on its own. Assignment operations are sequences of
/// such independent statements, a caller who needs several of them to be atomic begins a
/// transaction around them.
///
/// SQLite strictly serializes transactions with _writes_ and will block any parallel attempt to
/// begin another one. Processes starting a transaction acquire a `TransactionPermit` and keep it
/// until the transaction was committed or rolled back.
#[derive(Clone, Debug)]
pub struct SqliteStore<'a> {
    tx: Arc<Mutex<Option<Transaction<'a>>>>,
    pool: sqlx::SqlitePool,
    semaphore: Arc<Semaphore>,
}

impl<'a> SqliteStore<'a> {
    pub(crate) fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            tx: Arc::default(),
            pool,
            // SQLite only ever allows _one_ transaction at a time, the semaphore makes this
            // explicit.
            semaphore: Arc::new(Semaphore::new(1)),
        }
    }

    /// Shortcut building an in-memory SQLite database with a randomised name for testing purposes.
    #[cfg(any(test, feature = "test_utils"))]
    pub async fn temporary() -> Self {
        SqliteStoreBuilder::new()
            .random_memory_url()
            .max_connections(1)
            .build()
            .await
            .expect("migrations succeeded")
    }

    /// Execute SQL query within transaction.
    ///
    /// This method will return an error when no transaction is currently given. Make sure to call
    /// `begin` before.
    ///
    /// If the query fails the user probably wants to roll back the transaction and free the
    /// permit. This is _not_ handled automatically.
    pub async fn tx<F, R>(&self, f: F) -> Result<R, SqliteError>
    where
        F: AsyncFnOnce(&mut Transaction) -> Result<R, SqliteError>,
    {
        let mut tx_ref = self.tx.lock().await;
        let tx = tx_ref.as_mut().ok_or(SqliteError::TransactionMissing)?;

        f(tx).await
    }

    /// Execute SQL query within the current transaction or, if none was started, on a connection
    /// from the pool.
    pub async fn execute<F, R>(&self, f: F) -> Result<R, SqliteError>
    where
        F: AsyncFnOnce(&mut SqliteConnection) -> Result<R, SqliteError>,
    {
        let mut tx_ref = self.tx.lock().await;
        match tx_ref.as_mut() {
            Some(tx) => f(&mut **tx).await,
            None => {
                // Release the lock early, pooled queries don't need exclusive access.
                drop(tx_ref);
                let mut connection = self.pool.acquire().await?;
                f(&mut *connection).await
            }
        }
    }
}

impl<'a> crate::traits::Transaction for SqliteStore<'a> {
    type Error = SqliteError;

    type Permit = TransactionPermit;

    /// Begins a transaction.
    ///
    /// Transactions are strictly serialized, this is expressed in form of a `TransactionPermit`
    /// processes need to hold when acquiring access to a new transaction. Any concurrent process
    /// calling it will await here if there's already another process holding a permit.
    ///
    /// Every store method called while the permit is held runs inside this transaction.
    async fn begin(&self) -> Result<TransactionPermit, SqliteError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| SqliteError::SemaphoreClosed)?;

        // The lock only makes sure that mutable access to the transaction is exclusive _within_
        // a process "holding" the permit.
        let mut tx_ref = self.tx.lock().await;
        if tx_ref.is_some() {
            return Err(SqliteError::TransactionExists);
        }

        let tx = self.pool.begin().await?;
        tx_ref.replace(tx);

        Ok(TransactionPermit(permit))
    }

    /// Rolls back the transaction and with that all uncommitted changes.
    ///
    /// This takes the permit and frees it after the rollback has finished. Other processes can now
    /// begin new transactions.
    async fn rollback(&self, permit: TransactionPermit) -> Result<(), SqliteError> {
        let tx = self.tx.lock().await.take();

        let result = match tx {
            Some(tx) => tx.rollback().await.map_err(SqliteError::Sqlite),
            None => Err(SqliteError::TransactionMissing),
        };

        // Always drop the permit, both on successful rollback and error.
        drop(permit);

        result
    }

    /// Commits the transaction.
    ///
    /// This takes the permit and frees it after the commit has finished. Other processes can now
    /// begin new transactions.
    async fn commit(&self, permit: TransactionPermit) -> Result<(), SqliteError> {
        let tx = self.tx.lock().await.take();

        let result = match tx {
            Some(tx) => tx.commit().await.map_err(SqliteError::Sqlite),
            None => Err(SqliteError::TransactionMissing),
        };

        // Always drop the permit, both on successful commit and error.
        drop(permit);

        result
    }
}

#[allow(unused)]
pub struct TransactionPermit(OwnedSemaphorePermit);

/// Converts an unsigned value into the signed integer type SQLite stores.
pub(crate) fn encode_int(name: &str, value: u64) -> Result<i64, SqliteError> {
    i64::try_from(value).map_err(|err| SqliteError::Encode(name.to_string(), err))
}

/// Converts a stored signed integer back into an unsigned value.
pub(crate) fn decode_int(name: &str, value: i64) -> Result<u64, SqliteError> {
    u64::try_from(value).map_err(|err| SqliteError::Decode(name.to_string(), err.into()))
}

/// Converts a stored integer into one of the identifier types.
pub(crate) fn decode_id<T>(name: &str, value: i64) -> Result<T, SqliteError>
where
    T: TryFrom<u64, Error = IdError>,
{
    T::try_from(decode_int(name, value)?)
        .map_err(|err| SqliteError::Decode(name.to_string(), err.into()))
}

/// Same as [`decode_id`] with `NULL` or `0` mapping to no identifier.
pub(crate) fn decode_optional_id<T>(
    name: &str,
    value: Option<i64>,
) -> Result<Option<T>, SqliteError>
where
    T: TryFrom<u64, Error = IdError>,
{
    match value {
        None | Some(0) => Ok(None),
        Some(value) => decode_id(name, value).map(Some),
    }
}

#[derive(Debug, Error)]
pub enum SqliteError {
    /// This is a critical error as it indicates that something is wrong with the usage of this
    /// API: Queries using transactions can only ever occur if a transaction was started _before_.
    #[error("tried to interact with inexistant transaction")]
    TransactionMissing,

    /// A transaction was found after acquiring a fresh permit, the permit of an earlier
    /// transaction was dropped without committing or rolling back.
    #[error("tried to begin transaction while another one is still open")]
    TransactionExists,

    #[error("transaction semaphore was closed")]
    SemaphoreClosed,

    /// SQLite database and connection error.
    #[error(transparent)]
    Sqlite(#[from] sqlx::Error),

    /// SQL table schema migration error.
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Value does not fit into a SQLite integer column.
    #[error("failed encoding '{0}' value before storing to database: {1}")]
    Encode(String, TryFromIntError),

    /// Invalid, corrupted data was found in the database. This is a critical error.
    #[error("could not decode corrupted '{0}' value from database: {1}")]
    Decode(String, DecodeError),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Integer(#[from] TryFromIntError),

    #[error(transparent)]
    Id(#[from] IdError),

    #[error(transparent)]
    Source(#[from] ParseSourceError),

    #[error(transparent)]
    Action(#[from] ParseActionError),

    #[error(transparent)]
    Status(#[from] ParseStatusError),

    #[error("unknown match scope '{0}'")]
    Scope(String),
}
