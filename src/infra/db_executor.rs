use crate::error::*;
use crate::infra::{SqliteConnPool, SqlitePooledConnection};
use anyhow::Error;
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Debug)]
pub enum DBExecutorError {
    DBError,
    PoolError,
    MigrationError,
}

impl IServiceError for DBExecutorError {
    fn error_type(&self) -> String {
        use DBExecutorError::*;

        match self {
            DBError => "db_error",
            PoolError => "pool_error",
            MigrationError => "migration_error",
        }
        .to_string()
    }

    fn status_code(&self) -> http::StatusCode {
        http::StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl From<diesel::result::Error> for ServiceError {
    fn from(err: diesel::result::Error) -> ServiceError {
        use diesel::result::Error::*;

        match err {
            NotFound => ServiceError::new(RepositoryError::RecordNotFound, err),
            DatabaseError(diesel::result::DatabaseErrorKind::UniqueViolation, _) => {
                ServiceError::new(RepositoryError::DuplicateRecord, err)
            }
            _ => ServiceError::new(DBExecutorError::DBError, err),
        }
    }
}

impl From<r2d2::Error> for ServiceError {
    fn from(err: r2d2::Error) -> ServiceError {
        ServiceError::new(DBExecutorError::PoolError, err)
    }
}

#[derive(Clone)]
pub struct DBExecutor(SqliteConnPool);
impl DBExecutor {
    pub fn new(database_url: String, size_conn_pool: u32) -> DBExecutor {
        DBExecutor(SqliteConnPool::new(database_url, size_conn_pool))
    }

    pub fn get_connection(&self) -> Result<SqlitePooledConnection> {
        Ok(self.0.get_connection()?)
    }
}

/// Async facade over the pool. Every query runs on the blocking thread pool.
#[derive(Clone)]
pub struct DBConnector(DBExecutor);

impl DBConnector {
    pub fn new(executor: DBExecutor) -> DBConnector {
        DBConnector(executor)
    }

    /// Checks out a connection and brings the schema up to date.
    pub async fn ensure_initialized(&self) -> Result<()> {
        let executor = self.0.clone();

        tokio::task::spawn_blocking(move || {
            let mut pooled = executor.get_connection()?;
            let conn: &mut SqliteConnection = &mut pooled;
            let applied = conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(|err| {
                    ServiceError::new(DBExecutorError::MigrationError, Error::msg(err.to_string()))
                })?
                .len();
            tracing::info!(applied, "database migrations up to date");
            Ok(())
        })
        .await?
    }

    pub async fn execute<Q: Send + 'static>(&self, query: Q) -> Result<usize>
    where
        Q: diesel::RunQueryDsl<SqliteConnection>,
        Q: diesel::query_builder::QueryFragment<diesel::sqlite::Sqlite>,
        Q: diesel::query_builder::QueryId,
    {
        let executor = self.0.clone();

        tokio::task::spawn_blocking(move || {
            let mut pooled = executor.get_connection()?;
            let result = query.execute(&mut *pooled)?;
            Ok(result)
        })
        .await?
    }

    pub async fn first<T: 'static + Send, Q: 'static + Send>(&self, query: Q) -> Result<T>
    where
        Q: diesel::query_dsl::limit_dsl::LimitDsl,
        Q: diesel::RunQueryDsl<SqliteConnection>,
        diesel::helper_types::Limit<Q>: for<'a> diesel::query_dsl::LoadQuery<'a, SqliteConnection, T>,
    {
        let executor = self.0.clone();

        tokio::task::spawn_blocking(move || {
            let mut pooled = executor.get_connection()?;
            let result = query.first(&mut *pooled)?;
            Ok(result)
        })
        .await?
    }

    pub async fn load<T: 'static + Send, Q: 'static + Send>(&self, query: Q) -> Result<Vec<T>>
    where
        Q: diesel::RunQueryDsl<SqliteConnection>,
        Q: for<'a> diesel::query_dsl::LoadQuery<'a, SqliteConnection, T>,
    {
        let executor = self.0.clone();

        tokio::task::spawn_blocking(move || {
            let mut pooled = executor.get_connection()?;
            let result = query.load(&mut *pooled)?;
            Ok(result)
        })
        .await?
    }

    /// Runs `f` inside `BEGIN IMMEDIATE`, so the write lock is taken up front.
    pub async fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> diesel::QueryResult<T> + Send + 'static,
    {
        let executor = self.0.clone();

        tokio::task::spawn_blocking(move || {
            let mut pooled = executor.get_connection()?;
            let conn: &mut SqliteConnection = &mut pooled;
            let result = conn.immediate_transaction(f)?;
            Ok(result)
        })
        .await?
    }
}
