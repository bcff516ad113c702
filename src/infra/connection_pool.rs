use diesel::connection::SimpleConnection;
use diesel::{r2d2, sqlite::SqliteConnection};
use lazy_init::LazyTransform;
use std::sync::Arc;
use std::time::Duration;

pub type SqlitePooledConnection = r2d2::PooledConnection<r2d2::ConnectionManager<SqliteConnection>>;

#[derive(Clone)]
pub struct SqliteConnPool(
    Arc<LazyTransform<Config, r2d2::Pool<r2d2::ConnectionManager<SqliteConnection>>>>,
);

struct Config {
    database_url: String,
    size_conn_pool: u32,
}

/// Pragmas applied to every pooled connection.
#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl r2d2::CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

fn initialize(config: Config) -> r2d2::Pool<r2d2::ConnectionManager<SqliteConnection>> {
    let manager = r2d2::ConnectionManager::<SqliteConnection>::new(config.database_url);
    // connection errors surface on checkout, not here
    r2d2::Pool::builder()
        .max_size(config.size_conn_pool)
        .connection_customizer(Box::new(ConnectionOptions {
            busy_timeout: Duration::from_secs(5),
        }))
        .build_unchecked(manager)
}

impl SqliteConnPool {
    pub fn new(database_url: String, size_conn_pool: u32) -> SqliteConnPool {
        SqliteConnPool(Arc::new(LazyTransform::new(Config {
            database_url,
            size_conn_pool,
        })))
    }

    pub fn get_connection(&self) -> Result<SqlitePooledConnection, ::r2d2::Error> {
        self.0.get_or_create(initialize).get()
    }
}
