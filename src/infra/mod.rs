mod authenticator;
mod connection_pool;
mod db_executor;
mod http_client;
mod locale;

pub use authenticator::*;
pub use connection_pool::*;
pub use db_executor::*;
pub use http_client::*;
pub use locale::*;
