mod repository_error;
mod tweet_repo;
mod tweet_source;
mod user_repo;

pub use repository_error::*;
pub use tweet_repo::*;
pub use tweet_source::*;
pub use user_repo::*;
