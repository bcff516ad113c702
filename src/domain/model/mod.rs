mod identity;
mod pagination;
mod tweet;
mod user;

pub use identity::*;
pub use pagination::*;
pub use tweet::*;
pub use user::*;
