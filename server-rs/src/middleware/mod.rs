pub mod auth;
pub mod localization;
pub mod rate_limit;

pub use auth::*;
pub use localization::*;
pub use rate_limit::*;
