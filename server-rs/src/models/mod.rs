pub mod game;
pub mod location;
pub mod transaction;
pub mod user;

pub use game::*;
pub use location::*;
pub use transaction::*;
pub use user::*;
