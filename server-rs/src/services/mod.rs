pub mod catalog;
pub mod connectivity;
pub mod location;
pub mod retry;
