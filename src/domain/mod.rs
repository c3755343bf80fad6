pub mod error;
pub mod range;
pub mod summary;
pub mod transaction;
