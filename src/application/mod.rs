pub mod blog;
pub mod error;
pub mod records;
pub mod repos;
