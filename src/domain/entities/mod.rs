pub mod filter;
pub mod result;
pub mod schema;
