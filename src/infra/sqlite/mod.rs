pub mod engine;
pub mod queries;
pub mod schema;
