pub mod cache;
pub mod export;
pub mod snapshot;
pub mod sqlite;
