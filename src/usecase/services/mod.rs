pub mod bootstrap_service;
pub mod browser_service;
pub mod filter_reader;
pub mod projection;
pub mod query_builder;
pub mod query_service;
pub mod reconcile;
pub mod session;
