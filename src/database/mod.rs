pub mod config;
pub mod json_store;
pub mod memory_store;
pub mod store;
