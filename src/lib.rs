pub mod args;
pub mod database;
pub mod model;
pub mod sync;
pub mod utils;
