pub mod constants;
pub mod decay;
pub mod error;
pub mod match_engine;
pub mod placement;
pub mod processor;
pub mod rating_store;
pub mod rating_utils;
pub mod replay;
pub mod structures;
