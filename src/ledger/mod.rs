//! Bookkeeping core: entities, persistence, aggregation and export

pub mod export;
pub mod report;
pub mod storage;
pub mod store;
pub mod types;
