pub mod cli;
pub mod data_paths;
pub mod ledger;
pub mod logging;
