//! Command-line interface for finbook
//!
//! Uses clap for argument parsing and a structured command pattern: each
//! command pairs an Args struct with a Command struct owning the execution.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

use crate::data_paths::{DataPaths, DEFAULT_DATA_DIR};
use crate::logging;

use commands::client::{ClientArgs, ClientCommand};
use commands::dashboard::{DashboardArgs, DashboardCommand};
use commands::expense::{ExpenseArgs, ExpenseCommand};
use commands::income::{IncomeArgs, IncomeCommand};
use commands::report::{ReportArgs, ReportCommand};

#[derive(Parser)]
#[command(name = "finbook")]
#[command(version)]
#[command(about = "Bookkeeping CLI for a freelance video business", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory path (default: ./data)
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage clients
    Client(ClientArgs),

    /// Record and browse income entries ("Entradas")
    Income(IncomeArgs),

    /// Record and browse expenses ("Saídas")
    Expense(ExpenseArgs),

    /// Show the overall financial picture
    Dashboard(DashboardArgs),

    /// Aggregate a date range and optionally export it as CSV
    Report(ReportArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let data_paths = DataPaths::new(&self.data_dir);

        // Ensure all directories exist
        data_paths.ensure_directories()?;

        logging::init_logging(&data_paths, self.verbose)?;

        match self.command {
            Commands::Client(args) => ClientCommand::new(args).execute(data_paths).await,
            Commands::Income(args) => IncomeCommand::new(args).execute(data_paths).await,
            Commands::Expense(args) => ExpenseCommand::new(args).execute(data_paths).await,
            Commands::Dashboard(args) => DashboardCommand::new(args).execute(data_paths).await,
            Commands::Report(args) => ReportCommand::new(args).execute(data_paths).await,
        }
    }
}
