//! CLI command implementations
//!
//! Each command follows the same pattern: a clap Args struct plus a Command
//! struct with an async `execute` taking the resolved data paths.

pub mod client;
pub mod dashboard;
pub mod expense;
pub mod income;
pub mod report;

use anyhow::Result;
use rust_decimal::Decimal;

use crate::ledger::export::format_money;
use crate::ledger::store::LedgerStore;
use crate::ledger::types::TransactionKind;

/// Currency display used across all command output
pub(crate) fn format_brl(value: Decimal) -> String {
    format!("R$ {}", format_money(value))
}

/// Ask for a yes/no confirmation on stdin
pub(crate) fn confirm(prompt: &str) -> Result<bool> {
    use std::io::Write;

    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(
        line.trim(),
        "y" | "Y" | "yes" | "Yes" | "s" | "S" | "sim" | "Sim"
    ))
}

/// Shared removal flow for income and expense entries. Looks the id up among
/// entries of the given kind; an unknown id reports and exits cleanly.
pub(crate) async fn remove_transaction(
    store: &mut LedgerStore,
    id: &str,
    skip_confirmation: bool,
    kind: TransactionKind,
) -> Result<()> {
    let found = store
        .transactions()
        .iter()
        .find(|t| t.id == id && t.kind == kind)
        .map(|t| t.description.clone());

    let Some(description) = found else {
        println!("⚠️  No {} with id '{}', nothing removed", kind, id);
        return Ok(());
    };

    if !skip_confirmation && !confirm(&format!("Remove '{}' ({})?", description, id))? {
        println!("Cancelled");
        return Ok(());
    }

    store.delete_transaction(id).await?;
    println!("🗑️  Removed {} '{}' ({})", kind, description, id);
    Ok(())
}
