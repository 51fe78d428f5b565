use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::builder::PossibleValuesParser;
use clap::{Args, Subcommand};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use rust_decimal::Decimal;

use super::{format_brl, remove_transaction};
use crate::data_paths::DataPaths;
use crate::ledger::store::{LedgerError, LedgerStore};
use crate::ledger::types::{TransactionDraft, TransactionKind, EXPENSE_CATEGORIES};

#[derive(Args)]
pub struct ExpenseArgs {
    #[command(subcommand)]
    pub command: ExpenseSubcommand,
}

#[derive(Subcommand)]
pub enum ExpenseSubcommand {
    /// Record an expense entry
    Add(AddExpenseArgs),

    /// List expense entries
    List(ListExpenseArgs),

    /// Remove an expense entry by id
    Remove(RemoveExpenseArgs),
}

#[derive(Args)]
pub struct AddExpenseArgs {
    /// Short description of the expense
    pub description: String,

    /// Amount spent
    #[arg(long)]
    pub amount: Decimal,

    /// Expense category
    #[arg(long, default_value = "Outros", value_parser = PossibleValuesParser::new(EXPENSE_CATEGORIES.iter().copied()))]
    pub category: String,

    /// Transaction date (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Supplier/client id or exact name
    #[arg(long)]
    pub client: Option<String>,

    /// An invoice (nota fiscal) was issued
    #[arg(long)]
    pub invoice: bool,

    /// Free-form notes
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Args)]
pub struct ListExpenseArgs {
    /// Filter by description or client name substring
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct RemoveExpenseArgs {
    /// Expense entry id
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

pub struct ExpenseCommand {
    args: ExpenseArgs,
}

impl ExpenseCommand {
    pub fn new(args: ExpenseArgs) -> Self {
        Self { args }
    }

    pub async fn execute(self, data_paths: DataPaths) -> Result<()> {
        let mut store = LedgerStore::open(&data_paths).await?;

        match self.args.command {
            ExpenseSubcommand::Add(args) => add_expense(&mut store, args).await,
            ExpenseSubcommand::List(args) => list_expenses(&store, args),
            ExpenseSubcommand::Remove(args) => {
                remove_transaction(&mut store, &args.id, args.yes, TransactionKind::Expense).await
            }
        }
    }
}

async fn add_expense(store: &mut LedgerStore, args: AddExpenseArgs) -> Result<()> {
    let client_id = match &args.client {
        Some(reference) => store
            .resolve_client(reference)
            .map(|c| c.id.clone())
            .ok_or_else(|| LedgerError::ClientNotFound(reference.clone()))?,
        None => String::new(),
    };

    let tx = store
        .add_transaction(TransactionDraft {
            date: args.date.unwrap_or_else(|| Local::now().date_naive()),
            description: args.description,
            amount: args.amount,
            client_id,
            has_invoice: args.invoice,
            gross_amount: Decimal::ZERO,
            taxes: Decimal::ZERO,
            commission: Decimal::ZERO,
            category: args.category,
            notes: args.notes,
            kind: TransactionKind::Expense,
        })
        .await?;

    println!(
        "✅ Saída registered: {} — {} ({}) (id {})",
        tx.description,
        format_brl(tx.amount),
        tx.category,
        tx.id
    );
    Ok(())
}

fn list_expenses(store: &LedgerStore, args: ListExpenseArgs) -> Result<()> {
    let expenses: Vec<_> = store
        .transactions()
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
        .collect();

    let filtered: Vec<_> = expenses
        .iter()
        .filter(|t| match &args.search {
            Some(term) => t.matches_search(term, store.client_name(&t.client_id)),
            None => true,
        })
        .collect();

    if filtered.is_empty() {
        if expenses.is_empty() {
            println!("Nenhuma saída registrada. Adicione uma nova saída para começar.");
        } else {
            println!("Nenhuma saída encontrada com os termos da busca.");
        }
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Id",
            "Data",
            "Descrição",
            "Categoria",
            "Cliente",
            "Nota Fiscal",
            "Valor",
        ]);

    for t in &filtered {
        table.add_row(vec![
            t.id.clone(),
            t.date.format("%d/%m/%Y").to_string(),
            t.description.clone(),
            t.category.clone(),
            store.client_name(&t.client_id).unwrap_or("N/A").to_string(),
            if t.has_invoice { "Sim" } else { "Não" }.to_string(),
            format_brl(t.amount),
        ]);
    }

    println!("{table}");
    println!("{} entry(ies)", filtered.len());
    Ok(())
}
