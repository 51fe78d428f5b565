use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use rust_decimal::Decimal;

use super::{format_brl, remove_transaction};
use crate::data_paths::DataPaths;
use crate::ledger::store::{LedgerError, LedgerStore};
use crate::ledger::types::{TransactionDraft, TransactionKind};

#[derive(Args)]
pub struct IncomeArgs {
    #[command(subcommand)]
    pub command: IncomeSubcommand,
}

#[derive(Subcommand)]
pub enum IncomeSubcommand {
    /// Record an income entry; the net amount is derived from gross,
    /// taxes and commission
    Add(AddIncomeArgs),

    /// List income entries
    List(ListIncomeArgs),

    /// Remove an income entry by id
    Remove(RemoveIncomeArgs),
}

#[derive(Args)]
pub struct AddIncomeArgs {
    /// Short description of the work
    pub description: String,

    /// Gross amount invoiced
    #[arg(long)]
    pub gross: Decimal,

    /// Taxes withheld
    #[arg(long, default_value = "0")]
    pub taxes: Decimal,

    /// Commission paid out
    #[arg(long, default_value = "0")]
    pub commission: Decimal,

    /// Transaction date (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Client id or exact name
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
pub struct ListIncomeArgs {
    /// Filter by description or client name substring
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct RemoveIncomeArgs {
    /// Income entry id
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

pub struct IncomeCommand {
    args: IncomeArgs,
}

impl IncomeCommand {
    pub fn new(args: IncomeArgs) -> Self {
        Self { args }
    }

    pub async fn execute(self, data_paths: DataPaths) -> Result<()> {
        let mut store = LedgerStore::open(&data_paths).await?;

        match self.args.command {
            IncomeSubcommand::Add(args) => add_income(&mut store, args).await,
            IncomeSubcommand::List(args) => list_income(&store, args),
            IncomeSubcommand::Remove(args) => {
                remove_transaction(&mut store, &args.id, args.yes, TransactionKind::Income).await
            }
        }
    }
}

async fn add_income(store: &mut LedgerStore, args: AddIncomeArgs) -> Result<()> {
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
            amount: Decimal::ZERO,
            client_id,
            has_invoice: args.invoice,
            gross_amount: args.gross,
            taxes: args.taxes,
            commission: args.commission,
            category: String::new(),
            notes: args.notes,
            kind: TransactionKind::Income,
        })
        .await?;

    println!(
        "✅ Entrada registered: {} — net {} (id {})",
        tx.description,
        format_brl(tx.amount),
        tx.id
    );
    Ok(())
}

fn list_income(store: &LedgerStore, args: ListIncomeArgs) -> Result<()> {
    let income: Vec<_> = store
        .transactions()
        .iter()
        .filter(|t| t.kind == TransactionKind::Income)
        .collect();

    let filtered: Vec<_> = income
        .iter()
        .filter(|t| match &args.search {
            Some(term) => t.matches_search(term, store.client_name(&t.client_id)),
            None => true,
        })
        .collect();

    if filtered.is_empty() {
        if income.is_empty() {
            println!("Nenhuma entrada registrada. Adicione uma nova entrada para começar.");
        } else {
            println!("Nenhuma entrada encontrada com os termos da busca.");
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
            "Cliente",
            "Nota Fiscal",
            "Valor Bruto",
            "Impostos",
            "Comissão",
            "Valor Líquido",
        ]);

    for t in &filtered {
        table.add_row(vec![
            t.id.clone(),
            t.date.format("%d/%m/%Y").to_string(),
            t.description.clone(),
            store.client_name(&t.client_id).unwrap_or("N/A").to_string(),
            if t.has_invoice { "Sim" } else { "Não" }.to_string(),
            format_brl(t.gross_amount),
            format_brl(t.taxes),
            format_brl(t.commission),
            format_brl(t.amount),
        ]);
    }

    println!("{table}");
    println!("{} entry(ies)", filtered.len());
    Ok(())
}
