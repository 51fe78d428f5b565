use anyhow::Result;
use clap::Args;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;

use super::format_brl;
use crate::data_paths::DataPaths;
use crate::ledger::report::{percentage, ReportSummary};
use crate::ledger::store::LedgerStore;
use crate::ledger::types::TransactionKind;

#[derive(Args)]
pub struct DashboardArgs {
    /// Number of recent transactions to show
    #[arg(long, default_value = "5")]
    pub recent: usize,
}

pub struct DashboardCommand {
    args: DashboardArgs,
}

impl DashboardCommand {
    pub fn new(args: DashboardArgs) -> Self {
        Self { args }
    }

    pub async fn execute(self, data_paths: DataPaths) -> Result<()> {
        let store = LedgerStore::open(&data_paths).await?;
        let summary = ReportSummary::compute(store.transactions());

        println!("\n{}", "📊 Visão Geral".bold());
        println!(
            "  Total de Entradas:  {}",
            format_brl(summary.total_income).green()
        );
        println!(
            "  Total de Saídas:    {}",
            format_brl(summary.total_expenses).red()
        );
        let profit = format_brl(summary.net_profit);
        if summary.net_profit.is_sign_negative() {
            println!("  Lucro Líquido:      {}", profit.red().bold());
        } else {
            println!("  Lucro Líquido:      {}", profit.green().bold());
        }
        println!("  Clientes:           {}", store.clients().len());

        println!("\n{}", "🧾 Nota Fiscal".bold());
        println!(
            "  Com nota:  {} ({}%)",
            format_brl(summary.invoiced_income),
            percentage(summary.invoiced_income, summary.total_income)
        );
        println!(
            "  Sem nota:  {} ({}%)",
            format_brl(summary.non_invoiced_income),
            percentage(summary.non_invoiced_income, summary.total_income)
        );

        let mut recent: Vec<_> = store.transactions().to_vec();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent.truncate(self.args.recent);

        if !recent.is_empty() {
            println!("\n{}", "🕑 Transações Recentes".bold());

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Data", "Descrição", "Cliente", "Tipo", "Valor"]);

            for t in &recent {
                let signed = match t.kind {
                    TransactionKind::Income => format!("+{}", format_brl(t.amount)),
                    TransactionKind::Expense => format!("-{}", format_brl(t.amount)),
                };
                table.add_row(vec![
                    t.date.format("%d/%m/%Y").to_string(),
                    t.description.clone(),
                    store
                        .client_name(&t.client_id)
                        .unwrap_or("Sem cliente")
                        .to_string(),
                    t.kind.to_string(),
                    signed,
                ]);
            }

            println!("{table}");
        }

        Ok(())
    }
}
