use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tokio::fs;

use super::format_brl;
use crate::data_paths::DataPaths;
use crate::ledger::export::{export_file_name, render_csv};
use crate::ledger::report::{
    expenses_by_category, filter_by_date_range, income_by_client, percentage, sorted_desc,
    DateRange, Period, ReportSummary,
};
use crate::ledger::store::LedgerStore;

#[derive(Args)]
pub struct ReportArgs {
    /// Symbolic period ending today (week, month, quarter, year)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub period: Option<Period>,

    /// Range start (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Range end (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,

    /// Write the report as CSV. Without a value the file lands under
    /// <data>/exports with the conventional name; a directory value gets
    /// the conventional name inside it.
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub export: Option<PathBuf>,
}

pub struct ReportCommand {
    args: ReportArgs,
}

impl ReportCommand {
    pub fn new(args: ReportArgs) -> Self {
        Self { args }
    }

    pub async fn execute(self, data_paths: DataPaths) -> Result<()> {
        let range = match (self.args.period, self.args.from, self.args.to) {
            (_, Some(from), Some(to)) => {
                if from > to {
                    bail!("Range start {} is after end {}", from, to);
                }
                DateRange {
                    start: from,
                    end: to,
                }
            }
            (period, _, _) => period
                .unwrap_or(Period::Month)
                .resolve(Local::now().date_naive()),
        };

        let store = LedgerStore::open(&data_paths).await?;
        let filtered = filter_by_date_range(store.transactions(), &range);
        let summary = ReportSummary::compute(&filtered);

        println!(
            "\n{} {} — {}",
            "📈 Relatório".bold(),
            range.start.format("%d/%m/%Y"),
            range.end.format("%d/%m/%Y")
        );
        println!("  Transações:        {}", filtered.len());
        println!(
            "  Total de Entradas: {}",
            format_brl(summary.total_income).green()
        );
        println!(
            "  Total de Saídas:   {}",
            format_brl(summary.total_expenses).red()
        );
        println!(
            "  Lucro Líquido:     {} (margem {}%)",
            format_brl(summary.net_profit).bold(),
            summary.profit_margin()
        );

        println!("\n{}", "💸 Deduções sobre a receita bruta".bold());
        println!(
            "  Receita Bruta: {}",
            format_brl(summary.gross_revenue)
        );
        println!(
            "  Impostos:      {} ({}% da receita bruta)",
            format_brl(summary.total_taxes),
            summary.taxes_share()
        );
        println!(
            "  Comissões:     {} ({}% da receita bruta)",
            format_brl(summary.total_commission),
            summary.commission_share()
        );

        println!("\n{}", "🧾 Nota Fiscal".bold());
        println!(
            "  Com nota: {} ({}%)",
            format_brl(summary.invoiced_income),
            percentage(summary.invoiced_income, summary.total_income)
        );
        println!(
            "  Sem nota: {} ({}%)",
            format_brl(summary.non_invoiced_income),
            percentage(summary.non_invoiced_income, summary.total_income)
        );

        let by_category = sorted_desc(expenses_by_category(&filtered));
        if !by_category.is_empty() {
            println!("\n{}", "📂 Saídas por Categoria".bold());
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Categoria", "Total", "%"]);
            for (category, total) in &by_category {
                table.add_row(vec![
                    category.clone(),
                    format_brl(*total),
                    format!("{}%", percentage(*total, summary.total_expenses)),
                ]);
            }
            println!("{table}");
        }

        let by_client = sorted_desc(income_by_client(&filtered));
        if !by_client.is_empty() {
            println!("\n{}", "👥 Entradas por Cliente".bold());
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Cliente", "Total", "%"]);
            for (client_id, total) in &by_client {
                table.add_row(vec![
                    store
                        .client_name(client_id)
                        .unwrap_or("Cliente Desconhecido")
                        .to_string(),
                    format_brl(*total),
                    format!("{}%", percentage(*total, summary.total_income)),
                ]);
            }
            println!("{table}");
        }

        if let Some(path) = self.args.export {
            let path = if path.as_os_str().is_empty() {
                data_paths.exports().join(export_file_name(&range))
            } else if path.is_dir() {
                path.join(export_file_name(&range))
            } else {
                path
            };

            fs::write(&path, render_csv(&filtered, store.clients()))
                .await
                .with_context(|| format!("Failed to write report to {}", path.display()))?;

            println!("\n📄 Report exported to {}", path.display());
        }

        Ok(())
    }
}
