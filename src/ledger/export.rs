//! CSV rendering for report export
//!
//! The output reproduces the established report layout byte for byte:
//! pt-BR column names, dd/mm/yyyy dates, comma decimal separators, and
//! quoting on exactly the description and client columns. A generic CSV
//! writer will not produce this shape, so rows are formatted by hand.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::ledger::report::DateRange;
use crate::ledger::types::{Client, Transaction};

pub const CSV_HEADER: &str =
    "Data,Tipo,Descrição,Cliente,Nota Fiscal,Valor Bruto,Impostos,Comissão,Valor Líquido,Categoria";

/// Render transactions as a CSV document, every row newline-terminated.
/// The exporter only produces the text; writing it anywhere is the
/// caller's business.
pub fn render_csv(transactions: &[Transaction], clients: &[Client]) -> String {
    let mut csv = String::new();
    csv.push_str(CSV_HEADER);
    csv.push('\n');

    for t in transactions {
        let client_field = clients
            .iter()
            .find(|c| c.id == t.client_id)
            .map(|c| quote(&c.name))
            .unwrap_or_default();

        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            t.date.format("%d/%m/%Y"),
            t.kind,
            quote(&t.description),
            client_field,
            if t.has_invoice { "Sim" } else { "Não" },
            format_money(t.gross_amount),
            format_money(t.taxes),
            format_money(t.commission),
            format_money(t.amount),
            t.category,
        ));
    }

    csv
}

/// Two decimal places with a comma separator ("1234,50").
/// Midpoints round away from zero, so 0,555 becomes 0,56.
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded).replace('.', ",")
}

/// Conventional download name for an exported range
pub fn export_file_name(range: &DateRange) -> String {
    format!("relatorio_financeiro_{}_a_{}.csv", range.start, range.end)
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::TransactionKind;
    use rust_decimal_macros::dec;

    fn client() -> Client {
        Client {
            id: "10".to_string(),
            name: "Acme Studios".to_string(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            address: String::new(),
        }
    }

    fn income() -> Transaction {
        Transaction {
            id: "1".to_string(),
            date: "2025-03-05".parse().unwrap(),
            description: "Filmagem institucional".to_string(),
            amount: dec!(850),
            client_id: "10".to_string(),
            has_invoice: true,
            gross_amount: dec!(1000),
            taxes: dec!(100),
            commission: dec!(50),
            category: String::new(),
            notes: String::new(),
            kind: TransactionKind::Income,
        }
    }

    #[test]
    fn test_header_row() {
        let csv = render_csv(&[], &[]);
        assert_eq!(
            csv,
            "Data,Tipo,Descrição,Cliente,Nota Fiscal,Valor Bruto,Impostos,Comissão,Valor Líquido,Categoria\n"
        );
    }

    #[test]
    fn test_every_row_is_newline_terminated() {
        let csv = render_csv(&[income()], &[client()]);
        assert!(csv.ends_with('\n'));
        assert_eq!(csv.matches('\n').count(), 2);
    }

    #[test]
    fn test_income_row() {
        let csv = render_csv(&[income()], &[client()]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "05/03/2025,Entrada,\"Filmagem institucional\",\"Acme Studios\",Sim,1000,00,100,00,50,00,850,00,"
        );
    }

    #[test]
    fn test_expense_row_with_unresolved_client() {
        let mut t = income();
        t.kind = TransactionKind::Expense;
        t.client_id = "missing".to_string();
        t.has_invoice = false;
        t.amount = dec!(120.5);
        t.gross_amount = dec!(120.5);
        t.taxes = Decimal::ZERO;
        t.commission = Decimal::ZERO;
        t.category = "Software".to_string();

        let csv = render_csv(&[t], &[client()]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "05/03/2025,Saída,\"Filmagem institucional\",,Não,120,50,0,00,0,00,120,50,Software"
        );
    }

    #[test]
    fn test_quotes_are_doubled() {
        let mut t = income();
        t.description = "He said \"hi\"".to_string();

        let csv = render_csv(&[t], &[]);
        assert!(csv.contains("\"He said \"\"hi\"\"\""));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(1234.5)), "1234,50");
        assert_eq!(format_money(Decimal::ZERO), "0,00");
    }

    #[test]
    fn test_format_money_rounds_midpoints_up() {
        assert_eq!(format_money(dec!(0.555)), "0,56");
        assert_eq!(format_money(dec!(2.345)), "2,35");
        assert_eq!(format_money(dec!(1.005)), "1,01");
    }

    #[test]
    fn test_export_file_name() {
        let range = DateRange {
            start: "2025-01-01".parse().unwrap(),
            end: "2025-01-31".parse().unwrap(),
        };
        assert_eq!(
            export_file_name(&range),
            "relatorio_financeiro_2025-01-01_a_2025-01-31.csv"
        );
    }
}
