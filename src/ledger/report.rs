//! Aggregation over ledger transactions
//!
//! Everything here is a pure function over a transaction slice; callers pick
//! the slice (usually a date-filtered one) and the store stays untouched.

use chrono::{Duration, Months, NaiveDate};
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::ledger::types::{Transaction, TransactionKind};

/// Inclusive calendar-day range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Symbolic reporting period ending today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Quarter,
    Year,
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "quarter" => Ok(Period::Quarter),
            "year" => Ok(Period::Year),
            other => Err(format!(
                "unknown period '{}' (expected week, month, quarter or year)",
                other
            )),
        }
    }
}

impl Period {
    /// Resolve to a concrete range ending on `today`. Month-based periods
    /// step back whole calendar months, clamping to the last valid day.
    pub fn resolve(self, today: NaiveDate) -> DateRange {
        let start = match self {
            Period::Week => today - Duration::days(7),
            Period::Month => today.checked_sub_months(Months::new(1)).unwrap_or(today),
            Period::Quarter => today.checked_sub_months(Months::new(3)).unwrap_or(today),
            Period::Year => today.checked_sub_months(Months::new(12)).unwrap_or(today),
        };

        DateRange { start, end: today }
    }
}

/// Keep only transactions dated within the range, both ends inclusive
pub fn filter_by_date_range(transactions: &[Transaction], range: &DateRange) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.date >= range.start && t.date <= range.end)
        .cloned()
        .collect()
}

/// Sum of net amounts for one transaction kind
pub fn sum_by_kind(transactions: &[Transaction], kind: TransactionKind) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

/// Income minus expenses
pub fn net_profit(transactions: &[Transaction]) -> Decimal {
    sum_by_kind(transactions, TransactionKind::Income)
        - sum_by_kind(transactions, TransactionKind::Expense)
}

/// Split income into (invoiced, non-invoiced) totals
pub fn invoiced_split(transactions: &[Transaction]) -> (Decimal, Decimal) {
    let mut invoiced = Decimal::ZERO;
    let mut non_invoiced = Decimal::ZERO;

    for t in transactions.iter().filter(|t| t.kind == TransactionKind::Income) {
        if t.has_invoice {
            invoiced += t.amount;
        } else {
            non_invoiced += t.amount;
        }
    }

    (invoiced, non_invoiced)
}

/// Sum amounts per key, keeping the order keys were first seen in
pub fn group_sum<F>(transactions: &[Transaction], key: F) -> Vec<(String, Decimal)>
where
    F: Fn(&Transaction) -> String,
{
    let mut groups: Vec<(String, Decimal)> = Vec::new();

    for t in transactions {
        let k = key(t);
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, total)) => *total += t.amount,
            None => groups.push((k, t.amount)),
        }
    }

    groups
}

/// Expense totals grouped by category
pub fn expenses_by_category(transactions: &[Transaction]) -> Vec<(String, Decimal)> {
    let expenses: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
        .cloned()
        .collect();

    group_sum(&expenses, |t| t.category.clone())
}

/// Income totals grouped by client id (empty key for unassigned income)
pub fn income_by_client(transactions: &[Transaction]) -> Vec<(String, Decimal)> {
    let income: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Income)
        .cloned()
        .collect();

    group_sum(&income, |t| t.client_id.clone())
}

/// Sort groups by total, largest first. Ties keep the grouping order.
pub fn sorted_desc(mut groups: Vec<(String, Decimal)>) -> Vec<(String, Decimal)> {
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups
}

/// Whole-number percentage of `part` in `whole`; 0 whenever `whole` is zero
pub fn percentage(part: Decimal, whole: Decimal) -> i64 {
    if whole.is_zero() {
        return 0;
    }

    ((part / whole) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Aggregate totals over one transaction slice
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    /// Sum of gross amounts across income entries
    pub gross_revenue: Decimal,
    pub total_taxes: Decimal,
    pub total_commission: Decimal,
    pub invoiced_income: Decimal,
    pub non_invoiced_income: Decimal,
}

impl ReportSummary {
    pub fn compute(transactions: &[Transaction]) -> Self {
        let total_income = sum_by_kind(transactions, TransactionKind::Income);
        let total_expenses = sum_by_kind(transactions, TransactionKind::Expense);
        let (invoiced_income, non_invoiced_income) = invoiced_split(transactions);

        let income = || {
            transactions
                .iter()
                .filter(|t| t.kind == TransactionKind::Income)
        };
        let gross_revenue = income().map(|t| t.gross_amount).sum();
        let total_taxes = income().map(|t| t.taxes).sum();
        let total_commission = income().map(|t| t.commission).sum();

        Self {
            total_income,
            total_expenses,
            net_profit: total_income - total_expenses,
            gross_revenue,
            total_taxes,
            total_commission,
            invoiced_income,
            non_invoiced_income,
        }
    }

    /// Net profit as a percentage of total income
    pub fn profit_margin(&self) -> i64 {
        percentage(self.net_profit, self.total_income)
    }

    /// Taxes as a percentage of total income. The established report labels
    /// this "da receita bruta" but computes it over net income; the label
    /// and the base are both kept as-is.
    pub fn taxes_share(&self) -> i64 {
        percentage(self.total_taxes, self.total_income)
    }

    /// Commission as a percentage of total income, same base as `taxes_share`
    pub fn commission_share(&self) -> i64 {
        percentage(self.total_commission, self.total_income)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tx(
        id: &str,
        date: &str,
        amount: Decimal,
        kind: TransactionKind,
        has_invoice: bool,
    ) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: date.parse().unwrap(),
            description: format!("tx {}", id),
            amount,
            client_id: String::new(),
            has_invoice,
            gross_amount: amount,
            taxes: Decimal::ZERO,
            commission: Decimal::ZERO,
            category: String::new(),
            notes: String::new(),
            kind,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("1", "2025-01-10", dec!(1000), TransactionKind::Income, true),
            tx("2", "2025-01-15", dec!(500), TransactionKind::Income, false),
            tx("3", "2025-01-20", dec!(300), TransactionKind::Expense, false),
        ]
    }

    #[test]
    fn test_sum_by_kind() {
        let txs = sample();
        assert_eq!(sum_by_kind(&txs, TransactionKind::Income), dec!(1500));
        assert_eq!(sum_by_kind(&txs, TransactionKind::Expense), dec!(300));
    }

    #[test]
    fn test_net_profit_identity() {
        let txs = sample();
        assert_eq!(
            net_profit(&txs),
            sum_by_kind(&txs, TransactionKind::Income)
                - sum_by_kind(&txs, TransactionKind::Expense)
        );
        assert_eq!(net_profit(&txs), dec!(1200));
    }

    #[test]
    fn test_invoiced_split_covers_all_income() {
        let txs = sample();
        let (invoiced, non_invoiced) = invoiced_split(&txs);
        assert_eq!(invoiced, dec!(1000));
        assert_eq!(non_invoiced, dec!(500));
        assert_eq!(
            invoiced + non_invoiced,
            sum_by_kind(&txs, TransactionKind::Income)
        );
    }

    #[test]
    fn test_date_range_bounds_are_inclusive() {
        let txs = sample();
        let range = DateRange {
            start: "2025-01-10".parse().unwrap(),
            end: "2025-01-15".parse().unwrap(),
        };

        let filtered = filter_by_date_range(&txs, &range);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].id, "1");
        assert_eq!(filtered[1].id, "2");

        // One day before the end excludes the boundary entry
        let shorter = DateRange {
            start: range.start,
            end: "2025-01-14".parse().unwrap(),
        };
        assert_eq!(filter_by_date_range(&txs, &shorter).len(), 1);
    }

    #[test]
    fn test_group_sum_preserves_first_seen_order() {
        let txs = vec![
            {
                let mut t = tx("1", "2025-01-01", dec!(200), TransactionKind::Expense, false);
                t.category = "Software".to_string();
                t
            },
            {
                let mut t = tx("2", "2025-01-02", dec!(100), TransactionKind::Expense, false);
                t.category = "Transporte".to_string();
                t
            },
            {
                let mut t = tx("3", "2025-01-03", dec!(300), TransactionKind::Expense, false);
                t.category = "Software".to_string();
                t
            },
        ];

        let groups = expenses_by_category(&txs);
        assert_eq!(
            groups,
            vec![
                ("Software".to_string(), dec!(500)),
                ("Transporte".to_string(), dec!(100)),
            ]
        );

        let sorted = sorted_desc(groups);
        assert_eq!(sorted[0].0, "Software");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(dec!(850), dec!(1000)), 85);
        assert_eq!(percentage(dec!(1), dec!(3)), 33);
        assert_eq!(percentage(dec!(2), dec!(3)), 67);
        assert_eq!(percentage(dec!(500), Decimal::ZERO), 0);
        assert_eq!(percentage(Decimal::ZERO, Decimal::ZERO), 0);
    }

    #[test]
    fn test_period_resolution_is_calendar_aware() {
        let today: NaiveDate = "2025-03-31".parse().unwrap();

        let week = Period::Week.resolve(today);
        assert_eq!(week.start, "2025-03-24".parse::<NaiveDate>().unwrap());
        assert_eq!(week.end, today);

        // One calendar month back from Mar 31 clamps to Feb 28
        let month = Period::Month.resolve(today);
        assert_eq!(month.start, "2025-02-28".parse::<NaiveDate>().unwrap());

        let quarter = Period::Quarter.resolve(today);
        assert_eq!(quarter.start, "2024-12-31".parse::<NaiveDate>().unwrap());

        let year = Period::Year.resolve(today);
        assert_eq!(year.start, "2024-03-31".parse::<NaiveDate>().unwrap());
    }

    #[test]
    fn test_period_from_str() {
        assert_eq!("month".parse::<Period>().unwrap(), Period::Month);
        assert_eq!("WEEK".parse::<Period>().unwrap(), Period::Week);
        assert!("fortnight".parse::<Period>().is_err());
    }

    #[test]
    fn test_report_summary() {
        let mut txs = sample();
        txs[0].gross_amount = dec!(1200);
        txs[0].taxes = dec!(150);
        txs[0].commission = dec!(50);

        let summary = ReportSummary::compute(&txs);
        assert_eq!(summary.total_income, dec!(1500));
        assert_eq!(summary.total_expenses, dec!(300));
        assert_eq!(summary.net_profit, dec!(1200));
        assert_eq!(summary.gross_revenue, dec!(1700));
        assert_eq!(summary.total_taxes, dec!(150));
        assert_eq!(summary.total_commission, dec!(50));
        assert_eq!(summary.profit_margin(), 80);

        // Deduction shares are relative to net income, not gross revenue
        assert_eq!(summary.taxes_share(), 10);
        assert_eq!(summary.commission_share(), 3);
    }

    #[test]
    fn test_report_summary_empty() {
        let summary = ReportSummary::compute(&[]);
        assert_eq!(summary.total_income, Decimal::ZERO);
        assert_eq!(summary.net_profit, Decimal::ZERO);
        assert_eq!(summary.profit_margin(), 0);
    }
}
