//! Type definitions for the bookkeeping ledger

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Suggested expense categories, as offered by the entry form.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Equipamentos",
    "Software",
    "Aluguel",
    "Serviços",
    "Salários",
    "Marketing",
    "Transporte",
    "Alimentação",
    "Impostos",
    "Outros",
];

/// A client of the business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub address: String,
}

impl Client {
    /// Check if the client matches a search term
    pub fn matches_search(&self, search: &str) -> bool {
        let search_lower = search.to_lowercase();

        self.name.to_lowercase().contains(&search_lower)
            || self.email.to_lowercase().contains(&search_lower)
            || self.company.to_lowercase().contains(&search_lower)
            || self.phone.to_lowercase().contains(&search_lower)
    }
}

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Income ("Entrada")
    Income,
    /// Expense ("Saída")
    Expense,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "Entrada"),
            TransactionKind::Expense => write!(f, "Saída"),
        }
    }
}

/// A single ledger entry.
///
/// The serialized field names and value shapes are the persisted format;
/// monetary fields are written as plain JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,

    /// Calendar day the money moved
    pub date: NaiveDate,

    pub description: String,

    /// Net amount. For income this is always gross − taxes − commission,
    /// floored at zero; for expenses it is the entered value.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Id of the associated client; empty when none. May dangle after the
    /// client is removed.
    #[serde(default)]
    pub client_id: String,

    /// Whether an invoice (nota fiscal) was issued
    pub has_invoice: bool,

    #[serde(with = "rust_decimal::serde::float")]
    pub gross_amount: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub taxes: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub commission: Decimal,

    /// Expense category; empty for income
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub notes: String,

    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

/// Input record for creating a client (everything but the id)
#[derive(Debug, Clone, Default)]
pub struct ClientDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: String,
}

/// Input record for creating a transaction (everything but the id)
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub client_id: String,
    pub has_invoice: bool,
    pub gross_amount: Decimal,
    pub taxes: Decimal,
    pub commission: Decimal,
    pub category: String,
    pub notes: String,
    pub kind: TransactionKind,
}

impl Transaction {
    /// Net income after deductions, never negative
    pub fn net_income_amount(gross: Decimal, taxes: Decimal, commission: Decimal) -> Decimal {
        (gross - taxes - commission).max(Decimal::ZERO)
    }

    /// Build a transaction from a draft, enforcing the income amount rule.
    /// The draft's `amount` is only honored for expenses.
    pub fn from_draft(id: String, draft: TransactionDraft) -> Self {
        let amount = match draft.kind {
            TransactionKind::Income => {
                Self::net_income_amount(draft.gross_amount, draft.taxes, draft.commission)
            }
            TransactionKind::Expense => draft.amount,
        };

        Self {
            id,
            date: draft.date,
            description: draft.description,
            amount,
            client_id: draft.client_id,
            has_invoice: draft.has_invoice,
            gross_amount: draft.gross_amount,
            taxes: draft.taxes,
            commission: draft.commission,
            category: draft.category,
            notes: draft.notes,
            kind: draft.kind,
        }
    }

    /// Check if the transaction matches a search term, looking at the
    /// description and the resolved client name (if any).
    pub fn matches_search(&self, search: &str, client_name: Option<&str>) -> bool {
        let search_lower = search.to_lowercase();

        if self.description.to_lowercase().contains(&search_lower) {
            return true;
        }

        if let Some(name) = client_name {
            if name.to_lowercase().contains(&search_lower) {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn income_draft() -> TransactionDraft {
        TransactionDraft {
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            description: "Filmagem institucional".to_string(),
            amount: Decimal::ZERO,
            client_id: "1700000000000".to_string(),
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
    fn test_net_income_amount() {
        assert_eq!(
            Transaction::net_income_amount(dec!(1000), dec!(100), dec!(50)),
            dec!(850)
        );
        assert_eq!(
            Transaction::net_income_amount(dec!(100), dec!(80), dec!(40)),
            Decimal::ZERO
        );
        assert_eq!(
            Transaction::net_income_amount(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_from_draft_income_ignores_entered_amount() {
        let mut draft = income_draft();
        draft.amount = dec!(9999);

        let tx = Transaction::from_draft("1".to_string(), draft);
        assert_eq!(tx.amount, dec!(850));
    }

    #[test]
    fn test_from_draft_expense_keeps_entered_amount() {
        let draft = TransactionDraft {
            amount: dec!(250),
            category: "Software".to_string(),
            kind: TransactionKind::Expense,
            gross_amount: Decimal::ZERO,
            taxes: Decimal::ZERO,
            commission: Decimal::ZERO,
            ..income_draft()
        };

        let tx = Transaction::from_draft("2".to_string(), draft);
        assert_eq!(tx.amount, dec!(250));
        assert_eq!(tx.category, "Software");
    }

    #[test]
    fn test_transaction_serialized_field_names() {
        let tx = Transaction::from_draft("1700000000001".to_string(), income_draft());
        let value = serde_json::to_value(&tx).unwrap();

        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("clientId"));
        assert!(obj.contains_key("hasInvoice"));
        assert!(obj.contains_key("grossAmount"));
        assert!(obj.contains_key("taxes"));
        assert!(obj.contains_key("commission"));
        assert_eq!(value["type"], "income");
        assert_eq!(value["date"], "2025-03-10");
        assert_eq!(value["amount"], 850.0);
    }

    #[test]
    fn test_transaction_roundtrip() {
        let tx = Transaction::from_draft("1700000000001".to_string(), income_draft());
        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, back);
    }

    #[test]
    fn test_matches_search() {
        let tx = Transaction::from_draft("1".to_string(), income_draft());

        assert!(tx.matches_search("filmagem", None));
        assert!(tx.matches_search("INSTITUCIONAL", None));
        assert!(tx.matches_search("acme", Some("Acme Studios")));
        assert!(!tx.matches_search("acme", None));
        assert!(!tx.matches_search("edição", Some("Acme Studios")));
    }

    #[test]
    fn test_client_matches_search() {
        let client = Client {
            id: "1".to_string(),
            name: "Acme Studios".to_string(),
            email: "contato@acme.com".to_string(),
            phone: String::new(),
            company: "Acme Ltda".to_string(),
            address: String::new(),
        };

        assert!(client.matches_search("acme"));
        assert!(client.matches_search("contato@"));
        assert!(!client.matches_search("globex"));
    }
}
