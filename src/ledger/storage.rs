//! Persistence layer for the ledger
//!
//! Each collection lives in its own JSON file and is rewritten wholesale on
//! every save. Writes go through a temp file and an atomic rename so a crash
//! mid-save leaves the previous state intact.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::ledger::types::{Client, Transaction};

const CLIENTS_FILE: &str = "clients.json";
const TRANSACTIONS_FILE: &str = "transactions.json";

/// Ledger storage manager
pub struct LedgerStorage {
    /// Base directory for ledger data
    base_dir: PathBuf,

    clients_path: PathBuf,
    transactions_path: PathBuf,
}

impl LedgerStorage {
    /// Create new storage manager
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let clients_path = base_dir.join(CLIENTS_FILE);
        let transactions_path = base_dir.join(TRANSACTIONS_FILE);

        Self {
            base_dir,
            clients_path,
            transactions_path,
        }
    }

    /// Initialize the storage directory
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .await
            .context("Failed to create ledger directory")?;

        debug!("Initialized ledger storage at: {:?}", self.base_dir);
        Ok(())
    }

    pub async fn load_clients(&self) -> Result<Vec<Client>> {
        self.load_collection(&self.clients_path, "clients").await
    }

    pub async fn load_transactions(&self) -> Result<Vec<Transaction>> {
        self.load_collection(&self.transactions_path, "transactions")
            .await
    }

    pub async fn save_clients(&self, clients: &[Client]) -> Result<()> {
        self.save_collection(&self.clients_path, clients, "clients")
            .await
    }

    pub async fn save_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        self.save_collection(&self.transactions_path, transactions, "transactions")
            .await
    }

    /// Load one collection. A missing file is a fresh ledger; a file that no
    /// longer parses is reported and treated as empty rather than blocking
    /// every command.
    async fn load_collection<T: DeserializeOwned>(&self, path: &Path, what: &str) -> Result<Vec<T>> {
        if !path.exists() {
            debug!("No {} file found, starting empty", what);
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {} file", what))?;

        match serde_json::from_str::<Vec<T>>(&content) {
            Ok(items) => {
                info!("Loaded {} {}", items.len(), what);
                Ok(items)
            }
            Err(e) => {
                warn!("Could not parse {} file, starting empty: {}", what, e);
                Ok(Vec::new())
            }
        }
    }

    async fn save_collection<T: Serialize>(&self, path: &Path, items: &[T], what: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(items)
            .with_context(|| format!("Failed to serialize {}", what))?;

        // Write to temporary file first
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, json)
            .await
            .with_context(|| format!("Failed to write temporary {} file", what))?;

        // Rename to final path (atomic operation)
        fs::rename(&temp_path, path)
            .await
            .with_context(|| format!("Failed to replace {} file", what))?;

        debug!("Saved {} {}", items.len(), what);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{TransactionDraft, TransactionKind};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sample_transaction(id: &str) -> Transaction {
        Transaction::from_draft(
            id.to_string(),
            TransactionDraft {
                date: "2025-02-01".parse().unwrap(),
                description: "Edição de vídeo".to_string(),
                amount: Decimal::ZERO,
                client_id: String::new(),
                has_invoice: false,
                gross_amount: dec!(500),
                taxes: dec!(25),
                commission: Decimal::ZERO,
                category: String::new(),
                notes: String::new(),
                kind: TransactionKind::Income,
            },
        )
    }

    #[tokio::test]
    async fn test_load_missing_files_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LedgerStorage::new(dir.path());
        storage.init().await.unwrap();

        assert!(storage.load_clients().await.unwrap().is_empty());
        assert!(storage.load_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_reload_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LedgerStorage::new(dir.path());
        storage.init().await.unwrap();

        let transactions = vec![sample_transaction("2"), sample_transaction("1")];
        storage.save_transactions(&transactions).await.unwrap();

        let loaded = storage.load_transactions().await.unwrap();
        assert_eq!(loaded, transactions);
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LedgerStorage::new(dir.path());
        storage.init().await.unwrap();

        tokio::fs::write(dir.path().join("transactions.json"), "{not json")
            .await
            .unwrap();

        assert!(storage.load_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LedgerStorage::new(dir.path());
        storage.init().await.unwrap();

        storage.save_clients(&[]).await.unwrap();

        assert!(dir.path().join("clients.json").exists());
        assert!(!dir.path().join("clients.tmp").exists());
    }
}
