//! In-memory ledger store backed by JSON files
//!
//! The store loads both collections once and keeps them in memory; every
//! mutation persists the whole collection before returning, so a command that
//! finishes successfully has its change on disk.

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

use crate::data_paths::DataPaths;
use crate::ledger::storage::LedgerStorage;
use crate::ledger::types::{Client, ClientDraft, Transaction, TransactionDraft};

/// Ledger lookup errors
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Client not found: {0}")]
    ClientNotFound(String),
}

pub struct LedgerStore {
    storage: LedgerStorage,
    clients: Vec<Client>,
    transactions: Vec<Transaction>,
    last_id: i64,
}

impl LedgerStore {
    /// Open the store under the data directory, loading both collections
    pub async fn open(data_paths: &DataPaths) -> Result<Self> {
        let storage = LedgerStorage::new(data_paths.ledger());
        storage.init().await?;

        let clients = storage.load_clients().await?;
        let transactions = storage.load_transactions().await?;

        info!(
            "Opened ledger with {} clients and {} transactions",
            clients.len(),
            transactions.len()
        );

        Ok(Self {
            storage,
            clients,
            transactions,
            last_id: 0,
        })
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn client_by_id(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Look up a client by id first, then by exact name
    pub fn resolve_client(&self, id_or_name: &str) -> Option<&Client> {
        self.client_by_id(id_or_name)
            .or_else(|| self.clients.iter().find(|c| c.name == id_or_name))
    }

    /// Resolved client name for a transaction's client id. A dangling or
    /// empty id is simply unresolved, never an error.
    pub fn client_name(&self, client_id: &str) -> Option<&str> {
        self.client_by_id(client_id).map(|c| c.name.as_str())
    }

    pub async fn add_client(&mut self, draft: ClientDraft) -> Result<Client> {
        let client = Client {
            id: self.next_id(),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            company: draft.company,
            address: draft.address,
        };

        self.clients.push(client.clone());
        self.storage.save_clients(&self.clients).await?;

        debug!(id = %client.id, "Added client");
        Ok(client)
    }

    /// Remove a client by id. An unknown id is a no-op (`Ok(false)`).
    /// Transactions referencing the client keep their client id.
    pub async fn delete_client(&mut self, id: &str) -> Result<bool> {
        let before = self.clients.len();
        self.clients.retain(|c| c.id != id);

        if self.clients.len() == before {
            debug!(id = %id, "Client not present, nothing to delete");
            return Ok(false);
        }

        self.storage.save_clients(&self.clients).await?;
        Ok(true)
    }

    pub async fn add_transaction(&mut self, draft: TransactionDraft) -> Result<Transaction> {
        let transaction = Transaction::from_draft(self.next_id(), draft);

        self.transactions.push(transaction.clone());
        self.storage.save_transactions(&self.transactions).await?;

        debug!(id = %transaction.id, kind = %transaction.kind, "Added transaction");
        Ok(transaction)
    }

    /// Remove a transaction by id. An unknown id is a no-op (`Ok(false)`).
    pub async fn delete_transaction(&mut self, id: &str) -> Result<bool> {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);

        if self.transactions.len() == before {
            debug!(id = %id, "Transaction not present, nothing to delete");
            return Ok(false);
        }

        self.storage.save_transactions(&self.transactions).await?;
        Ok(true)
    }

    /// Millisecond-clock id, bumped past the previous one so two mutations
    /// inside the same millisecond never collide.
    fn next_id(&mut self) -> String {
        let mut candidate = Utc::now().timestamp_millis();
        if candidate <= self.last_id {
            candidate = self.last_id + 1;
        }
        self.last_id = candidate;
        candidate.to_string()
    }
}
