use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use super::confirm;
use crate::data_paths::DataPaths;
use crate::ledger::store::LedgerStore;
use crate::ledger::types::ClientDraft;

#[derive(Args)]
pub struct ClientArgs {
    #[command(subcommand)]
    pub command: ClientSubcommand,
}

#[derive(Subcommand)]
pub enum ClientSubcommand {
    /// Register a new client
    Add(AddClientArgs),

    /// List registered clients
    List(ListClientArgs),

    /// Remove a client (their transactions are kept)
    Remove(RemoveClientArgs),
}

#[derive(Args)]
pub struct AddClientArgs {
    /// Client name
    pub name: String,

    /// Email address
    #[arg(long, default_value = "")]
    pub email: String,

    /// Phone number
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Company name
    #[arg(long, default_value = "")]
    pub company: String,

    /// Postal address
    #[arg(long, default_value = "")]
    pub address: String,
}

#[derive(Args)]
pub struct ListClientArgs {
    /// Filter by name, email, company or phone substring
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct RemoveClientArgs {
    /// Client id or exact name
    pub client: String,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

pub struct ClientCommand {
    args: ClientArgs,
}

impl ClientCommand {
    pub fn new(args: ClientArgs) -> Self {
        Self { args }
    }

    pub async fn execute(self, data_paths: DataPaths) -> Result<()> {
        let mut store = LedgerStore::open(&data_paths).await?;

        match self.args.command {
            ClientSubcommand::Add(args) => add_client(&mut store, args).await,
            ClientSubcommand::List(args) => list_clients(&store, args),
            ClientSubcommand::Remove(args) => remove_client(&mut store, args).await,
        }
    }
}

async fn add_client(store: &mut LedgerStore, args: AddClientArgs) -> Result<()> {
    let client = store
        .add_client(ClientDraft {
            name: args.name,
            email: args.email,
            phone: args.phone,
            company: args.company,
            address: args.address,
        })
        .await?;

    println!("✅ Client registered: {} (id {})", client.name, client.id);
    Ok(())
}

fn list_clients(store: &LedgerStore, args: ListClientArgs) -> Result<()> {
    let clients: Vec<_> = store
        .clients()
        .iter()
        .filter(|c| match &args.search {
            Some(term) => c.matches_search(term),
            None => true,
        })
        .collect();

    if clients.is_empty() {
        if store.clients().is_empty() {
            println!("Nenhum cliente cadastrado.");
        } else {
            println!("Nenhum cliente encontrado com os termos da busca.");
        }
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Id", "Nome", "Email", "Telefone", "Empresa"]);

    for client in &clients {
        table.add_row(vec![
            client.id.clone(),
            client.name.clone(),
            client.email.clone(),
            client.phone.clone(),
            client.company.clone(),
        ]);
    }

    println!("{table}");
    println!("{} client(s)", clients.len());
    Ok(())
}

async fn remove_client(store: &mut LedgerStore, args: RemoveClientArgs) -> Result<()> {
    let target = store
        .resolve_client(&args.client)
        .map(|c| (c.id.clone(), c.name.clone()));

    let Some((id, name)) = target else {
        println!("⚠️  No client matching '{}', nothing removed", args.client);
        return Ok(());
    };

    if !args.yes && !confirm(&format!("Remove client '{}'?", name))? {
        println!("Cancelled");
        return Ok(());
    }

    store.delete_client(&id).await?;
    println!("🗑️  Removed client {} ({})", name, id);
    Ok(())
}
