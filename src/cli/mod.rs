mod commands;
pub mod error;
mod utils;


#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, CommandFactory, Parser, Subcommand};
use miette::IntoDiagnostic;

use crate::config::{ENV_CONFIG, Settings};
use crate::db::{AffectedRowsPolicy, Database, DeletePolicy, RecordId, SqliteDatabase};
use crate::logging::init_tracing;
use commands::asset::{AssetChanges, AssetFields};
use commands::campaign::{CampaignChanges, NewCampaign};
use commands::customer::{CustomerChanges, NewCustomer};
use commands::lead::{LeadChanges, LeadFields};
use error::{CliError, CliResult};

#[derive(Parser)]
#[command(name = "ledger")]
#[command(author, version, about = "Marketing operations record keeper", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Flags that override the configuration file and environment
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// YAML configuration file
    #[arg(long, global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Database file (default: $XDG_DATA_HOME/ledger/ledger.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Whether update/delete of a missing row is an error: lenient or strict
    #[arg(long, global = true, value_name = "POLICY")]
    pub affected_rows: Option<AffectedRowsPolicy>,

    /// Seconds to wait for the store before giving up
    #[arg(long, global = true, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// What deleting a campaign does to its leads
    #[arg(long, global = true, value_name = "POLICY")]
    pub on_delete: Option<DeletePolicy>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Resolve settings from file and environment, then apply these flags.
    pub fn settings(&self) -> CliResult<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        self.apply(&mut settings);
        Ok(settings)
    }

    pub fn apply(&self, settings: &mut Settings) {
        if let Some(db) = &self.db {
            settings.store.database = db.clone();
        }
        if let Some(policy) = self.affected_rows {
            settings.repository.affected_rows = policy;
        }
        if let Some(secs) = self.connect_timeout {
            settings.store.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(policy) = self.on_delete {
            settings.repository.delete_policy = policy;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database tables if they do not exist
    Init,
    /// Campaign management commands
    Campaign {
        #[command(subcommand)]
        command: CampaignCommands,
    },
    /// Customer management commands
    Customer {
        #[command(subcommand)]
        command: CustomerCommands,
    },
    /// Lead management commands
    Lead {
        #[command(subcommand)]
        command: LeadCommands,
    },
    /// Marketing asset commands
    Asset {
        #[command(subcommand)]
        command: AssetCommands,
    },
    /// Budget aggregates across all campaigns
    Insights {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
enum CampaignCommands {
    /// List campaigns
    List {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show a single campaign
    Get {
        id: RecordId,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Create a campaign
    Create(NewCampaign),
    /// Update a campaign
    Update {
        id: RecordId,
        #[command(flatten)]
        changes: CampaignChanges,
    },
    /// Delete a campaign
    Delete {
        id: RecordId,
        /// Required; deletion cannot be undone
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum CustomerCommands {
    /// List customers
    List {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show a single customer
    Get {
        id: RecordId,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Create a customer
    Create(NewCustomer),
    /// Update a customer
    Update {
        id: RecordId,
        #[command(flatten)]
        changes: CustomerChanges,
    },
    /// Delete a customer
    Delete {
        id: RecordId,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum LeadCommands {
    /// List leads
    List {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show a single lead
    Get {
        id: RecordId,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Create a lead
    Create(LeadFields),
    /// Update a lead
    Update {
        id: RecordId,
        #[command(flatten)]
        changes: LeadChanges,
    },
    /// Delete a lead
    Delete {
        id: RecordId,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum AssetCommands {
    /// List assets
    List {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show a single asset
    Get {
        id: RecordId,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Register an asset
    Create(AssetFields),
    /// Update an asset
    Update {
        id: RecordId,
        #[command(flatten)]
        changes: AssetChanges,
    },
    /// Delete an asset
    Delete {
        id: RecordId,
        #[arg(long)]
        force: bool,
    },
}

pub async fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let Some(command) = cli.command else {
        // Show help when no command provided
        Cli::command().print_help().into_diagnostic()?;
        return Ok(());
    };

    let settings = cli.global.settings()?;

    // Ensure parent directory exists
    if settings.store.create_if_missing {
        if let Some(parent) = settings.store.database.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CliError::DataDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let db = SqliteDatabase::from_settings(settings);
    let output = execute(&db, command).await?;
    println!("{}", output);
    Ok(())
}

/// Run one command against `db`, returning what to print.
///
/// Tables are created first, so every command works on a fresh database.
async fn execute<D: Database>(db: &D, command: Commands) -> CliResult<String> {
    db.ensure_schema().await?;

    match command {
        Commands::Init => Ok("✓ Database ready".to_string()),
        Commands::Campaign { command } => match command {
            CampaignCommands::List { format } => {
                commands::campaign::list_campaigns(db, &format).await
            }
            CampaignCommands::Get { id, format } => {
                commands::campaign::get_campaign(db, id, &format).await
            }
            CampaignCommands::Create(args) => {
                commands::campaign::create_campaign(db, args.into()).await
            }
            CampaignCommands::Update { id, changes } => {
                commands::campaign::update_campaign(db, id, changes).await
            }
            CampaignCommands::Delete { id, force } => {
                commands::campaign::delete_campaign(db, id, force).await
            }
        },
        Commands::Customer { command } => match command {
            CustomerCommands::List { format } => {
                commands::customer::list_customers(db, &format).await
            }
            CustomerCommands::Get { id, format } => {
                commands::customer::get_customer(db, id, &format).await
            }
            CustomerCommands::Create(args) => {
                commands::customer::create_customer(db, args.into()).await
            }
            CustomerCommands::Update { id, changes } => {
                commands::customer::update_customer(db, id, changes).await
            }
            CustomerCommands::Delete { id, force } => {
                commands::customer::delete_customer(db, id, force).await
            }
        },
        Commands::Lead { command } => match command {
            LeadCommands::List { format } => commands::lead::list_leads(db, &format).await,
            LeadCommands::Get { id, format } => commands::lead::get_lead(db, id, &format).await,
            LeadCommands::Create(fields) => commands::lead::create_lead(db, fields.into()).await,
            LeadCommands::Update { id, changes } => {
                commands::lead::update_lead(db, id, changes).await
            }
            LeadCommands::Delete { id, force } => {
                commands::lead::delete_lead(db, id, force).await
            }
        },
        Commands::Asset { command } => match command {
            AssetCommands::List { format } => commands::asset::list_assets(db, &format).await,
            AssetCommands::Get { id, format } => {
                commands::asset::get_asset(db, id, &format).await
            }
            AssetCommands::Create(fields) => {
                commands::asset::create_asset(db, fields.into()).await
            }
            AssetCommands::Update { id, changes } => {
                commands::asset::update_asset(db, id, changes).await
            }
            AssetCommands::Delete { id, force } => {
                commands::asset::delete_asset(db, id, force).await
            }
        },
        Commands::Insights { format } => commands::insights::show_insights(db, &format).await,
    }
}
