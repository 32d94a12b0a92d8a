use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use sage_catalog::models::{CatalogRecord, CatalogSummary, Configuration};
use sage_catalog::observability::init_tracing;
use sage_catalog::services::{CatalogOrchestrator, PendingChangeStore, StoreError, WorkflowError};
use sage_catalog::session::{AccessToken, FileSession};
use sage_catalog::{ClientConfig, HttpCatalogApi};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

mod definition;

use definition::CatalogDefinition;

const EXIT_NOT_AUTHENTICATED: i32 = 2;

/// Define catalogs and manage homologation settings on a SAGE API.
#[derive(Parser, Debug)]
#[command(name = "sage-catalog", version)]
struct Cli {
    /// Base URL of the API (default: http://127.0.0.1:8000/api/).
    #[arg(long, env = "SAGE_API_URL")]
    api_url: Option<String>,

    /// File holding the session token. Without it the token is read from
    /// SAGE_ACCESS_TOKEN.
    #[arg(long, env = "SAGE_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// HTTP timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create or update a catalog from a YAML definition.
    Submit {
        definition: PathBuf,
        /// Write the identifiers assigned by the API back into the file.
        #[arg(long)]
        write_back: bool,
    },
    /// Show one catalog.
    Show { id: i64 },
    /// List catalogs.
    List {
        #[arg(long)]
        product_id: Option<i64>,
    },
    /// Delete a catalog (staff only).
    Delete { id: i64 },
    /// Write an existing catalog and its fields as a YAML definition.
    Export {
        id: i64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Store a token issued by the identity service in the token file.
    Login {
        #[arg(long)]
        token: String,
    },
    /// Remove the stored token.
    Logout,
    /// Homologation configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Show the saved configuration; passwords are redacted.
    Show,
    /// Stage `key=value` assignments and commit them together.
    Set {
        #[arg(required = true)]
        assignments: Vec<String>,
    },
    /// Flip a boolean setting and commit it.
    Toggle { key: String },
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            if is_not_authenticated(&e) {
                eprintln!("{}", e);
                eprintln!("Log in with: sage-catalog login --token <TOKEN>");
                process::exit(EXIT_NOT_AUTHENTICATED);
            }
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn is_not_authenticated(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<WorkflowError>(),
        Some(WorkflowError::NotAuthenticated)
    ) || matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::NotAuthenticated)
    )
}

fn client_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("Invalid client configuration")?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url).context("Invalid --api-url")?;
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if let Some(path) = &cli.token_file {
        config = config.with_token_file(path.clone());
    }
    debug!("Using API at {}", config.base_url);
    Ok(config)
}

async fn run(cli: Cli) -> Result<i32> {
    let config = client_config(&cli)?;
    let api = Arc::new(HttpCatalogApi::new(&config).context("Failed to create API client")?);
    let session = config.session_provider();
    let orchestrator = CatalogOrchestrator::new(api.clone(), session.clone());

    match &cli.command {
        Command::Submit {
            definition,
            write_back,
        } => {
            let mut loaded = CatalogDefinition::load(definition)?;
            let outcome = orchestrator
                .submit(&mut loaded.catalog, &mut loaded.fields)
                .await?;

            if *write_back && outcome.product_id.is_some() {
                loaded.save(definition)?;
            }

            if cli.json {
                print_json(&outcome)?;
            } else {
                if outcome.success {
                    println!(
                        "Catalog saved (catalog id {}, product id {})",
                        display_id(outcome.catalog_id),
                        display_id(outcome.product_id)
                    );
                } else {
                    println!("Catalog not saved");
                }
                for error in &outcome.errors {
                    println!("  - {}", error);
                }
            }
            Ok(if outcome.success { 0 } else { 1 })
        }
        Command::Show { id } => {
            let record = orchestrator.get_catalog(*id).await?;
            if cli.json {
                print_json(&record)?;
            } else {
                print_catalog(&record);
            }
            Ok(0)
        }
        Command::List { product_id } => {
            let catalogs = orchestrator.list_catalogs(*product_id).await?;
            if cli.json {
                print_json(&catalogs)?;
            } else {
                print_catalog_list(&catalogs);
            }
            Ok(0)
        }
        Command::Delete { id } => {
            orchestrator.delete_catalog(*id).await?;
            println!("Deleted catalog {}", id);
            Ok(0)
        }
        Command::Export { id, output } => {
            let (catalog, builder) = orchestrator.load_for_edit(*id).await?;
            let exported = CatalogDefinition {
                catalog,
                fields: builder.into_fields(),
            };
            match output {
                Some(path) => {
                    exported.save(path)?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{}", exported.to_yaml()?),
            }
            Ok(0)
        }
        Command::Login { token } => {
            let path = config
                .token_file
                .clone()
                .ok_or_else(|| anyhow!("Set SAGE_TOKEN_FILE or --token-file to store a token"))?;
            let token = AccessToken::new(token.trim());
            sage_catalog::session::ensure_not_expired(token.as_str())
                .context("Refusing to store token")?;
            FileSession::new(path.clone())
                .store(&token)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Token stored in {}", path.display());
            Ok(0)
        }
        Command::Logout => {
            if let Some(path) = &config.token_file {
                FileSession::new(path.clone())
                    .clear()
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }
            println!("Logged out");
            Ok(0)
        }
        Command::Config { action } => {
            let mut store = PendingChangeStore::new(api, session);
            store.load().await?;
            match action {
                ConfigCommand::Show => {}
                ConfigCommand::Set { assignments } => {
                    for assignment in assignments {
                        let (key, value) = parse_assignment(&store, assignment)?;
                        store.stage_value(key, value);
                    }
                    store.commit().await?;
                }
                ConfigCommand::Toggle { key } => {
                    let enabled = store.toggle(key)?;
                    store.commit().await?;
                    println!("{} = {}", key, enabled);
                }
            }
            let configuration = store.configuration()?;
            if cli.json {
                print_json(&redacted(&configuration)?)?;
            } else if matches!(action, ConfigCommand::Show | ConfigCommand::Set { .. }) {
                print!("{}", serde_yaml::to_string(&redacted(&configuration)?)?);
            }
            Ok(0)
        }
    }
}

/// Split `key=value` and type the value after the setting it replaces.
fn parse_assignment(store: &PendingChangeStore, assignment: &str) -> Result<(String, Value)> {
    let (key, raw) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected key=value, got '{}'", assignment))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("Empty key in '{}'", assignment);
    }

    let value = match store.effective(key) {
        Some(Value::Bool(_)) => match raw.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Value::Bool(true),
            "false" | "no" | "off" | "0" => Value::Bool(false),
            other => bail!("'{}' expects true or false, got '{}'", key, other),
        },
        Some(_) => Value::String(raw.to_string()),
        None => bail!("Unknown configuration key '{}'", key),
    };
    Ok((key.to_string(), value))
}

fn redacted(configuration: &Configuration) -> Result<Map<String, Value>> {
    let mut map = match serde_json::to_value(configuration)? {
        Value::Object(map) => map,
        other => bail!("Unexpected configuration shape: {}", other),
    };
    for (key, value) in map.iter_mut() {
        if Configuration::is_secret_key(key) {
            *value = Value::String("<redacted>".to_string());
        }
    }
    Ok(map)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn display_id(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

fn print_catalog(record: &CatalogRecord) {
    println!("Catalog {}: {}", record.id, record.name);
    println!(
        "  Product:     {} ({}, id {})",
        record.product.schema_name, record.product.domain, record.product.id
    );
    if let Some(status) = record.status {
        println!("  Status:      {:?}", status);
    }
    println!("  Corporate:   {}", record.corporate);
    if let Some(user) = &record.responsible_user {
        println!("  Responsible: {} <{}>", user.username, user.email);
    }
    println!("  Frequency:   {:?}", record.frequency);
    println!(
        "  Deadline:    {}",
        record
            .deadline
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    if !record.tags.is_empty() {
        println!("  Tags:        {}", record.tags.join(", "));
    }
}

fn print_catalog_list(catalogs: &[CatalogSummary]) {
    if catalogs.is_empty() {
        println!("No catalogs");
        return;
    }
    for catalog in catalogs {
        println!(
            "{:>6}  {:<30}  {:<20}  {}",
            catalog.id, catalog.name, catalog.product.schema_name, catalog.corporate
        );
    }
}
