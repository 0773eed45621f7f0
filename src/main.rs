//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `global_contribs` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Wiring the production collaborators (MySQL replicas, site-info API, DNS)

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use global_contribs::config::{Cli, Command, SearchArgs, REPLAG_SHARDS};
use global_contribs::initialization::{init_client, init_logger_with, init_resolver};
use global_contribs::ipinfo::DnsIpLookup;
use global_contribs::namespace::NamespaceCache;
use global_contribs::shard::{ConnectionManager, Credentials, MySqlOpener};
use global_contribs::storage::{init_db_pool_with_path, run_migrations, NamespaceStore};
use global_contribs::{check_replag, render_report, run_search, SearchContext, SearchError};

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a .env file next to the working directory
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    match &cli.command {
        Command::Search(args) => search(&cli, args).await,
        Command::Replag => replag(&cli).await,
    }
}

fn credentials(cli: &Cli) -> Result<Credentials> {
    Ok(Credentials {
        user: cli
            .db_user
            .clone()
            .context("No database user; set --db-user or GUC_DB_USER")?,
        password: cli
            .db_password
            .clone()
            .context("No database password; set --db-password or GUC_DB_PASSWORD")?,
    })
}

fn connection_manager(cli: &Cli) -> Result<ConnectionManager> {
    let opener = MySqlOpener::new(init_resolver(), credentials(cli)?);
    Ok(ConnectionManager::new(Arc::new(opener), cli.host_suffix.clone()))
}

async fn search(cli: &Cli, args: &SearchArgs) -> Result<()> {
    let settings = cli.settings();
    let manager = connection_manager(cli)?;

    let pool = init_db_pool_with_path(&settings.namespace_cache_path)
        .await
        .context("Failed to open the namespace cache")?;
    run_migrations(&pool)
        .await
        .context("Failed to prepare the namespace cache")?;
    let client = init_client().context("Failed to initialize HTTP client")?;
    let namespaces = NamespaceCache::new(client, NamespaceStore::new(pool));
    let ip_lookup = DnsIpLookup::new(init_resolver());

    let ctx = SearchContext {
        manager: &manager,
        namespaces: &namespaces,
        ip_lookup: &ip_lookup,
        settings: &settings,
    };

    match run_search(&ctx, &args.user, &args.options()).await {
        Ok(report) => {
            println!("{}", render_report(&report));
            if args.debug {
                println!(
                    "<pre class=\"debug\">{}</pre>",
                    html_escape::encode_text(&report.trace.render(&report.connections))
                );
            }
            Ok(())
        }
        Err(SearchError::InvalidInput(message)) => {
            eprintln!("global_contribs: {message}");
            process::exit(2);
        }
        Err(e) => Err(e).context("Search failed"),
    }
}

async fn replag(cli: &Cli) -> Result<()> {
    let manager = connection_manager(cli)?;
    let report = check_replag(&manager, REPLAG_SHARDS).await;
    let json = serde_json::to_string_pretty(&report).context("Failed to encode lag report")?;
    println!("{json}");
    Ok(())
}
