//! Todo list API entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use todo_api::api::{create_router, AppState};
use todo_api::config::Config;
use todo_api::metrics;
use todo_api::store::{open_postgres, MemoryTodoStore, PgTodoStore, TodoStore};
use todo_api::utils::shutdown_signal;

/// Todo list HTTP API.
#[derive(Parser, Debug)]
#[command(name = "todo-api")]
#[command(about = "Postgres-backed todo list API with Prometheus metrics")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Keep items in process memory instead of Postgres.
        #[arg(long)]
        memory: bool,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Create the `list` table and exit.
    InitDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let loaded = Config::load().unwrap_or_default();
    let json_logs = loaded.json_logs();
    let filter = if args.verbose {
        EnvFilter::new("todo_api=debug,info")
    } else {
        loaded.log_filter()
    };

    tracing_subscriber::registry()
        .with(json_logs.then(|| fmt::layer().json()))
        .with((!json_logs).then(|| fmt::layer()))
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::Serve { memory }) => cmd_serve(args.port, memory).await,
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::InitDb) => cmd_init_db().await,
        None => cmd_serve(args.port, false).await,
    }
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("TODO API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Database: {}:{}/{}", config.db_host, config.db_port, config.db_name);
    println!("  User: {}", config.db_user);
    println!("  Password: {}", config.masked_password());
    println!("  Pool Size: {}", config.db_max_connections);
    println!("  Init Schema: {}", config.db_init_schema);
    println!("  HTTP Port: {}", config.port);
    println!("  Log Format: {}", config.log_format);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Create the `list` table.
async fn cmd_init_db() -> anyhow::Result<()> {
    let config = Config::load_validated()?;
    let store = PgTodoStore::connect(&config).await?;
    store.ensure_schema().await?;
    Ok(())
}

/// Run the HTTP server.
async fn cmd_serve(port_override: Option<u16>, memory: bool) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let mut config = Config::load_validated().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }

    // Initialize metrics
    let metrics_handle = metrics::init_metrics()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))?;

    // Open storage
    let store: Arc<dyn TodoStore> = if memory {
        warn!("Using in-memory store; items are lost on exit");
        Arc::new(MemoryTodoStore::new())
    } else {
        Arc::new(open_postgres(&config).await?)
    };

    let app_state = AppState::new(store, metrics_handle);

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn port_is_accepted_after_serve() {
        let args = Args::try_parse_from(["todo-api", "serve", "--memory", "-p", "9000"]).unwrap();
        assert_eq!(args.port, Some(9000));
        assert!(matches!(args.command, Some(Command::Serve { memory: true })));
    }

    #[test]
    fn port_is_accepted_without_subcommand() {
        let args = Args::try_parse_from(["todo-api", "--port", "9001"]).unwrap();
        assert_eq!(args.port, Some(9001));
        assert!(args.command.is_none());
    }
}
