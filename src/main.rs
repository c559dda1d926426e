//! Daybook - Time-blocked journaling with AI reflections

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use daybook::{
    api::app_from_parts,
    auth::TokenIssuer,
    config::DaybookConfig,
    insights::{GeminiProvider, InsightProvider, UnconfiguredProvider},
    storage::Database,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "daybook")]
#[command(version)]
#[command(about = "Time-blocked journaling with AI reflections")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "DAYBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run diagnostics
    Doctor,

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("daybook={},tower_http=debug", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => DaybookConfig::from_file(path)?,
        None => DaybookConfig::default(),
    };

    match cli.command {
        Commands::Serve { host, port } => {
            run_server(config, host, port).await?;
        }
        Commands::Doctor => {
            run_doctor(&config, cli.config.as_deref()).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

fn build_token_issuer(config: &DaybookConfig) -> Result<TokenIssuer> {
    match config.auth.resolve_secret() {
        Some(secret) => Ok(TokenIssuer::new(secret, config.auth.token_expiry_minutes)?),
        None => {
            tracing::warn!(
                env = %config.auth.jwt_secret_env,
                "No JWT secret configured, using an insecure development secret"
            );
            Ok(TokenIssuer::new_dev(config.auth.token_expiry_minutes))
        }
    }
}

fn build_provider(config: &DaybookConfig) -> Result<Arc<dyn InsightProvider>> {
    match config.provider.resolve_api_key() {
        Some(key) => {
            let provider = GeminiProvider::new(&config.provider, key)?;
            tracing::info!(model = %config.provider.model, "Using Gemini insight provider");
            Ok(Arc::new(provider))
        }
        None => {
            tracing::warn!(
                env = %config.provider.api_key_env,
                "No provider API key found; insights will be unavailable and questions will use defaults"
            );
            Ok(Arc::new(UnconfiguredProvider))
        }
    }
}

async fn run_server(config: DaybookConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    tracing::info!("Starting Daybook");

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let db = Database::open(&config.storage.database_path)?;
    let tokens = build_token_issuer(&config)?;
    let provider = build_provider(&config)?;
    let app = app_from_parts(db, tokens, provider, &config);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "Daybook is running. Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down...");
}

async fn run_doctor(config: &DaybookConfig, config_path: Option<&std::path::Path>) -> Result<()> {
    println!("Daybook Doctor");
    println!();

    println!("Checking configuration...");
    match config_path {
        Some(path) => println!("  ✓ Loaded {}", path.display()),
        None => println!("  ℹ No configuration file given (using defaults)"),
    }

    println!();
    println!("Checking storage...");
    match Database::open(&config.storage.database_path) {
        Ok(_) => println!("  ✓ Database ready: {}", config.storage.database_path.display()),
        Err(e) => println!("  ✗ Database error: {}", e),
    }

    println!();
    println!("Checking authentication...");
    match config.auth.resolve_secret() {
        Some(secret) => match TokenIssuer::new(secret, config.auth.token_expiry_minutes) {
            Ok(_) => println!("  ✓ JWT secret found in {}", config.auth.jwt_secret_env),
            Err(e) => println!("  ✗ {}", e),
        },
        None => println!(
            "  ✗ {} not set (a development secret will be used)",
            config.auth.jwt_secret_env
        ),
    }

    println!();
    println!("Checking insight provider...");
    if config.provider.resolve_api_key().is_some() {
        println!(
            "  ✓ API key found in {} (model {})",
            config.provider.api_key_env, config.provider.model
        );
    } else {
        println!(
            "  ✗ {} not set (insights unavailable, questions fall back to defaults)",
            config.provider.api_key_env
        );
    }

    println!();
    println!("Doctor check complete!");

    Ok(())
}

fn show_config(config: Option<&DaybookConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
