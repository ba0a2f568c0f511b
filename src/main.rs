mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

use reelhouse::{config, library, server};

async fn serve(host: Option<String>, port: Option<u16>, config_path: Option<&std::path::Path>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting reelhouse server");
    tracing::info!(
        "Serving media root {:?} on {}:{}",
        config.library.root,
        config.server.host,
        config.server.port
    );

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reelhouse=trace,tower_http=debug".to_string()
        } else {
            "reelhouse=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(serve(host, port, cli.config.as_deref()))
        }
        Commands::Scan { json } => scan(cli.config.as_deref(), json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("reelhouse {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn scan(config_path: Option<&std::path::Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let store = library::MediaStore::new(config.library.root.clone(), config.library.extensions);
    let records = library::indexer::scan(&store);

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("Media root: {:?}", config.library.root);
    println!("Files indexed: {}\n", records.len());
    for record in &records {
        println!(
            "  [{}] {} ({} bytes) - {}",
            record.category, record.title, record.size, record.identifier
        );
    }

    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Media root: {:?}", config.library.root);
            println!("  Extensions: {}", config.library.extensions.join(", "));
            println!("  TMDB configured: {}", config.tmdb.api_key.is_some());
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Media root: {:?}", config.library.root);
        }
    }

    Ok(())
}
