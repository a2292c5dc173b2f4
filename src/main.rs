use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use restock::cli::{ShopCommands, run_shop_add, run_shop_deactivate, run_shop_list};
use restock::config::AppConfig;
use restock::server::{AppState, create_router};
use restock::store::{SqliteStore, Store};
use restock::upstream::ShopifyClient;

#[derive(Parser)]
#[command(name = "restock")]
#[command(about = "Shopify inventory mirror and restock forecasting server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage registered shops
    Shop {
        #[command(subcommand)]
        command: ShopCommands,
    },

    /// Start the server
    Serve {
        /// TOML configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for the database (overrides the config file)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

fn load_config(
    path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    data_dir: Option<PathBuf>,
) -> anyhow::Result<AppConfig> {
    let mut config = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            AppConfig::load(&path)?
        }
        None => AppConfig::default(),
    };

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(data_dir) = data_dir {
        config.server.data_dir = data_dir;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("restock=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Shop { command } => match command {
            ShopCommands::Add {
                data_dir,
                domain,
                token,
            } => run_shop_add(data_dir, domain, token)?,
            ShopCommands::List { data_dir, json } => run_shop_list(data_dir, json)?,
            ShopCommands::Deactivate { data_dir, domain } => {
                run_shop_deactivate(data_dir, domain)?;
            }
        },
        Commands::Serve {
            config,
            host,
            port,
            data_dir,
        } => {
            let config = load_config(config, host, port, data_dir)?;

            std::fs::create_dir_all(&config.server.data_dir)?;
            let store = SqliteStore::new(config.server.db_path())?;
            store.initialize()?;
            info!("Database at {}", config.server.db_path().display());

            let upstream = ShopifyClient::new(&config.upstream)?;
            let state = Arc::new(AppState::new(Arc::new(store), Arc::new(upstream), &config));

            let app = create_router(state);
            let addr = config.server.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
