mod commands;
mod shop;

pub use commands::ShopCommands;
pub use shop::{run_shop_add, run_shop_deactivate, run_shop_list};

use crate::config::ServerConfig;
use crate::store::{SqliteStore, Store};

/// Opens the store under `data_dir`, creating the directory and schema on first use.
pub fn init_store(data_dir: &str) -> anyhow::Result<SqliteStore> {
    let config = ServerConfig {
        data_dir: data_dir.into(),
        ..ServerConfig::default()
    };
    std::fs::create_dir_all(&config.data_dir)?;

    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;
    Ok(store)
}

/// Like [`init_store`], but refuses to create a database that does not exist yet.
pub fn open_existing_store(data_dir: &str) -> anyhow::Result<SqliteStore> {
    let config = ServerConfig {
        data_dir: data_dir.into(),
        ..ServerConfig::default()
    };
    let db_path = config.db_path();

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'restock shop add' first.",
            db_path.display()
        );
    }

    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;
    Ok(store)
}
