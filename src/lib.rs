//! # Restock
//!
//! Mirrors a Shopify store's inventory and order history into SQLite and
//! forecasts restock quantities from historical sell-through. Usable as a
//! standalone server binary or as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! restock = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use restock::config::AppConfig;
//! use restock::server::{AppState, create_router};
//! use restock::store::{SqliteStore, Store};
//! use restock::upstream::ShopifyClient;
//!
//! let config = AppConfig::default();
//! let store = SqliteStore::new(config.server.db_path()).unwrap();
//! store.initialize().unwrap();
//!
//! let upstream = ShopifyClient::new(&config.upstream).unwrap();
//! let state = Arc::new(AppState::new(Arc::new(store), Arc::new(upstream), &config));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod forecast;
pub mod report;
pub mod server;
pub mod store;
pub mod sync;
pub mod types;
pub mod upstream;
