mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Shop directory
    fn create_shop(&self, shop: &Shop) -> Result<()>;
    fn get_shop_by_domain(&self, domain: &str) -> Result<Option<Shop>>;
    fn list_shops(&self) -> Result<Vec<Shop>>;
    /// Stores a new access token and marks the shop active again.
    fn update_shop_token(&self, id: &str, access_token: &str) -> Result<()>;
    fn deactivate_shop(&self, id: &str) -> Result<bool>;

    // Inventory mirror
    /// Atomically swaps the shop's inventory for `rows`. Returns the number inserted.
    fn replace_inventory(
        &self,
        shop_id: &str,
        rows: &[InventoryRow],
        synced_at: DateTime<Utc>,
    ) -> Result<usize>;
    fn list_inventory(&self, shop_id: &str) -> Result<Vec<InventoryRecord>>;
    fn last_inventory_update(&self, shop_id: &str) -> Result<Option<DateTime<Utc>>>;
    fn search_inventory_titles(&self, shop_id: &str, query: &str, limit: i64) -> Result<Vec<String>>;

    // Sales mirror
    /// Atomically swaps all of the shop's sales for `rows`. Returns the number inserted.
    fn replace_sales(&self, shop_id: &str, rows: &[SalesRow]) -> Result<usize>;
    fn list_sales(&self, shop_id: &str) -> Result<Vec<SalesRecord>>;
    fn sales_period(&self, shop_id: &str) -> Result<SalesPeriod>;

    // Aggregates
    /// Inventory rows left-joined by SKU onto units sold per (title, size, sku).
    /// `titles` restricts the inventory side; `Some(&[])` yields no rows.
    fn demand_rows(&self, shop_id: &str, titles: Option<&[String]>) -> Result<Vec<DemandRow>>;
    fn shop_totals(&self, shop_id: &str) -> Result<ShopTotals>;
}
