use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub id: String,
    pub shop_domain: String,
    #[serde(skip)]
    pub access_token: String,
    pub is_active: bool,
    pub installed_at: DateTime<Utc>,
}

/// One product variant as mirrored from the upstream catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub title: String,
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub sku: Option<String>,
    pub inventory: i64,
    pub price: Decimal,
}

/// One order line item as mirrored from the upstream order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRow {
    pub title: String,
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub sku: Option<String>,
    pub quantity_sold: i64,
    pub order_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryRecord {
    pub id: String,
    pub shop_id: String,
    #[serde(flatten)]
    pub row: InventoryRow,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesRecord {
    pub id: String,
    pub shop_id: String,
    #[serde(flatten)]
    pub row: SalesRow,
}

/// First and last stored order date for a shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SalesPeriod {
    pub min_sales_date: Option<NaiveDate>,
    pub max_sales_date: Option<NaiveDate>,
}

impl SalesPeriod {
    /// Days between first and last sale, 0 when there are no sales.
    #[must_use]
    pub fn days(&self) -> i64 {
        match (self.min_sales_date, self.max_sales_date) {
            (Some(min), Some(max)) => (max - min).num_days(),
            _ => 0,
        }
    }

    #[must_use]
    pub fn matches(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.min_sales_date == Some(start) && self.max_sales_date == Some(end)
    }
}

/// Inventory row joined with the units sold for its SKU.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandRow {
    pub title: String,
    pub size: Option<String>,
    pub sku: Option<String>,
    pub inventory: i64,
    pub net_items_sold: i64,
}

/// Shop-wide totals feeding the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShopTotals {
    pub sku_count: i64,
    pub total_inventory: i64,
    pub total_sold: i64,
}
