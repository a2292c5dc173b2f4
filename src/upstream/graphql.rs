use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PRODUCTS_QUERY: &str = r#"
query ($cursor: String, $first: Int!) {
  products(first: $first, after: $cursor) {
    edges {
      node {
        title
        variants(first: 50) {
          edges {
            node {
              title
              sku
              price
              inventoryQuantity
              selectedOptions { name value }
            }
          }
          pageInfo { hasNextPage }
        }
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;

pub const ORDERS_QUERY: &str = r#"
query ($cursor: String, $first: Int!, $query: String!) {
  orders(first: $first, after: $cursor, query: $query) {
    edges {
      node {
        createdAt
        lineItems(first: 50) {
          edges {
            node {
              title
              quantity
              variant {
                title
                sku
                selectedOptions { name value }
              }
            }
          }
          pageInfo { hasNextPage }
        }
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: Value,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    #[serde(default)]
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// True when the upstream holds more nodes than this page returned.
    pub fn is_truncated(&self) -> bool {
        self.page_info.has_next_page
    }
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductsData {
    pub products: Connection<ProductNode>,
}

#[derive(Debug, Deserialize)]
pub struct ProductNode {
    pub title: String,
    pub variants: Connection<VariantNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub title: Option<String>,
    pub sku: Option<String>,
    pub price: Decimal,
    pub inventory_quantity: Option<i64>,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

#[derive(Debug, Deserialize)]
pub struct OrdersData {
    pub orders: Connection<OrderNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNode {
    pub created_at: DateTime<Utc>,
    pub line_items: Connection<LineItemNode>,
}

#[derive(Debug, Deserialize)]
pub struct LineItemNode {
    pub title: String,
    pub quantity: i64,
    pub variant: Option<LineItemVariant>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemVariant {
    pub title: Option<String>,
    pub sku: Option<String>,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

/// Value of the variant option named "Color", if any.
pub fn color_option(options: &[SelectedOption]) -> Option<String> {
    options
        .iter()
        .find(|o| o.name.eq_ignore_ascii_case("color") || o.name.eq_ignore_ascii_case("colour"))
        .map(|o| o.value.clone())
}

/// Shopify reports a missing SKU as an empty string.
pub fn normalize_sku(sku: Option<String>) -> Option<String> {
    sku.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
