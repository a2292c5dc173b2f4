use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use super::graphql::{
    ORDERS_QUERY, OrdersData, PRODUCTS_QUERY, PageInfo, ProductsData, GraphQlRequest,
    GraphQlResponse, color_option, normalize_sku,
};
use super::{ShopSession, Upstream};
use crate::config::UpstreamConfig;
use crate::error::{Error, Result};
use crate::types::{InventoryRow, SalesRow};

/// Shopify Admin GraphQL client. Holds no per-shop state.
pub struct ShopifyClient {
    client: reqwest::Client,
    api_version: String,
    page_size: u32,
    base_url: Option<String>,
}

impl ShopifyClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("restock/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            api_version: config.api_version.clone(),
            page_size: config.page_size,
            base_url: config
                .base_url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
        })
    }

    fn endpoint(&self, domain: &str) -> String {
        let base = match &self.base_url {
            Some(base) => base.clone(),
            None => format!("https://{domain}"),
        };
        format!("{}/admin/api/{}/graphql.json", base, self.api_version)
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        session: &ShopSession,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.endpoint(&session.domain))
            .header("X-Shopify-Access-Token", &session.access_token)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("Shopify HTTP error {status}: {body}")));
        }

        let body: GraphQlResponse<T> = response.json().await?;

        if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
            return Err(Error::Upstream(format!(
                "Shopify GraphQL error: {}",
                serde_json::Value::Array(errors)
            )));
        }

        body.data
            .ok_or_else(|| Error::Upstream("Shopify response has no data".into()))
    }
}

/// Cursor for the next page, or `None` once pagination is exhausted.
fn next_cursor(page_info: PageInfo) -> Result<Option<String>> {
    if !page_info.has_next_page {
        return Ok(None);
    }
    page_info
        .end_cursor
        .map(Some)
        .ok_or_else(|| Error::Upstream("hasNextPage set without endCursor".into()))
}

#[async_trait]
impl Upstream for ShopifyClient {
    async fn fetch_inventory(&self, session: &ShopSession) -> Result<Vec<InventoryRow>> {
        let mut rows = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page = 0;

        loop {
            let data: ProductsData = self
                .graphql(
                    session,
                    PRODUCTS_QUERY,
                    json!({ "cursor": cursor, "first": self.page_size }),
                )
                .await?;
            page += 1;

            let products = data.products;
            debug!(
                shop = %session.domain,
                page,
                products = products.edges.len(),
                "fetched product page"
            );

            for product in products.edges {
                let product = product.node;
                if product.variants.is_truncated() {
                    warn!(
                        shop = %session.domain,
                        product = %product.title,
                        variants = product.variants.edges.len(),
                        "product has more variants than one request returns, extra variants skipped"
                    );
                }
                for variant in product.variants.edges {
                    let variant = variant.node;
                    rows.push(InventoryRow {
                        title: product.title.clone(),
                        color: color_option(&variant.selected_options),
                        size: variant.title,
                        sku: normalize_sku(variant.sku),
                        inventory: variant.inventory_quantity.unwrap_or(0),
                        price: variant.price,
                    });
                }
            }

            match next_cursor(products.page_info)? {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(rows)
    }

    async fn fetch_sales(
        &self,
        session: &ShopSession,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SalesRow>> {
        let date_query = format!("created_at:>={start} created_at:<={end}");
        let mut rows = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page = 0;

        loop {
            let data: OrdersData = self
                .graphql(
                    session,
                    ORDERS_QUERY,
                    json!({ "cursor": cursor, "first": self.page_size, "query": date_query }),
                )
                .await?;
            page += 1;

            let orders = data.orders;
            debug!(
                shop = %session.domain,
                page,
                orders = orders.edges.len(),
                "fetched order page"
            );

            for order in orders.edges {
                let order = order.node;
                let order_date = order.created_at.date_naive();
                if order.line_items.is_truncated() {
                    warn!(
                        shop = %session.domain,
                        created_at = %order.created_at,
                        line_items = order.line_items.edges.len(),
                        "order has more line items than one request returns, extra items skipped"
                    );
                }

                for item in order.line_items.edges {
                    let item = item.node;
                    let (size, color, sku) = match item.variant {
                        Some(variant) => (
                            variant.title,
                            color_option(&variant.selected_options),
                            normalize_sku(variant.sku),
                        ),
                        None => (None, None, None),
                    };
                    rows.push(SalesRow {
                        title: item.title,
                        size,
                        color,
                        sku,
                        quantity_sold: item.quantity,
                        order_date,
                    });
                }
            }

            match next_cursor(orders.page_info)? {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(rows)
    }
}
