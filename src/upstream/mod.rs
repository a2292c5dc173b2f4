//! Upstream commerce platform access.
//!
//! The sync layer only sees the [`Upstream`] trait; [`ShopifyClient`] is the
//! production implementation speaking the Shopify Admin GraphQL API.

mod graphql;
mod shopify;

pub use shopify::ShopifyClient;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::types::{InventoryRow, SalesRow, Shop};

/// Credentials for talking to one shop's Admin API.
#[derive(Debug, Clone)]
pub struct ShopSession {
    pub domain: String,
    pub access_token: String,
}

impl ShopSession {
    pub fn from_shop(shop: &Shop) -> Result<Self> {
        if shop.access_token.trim().is_empty() {
            return Err(Error::MissingCredential);
        }
        Ok(Self {
            domain: shop.shop_domain.clone(),
            access_token: shop.access_token.clone(),
        })
    }
}

/// Full-snapshot reads from the commerce platform.
///
/// Implementations either return every row or an error; callers never see a
/// partial snapshot.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// One row per product variant.
    async fn fetch_inventory(&self, session: &ShopSession) -> Result<Vec<InventoryRow>>;

    /// One row per order line item for orders created within `start..=end`.
    async fn fetch_sales(
        &self,
        session: &ShopSession,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SalesRow>>;
}
