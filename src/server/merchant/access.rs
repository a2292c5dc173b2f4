use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::validate_shop_domain;
use crate::store::Store;
use crate::types::Shop;

/// Resolves an installed shop. Deactivated shops are treated as unknown.
pub fn active_shop(store: &dyn Store, shop_domain: &str) -> Result<Shop, ApiError> {
    validate_shop_domain(shop_domain)?;

    store
        .get_shop_by_domain(shop_domain)
        .api_err("Failed to look up shop")?
        .filter(|shop| shop.is_active)
        .or_not_found("Shop not found")
}
