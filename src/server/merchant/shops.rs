use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::server::AppState;
use crate::server::dto::ShopStatusResponse;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::validate_shop_domain;

/// Install status for a domain. Unknown shops report `installed: false`.
pub async fn get_shop(
    State(state): State<Arc<AppState>>,
    Path(shop_domain): Path<String>,
) -> impl IntoResponse {
    validate_shop_domain(&shop_domain)?;

    let shop = state
        .store
        .get_shop_by_domain(&shop_domain)
        .api_err("Failed to look up shop")?;
    let installed = shop.as_ref().is_some_and(|s| s.is_active);

    Ok::<_, ApiError>(Json(ApiResponse::success(ShopStatusResponse {
        shop,
        installed,
    })))
}
