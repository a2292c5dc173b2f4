use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::server::AppState;
use crate::server::dto::ShopParams;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};

use super::access::active_shop;

/// Mirrored catalog snapshot, in upstream order.
pub async fn list_inventory(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShopParams>,
) -> impl IntoResponse {
    let shop = active_shop(state.store.as_ref(), &params.shop_domain)?;
    let rows = state
        .store
        .list_inventory(&shop.id)
        .api_err("Failed to list inventory")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(rows)))
}

/// Mirrored order lines, oldest first.
pub async fn list_sales(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShopParams>,
) -> impl IntoResponse {
    let shop = active_shop(state.store.as_ref(), &params.shop_domain)?;
    let rows = state
        .store
        .list_sales(&shop.id)
        .api_err("Failed to list sales")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(rows)))
}
