use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::server::AppState;
use crate::server::dto::SalesRangeParams;
use crate::server::response::{ApiError, ApiResponse};

use super::access::active_shop;

pub async fn sync_inventory(
    State(state): State<Arc<AppState>>,
    Path(shop_domain): Path<String>,
) -> impl IntoResponse {
    let shop = active_shop(state.store.as_ref(), &shop_domain)?;
    let outcome = state.sync.sync_inventory(&shop).await?;

    Ok::<_, ApiError>(Json(ApiResponse::success(outcome)))
}

pub async fn sync_sales(
    State(state): State<Arc<AppState>>,
    Path(shop_domain): Path<String>,
    Query(params): Query<SalesRangeParams>,
) -> impl IntoResponse {
    let shop = active_shop(state.store.as_ref(), &shop_domain)?;
    let outcome = state
        .sync
        .sync_sales(&shop, params.start_date, params.end_date)
        .await?;

    Ok::<_, ApiError>(Json(ApiResponse::success(outcome)))
}
