use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Value, json};

use crate::server::AppState;
use crate::server::dto::ShopParams;
use crate::server::response::{ApiError, ApiResponse};

use super::access::active_shop;

fn number(value: Decimal) -> Value {
    value.to_f64().map_or(Value::Null, Value::from)
}

pub async fn total_skus(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShopParams>,
) -> impl IntoResponse {
    let shop = active_shop(state.store.as_ref(), &params.shop_domain)?;
    let total = state.dashboard.total_sku_count(&shop.id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(json!({ "total_skus": total }))))
}

pub async fn average_sales_per_day(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShopParams>,
) -> impl IntoResponse {
    let shop = active_shop(state.store.as_ref(), &params.shop_domain)?;
    let average = state.dashboard.average_sales_per_day(&shop.id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(
        json!({ "average_sales_per_day": number(average) }),
    )))
}

pub async fn coverage_days(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShopParams>,
) -> impl IntoResponse {
    let shop = active_shop(state.store.as_ref(), &params.shop_domain)?;
    let coverage = state.dashboard.coverage_days(&shop.id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(json!({ "coverage_days": number(coverage) }))))
}

pub async fn stock_risk(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShopParams>,
) -> impl IntoResponse {
    let shop = active_shop(state.store.as_ref(), &params.shop_domain)?;
    let risk = state.dashboard.stock_risk(&shop.id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(json!({ "stock_risk": number(risk) }))))
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShopParams>,
) -> impl IntoResponse {
    let shop = active_shop(state.store.as_ref(), &params.shop_domain)?;
    let summary = state.dashboard.summary(&shop.id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(summary)))
}
