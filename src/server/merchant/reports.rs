use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::forecast::Horizon;
use crate::report::csv::{self, CUSTOMIZED_REPORT_FILENAME, RESTOCK_REPORT_FILENAME};
use crate::server::AppState;
use crate::server::dto::{CustomizedReportRequest, ReportParams, SearchParams, ShopParams, TitleMatch};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt, csv_attachment};
use crate::server::validation::{search_term, validate_number_of_days};
use crate::types::Shop;

use super::access::active_shop;

const SEARCH_LIMIT: i64 = 10;

fn horizon(state: &AppState, shop: &Shop, number_of_days: i64) -> Result<Horizon, ApiError> {
    validate_number_of_days(number_of_days)?;
    let sales_duration = state.forecast.sales_duration(&shop.id)?;
    Ok(Horizon::new(number_of_days, sales_duration)?)
}

pub async fn search_inventory(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let shop = active_shop(state.store.as_ref(), &params.shop_domain)?;

    let matches: Vec<TitleMatch> = match search_term(&params.search_query)? {
        Some(term) => state
            .store
            .search_inventory_titles(&shop.id, term, SEARCH_LIMIT)
            .api_err("Failed to search inventory")?
            .into_iter()
            .map(|title| TitleMatch { title })
            .collect(),
        None => Vec::new(),
    };

    Ok::<_, ApiError>(Json(ApiResponse::success(matches)))
}

pub async fn restock_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> impl IntoResponse {
    let shop = active_shop(state.store.as_ref(), &params.shop_domain)?;
    let horizon = horizon(&state, &shop, params.number_of_days)?;

    let totals = state.forecast.forecast_all_items(&shop.id, horizon)?;
    tracing::info!(shop = %shop.shop_domain, titles = totals.len(), "restock report generated");

    Ok::<_, ApiError>(csv_attachment(
        RESTOCK_REPORT_FILENAME,
        csv::restock_totals(&totals),
    ))
}

pub async fn customized_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShopParams>,
    Json(req): Json<CustomizedReportRequest>,
) -> impl IntoResponse {
    let shop = active_shop(state.store.as_ref(), &params.shop_domain)?;
    let horizon = horizon(&state, &shop, req.number_of_days)?;

    let totals = state.forecast.forecast_items(&shop.id, &req.items, horizon)?;
    tracing::info!(
        shop = %shop.shop_domain,
        requested = req.items.len(),
        titles = totals.len(),
        "customized restock report generated"
    );

    Ok::<_, ApiError>(csv_attachment(
        CUSTOMIZED_REPORT_FILENAME,
        csv::restock_totals(&totals),
    ))
}

pub async fn breakdown(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> impl IntoResponse {
    let shop = active_shop(state.store.as_ref(), &params.shop_domain)?;
    let horizon = horizon(&state, &shop, params.number_of_days)?;

    let lines = state.forecast.items_breakdown(&shop.id, horizon)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(lines)))
}
