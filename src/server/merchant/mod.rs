mod access;
mod dashboard;
mod records;
mod reports;
mod shops;
mod sync;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::server::AppState;

pub fn merchant_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shops/{shop_domain}", get(shops::get_shop))
        // Mirror refresh
        .route("/sync/inventory/{shop_domain}", post(sync::sync_inventory))
        .route("/sync/sales/{shop_domain}", post(sync::sync_sales))
        .route("/inventory", get(records::list_inventory))
        .route("/inventory/search", get(reports::search_inventory))
        .route("/sales", get(records::list_sales))
        // Forecasts
        .route("/report", post(reports::restock_report))
        .route("/customized/report", post(reports::customized_report))
        .route("/breakdown", get(reports::breakdown))
        // Dashboard metrics
        .route("/dashboard/total-skus", get(dashboard::total_skus))
        .route(
            "/dashboard/average-sales-per-day",
            get(dashboard::average_sales_per_day),
        )
        .route("/dashboard/coverage-days", get(dashboard::coverage_days))
        .route("/dashboard/stock-risk", get(dashboard::stock_risk))
        .route("/dashboard/summary", get(dashboard::summary))
}
