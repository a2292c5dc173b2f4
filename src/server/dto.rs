use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Shop;

#[derive(Debug, Deserialize)]
pub struct ShopParams {
    pub shop_domain: String,
}

#[derive(Debug, Deserialize)]
pub struct SalesRangeParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub shop_domain: String,
    #[serde(default)]
    pub search_query: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportParams {
    pub shop_domain: String,
    pub number_of_days: i64,
}

#[derive(Debug, Deserialize)]
pub struct CustomizedReportRequest {
    #[serde(default)]
    pub items: Vec<String>,
    pub number_of_days: i64,
}

#[derive(Debug, Serialize)]
pub struct ShopStatusResponse {
    pub shop: Option<Shop>,
    pub installed: bool,
}

#[derive(Debug, Serialize)]
pub struct TitleMatch {
    pub title: String,
}
