use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use restock::config::AppConfig;
use restock::error::Result;
use restock::server::{AppState, create_router};
use restock::store::{SqliteStore, Store};
use restock::types::{InventoryRow, SalesRow, Shop};
use restock::upstream::{ShopSession, Upstream};

/// In-memory upstream serving a fixed catalog and order history.
#[derive(Default)]
pub struct FakeUpstream {
    pub inventory: Mutex<Vec<InventoryRow>>,
    pub sales: Mutex<Vec<SalesRow>>,
    pub inventory_calls: AtomicUsize,
    pub sales_calls: AtomicUsize,
}

impl FakeUpstream {
    pub fn inventory_calls(&self) -> usize {
        self.inventory_calls.load(Ordering::SeqCst)
    }

    pub fn sales_calls(&self) -> usize {
        self.sales_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn fetch_inventory(&self, _session: &ShopSession) -> Result<Vec<InventoryRow>> {
        self.inventory_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.inventory.lock().unwrap().clone())
    }

    async fn fetch_sales(
        &self,
        _session: &ShopSession,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SalesRow>> {
        self.sales_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .sales
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.order_date >= start && row.order_date <= end)
            .cloned()
            .collect())
    }
}

pub struct TestApp {
    pub temp_dir: TempDir,
    pub store: Arc<SqliteStore>,
    pub upstream: Arc<FakeUpstream>,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("parse json body")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("utf-8 body")
    }
}

fn inventory(title: &str, size: &str, sku: Option<&str>, inventory: i64) -> InventoryRow {
    InventoryRow {
        title: title.to_string(),
        size: Some(size.to_string()),
        color: None,
        sku: sku.map(str::to_string),
        inventory,
        price: Decimal::new(2500, 2),
    }
}

fn sale(title: &str, sku: &str, quantity_sold: i64, date: &str) -> SalesRow {
    SalesRow {
        title: title.to_string(),
        size: None,
        color: None,
        sku: Some(sku.to_string()),
        quantity_sold,
        order_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date"),
    }
}

impl TestApp {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = Arc::new(SqliteStore::new(temp_dir.path().join("restock.db")).expect("open store"));
        store.initialize().expect("initialize store");

        let upstream = Arc::new(FakeUpstream::default());
        let state = Arc::new(AppState::new(
            store.clone(),
            upstream.clone(),
            &AppConfig::default(),
        ));

        Self {
            temp_dir,
            store,
            upstream,
            router: create_router(state),
        }
    }

    /// Catalog of four variants and January 2024 orders for Tee and Hat.
    pub fn with_catalog() -> Self {
        let app = Self::new();
        *app.upstream.inventory.lock().unwrap() = vec![
            inventory("Tee", "M", Some("T-M"), 10),
            inventory("Tee", "L", None, 2),
            inventory("Hat", "OS", Some("HAT"), 1),
            inventory("Mug", "OS", Some("MUG"), 500),
        ];
        *app.upstream.sales.lock().unwrap() = vec![
            sale("Tee", "T-M", 40, "2024-01-01"),
            sale("Hat", "HAT", 3, "2024-01-15"),
            sale("Tee", "T-M", 20, "2024-01-31"),
        ];
        app
    }

    pub fn add_shop(&self, domain: &str) -> Shop {
        let shop = Shop {
            id: Uuid::new_v4().to_string(),
            shop_domain: domain.to_string(),
            access_token: "shpat_test".to_string(),
            is_active: true,
            installed_at: Utc::now(),
        };
        self.store.create_shop(&shop).expect("create shop");
        shop
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("route request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str) -> TestResponse {
        self.request(Method::POST, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    /// Runs both syncs so forecasts have data to work with.
    pub async fn sync_all(&self, domain: &str) {
        let resp = self.post(&format!("/api/v1/sync/inventory/{domain}")).await;
        assert_eq!(resp.status, StatusCode::OK, "{}", resp.text());

        let resp = self
            .post(&format!(
                "/api/v1/sync/sales/{domain}?start_date=2024-01-01&end_date=2024-01-31"
            ))
            .await;
        assert_eq!(resp.status, StatusCode::OK, "{}", resp.text());
    }
}
