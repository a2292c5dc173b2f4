//! Keeps the local mirror in step with the upstream snapshot, one shop at a time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::SyncPolicy;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{SalesPeriod, Shop};
use crate::upstream::{ShopSession, Upstream};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    Synced {
        rows: usize,
    },
    /// Inventory was refreshed within the freshness window.
    #[serde(rename = "skipped")]
    InventoryFresh {
        last_updated_at: DateTime<Utc>,
    },
    /// Stored sales already cover exactly the requested range.
    #[serde(rename = "skipped")]
    SalesCurrent {
        sales_period: SalesPeriod,
    },
}

impl SyncOutcome {
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        !matches!(self, SyncOutcome::Synced { .. })
    }
}

pub struct SyncService {
    store: Arc<dyn Store>,
    upstream: Arc<dyn Upstream>,
    policy: SyncPolicy,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SyncService {
    pub fn new(store: Arc<dyn Store>, upstream: Arc<dyn Upstream>, policy: SyncPolicy) -> Self {
        Self {
            store,
            upstream,
            policy,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Per-shop lock so two syncs for the same shop never interleave.
    fn shop_lock(&self, shop_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(shop_id.to_string()).or_default().clone()
    }

    pub async fn sync_inventory(&self, shop: &Shop) -> Result<SyncOutcome> {
        let session = ShopSession::from_shop(shop)?;
        let lock = self.shop_lock(&shop.id);
        let _guard = lock.lock().await;

        let now = Utc::now();
        if let Some(last) = self.store.last_inventory_update(&shop.id)? {
            if now - last <= self.policy.freshness_window() {
                info!(shop = %shop.shop_domain, last_updated_at = %last, "inventory fresh, skipping sync");
                return Ok(SyncOutcome::InventoryFresh {
                    last_updated_at: last,
                });
            }
        }

        info!(shop = %shop.shop_domain, "syncing inventory");
        let rows = self.upstream.fetch_inventory(&session).await?;
        let inserted = self.store.replace_inventory(&shop.id, &rows, now)?;
        info!(shop = %shop.shop_domain, rows = inserted, "inventory synced");

        Ok(SyncOutcome::Synced { rows: inserted })
    }

    /// Replaces all stored sales with the requested range. A narrower range
    /// than what is stored shrinks the dataset.
    pub async fn sync_sales(
        &self,
        shop: &Shop,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SyncOutcome> {
        if start > end {
            return Err(Error::BadRequest(
                "start_date must not be after end_date".into(),
            ));
        }

        let session = ShopSession::from_shop(shop)?;
        let lock = self.shop_lock(&shop.id);
        let _guard = lock.lock().await;

        let stored = self.store.sales_period(&shop.id)?;
        if stored.matches(start, end) {
            info!(shop = %shop.shop_domain, %start, %end, "sales period already stored, skipping sync");
            return Ok(SyncOutcome::SalesCurrent {
                sales_period: stored,
            });
        }

        info!(shop = %shop.shop_domain, %start, %end, "syncing sales");
        let rows = self.upstream.fetch_sales(&session, start, end).await?;
        let inserted = self.store.replace_sales(&shop.id, &rows)?;
        info!(shop = %shop.shop_domain, rows = inserted, "sales synced");

        Ok(SyncOutcome::Synced { rows: inserted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use crate::store::SqliteStore;
    use crate::types::{InventoryRow, SalesRow};

    #[derive(Default)]
    struct FakeUpstream {
        inventory_calls: AtomicUsize,
        sales_calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Upstream for FakeUpstream {
        async fn fetch_inventory(&self, _session: &ShopSession) -> Result<Vec<InventoryRow>> {
            self.inventory_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Upstream("boom".into()));
            }
            Ok(vec![InventoryRow {
                title: "Tee".into(),
                size: Some("M".into()),
                color: None,
                sku: Some("TEE-M".into()),
                inventory: 4,
                price: Decimal::new(1500, 2),
            }])
        }

        async fn fetch_sales(
            &self,
            _session: &ShopSession,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<SalesRow>> {
            self.sales_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Upstream("boom".into()));
            }
            Ok([start, end]
                .into_iter()
                .map(|order_date| SalesRow {
                    title: "Tee".into(),
                    size: Some("M".into()),
                    color: None,
                    sku: Some("TEE-M".into()),
                    quantity_sold: 1,
                    order_date,
                })
                .collect())
        }
    }

    fn setup(upstream: Arc<FakeUpstream>) -> (TempDir, Arc<SqliteStore>, SyncService, Shop) {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(SqliteStore::new(temp.path().join("test.db")).unwrap());
        store.initialize().unwrap();

        let shop = Shop {
            id: "shop-1".into(),
            shop_domain: "alpha.myshopify.com".into(),
            access_token: "shpat_test".into(),
            is_active: true,
            installed_at: Utc::now(),
        };
        store.create_shop(&shop).unwrap();

        let service = SyncService::new(store.clone(), upstream, SyncPolicy::default());
        (temp, store, service, shop)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_inventory_sync_skips_within_freshness_window() {
        let upstream = Arc::new(FakeUpstream::default());
        let (_temp, store, service, shop) = setup(upstream.clone());

        let first = service.sync_inventory(&shop).await.unwrap();
        assert_eq!(first, SyncOutcome::Synced { rows: 1 });

        let second = service.sync_inventory(&shop).await.unwrap();
        assert!(second.is_skipped());
        assert!(matches!(second, SyncOutcome::InventoryFresh { .. }));

        assert_eq!(upstream.inventory_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.list_inventory(&shop.id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_inventory_is_refetched() {
        let upstream = Arc::new(FakeUpstream::default());
        let (_temp, store, service, shop) = setup(upstream.clone());

        let stale = Utc::now() - chrono::Duration::hours(13);
        let rows = vec![InventoryRow {
            title: "Old".into(),
            size: None,
            color: None,
            sku: None,
            inventory: 1,
            price: Decimal::ZERO,
        }];
        store.replace_inventory(&shop.id, &rows, stale).unwrap();

        let outcome = service.sync_inventory(&shop).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Synced { rows: 1 });
        assert_eq!(upstream.inventory_calls.load(Ordering::SeqCst), 1);

        let stored = store.list_inventory(&shop.id).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].row.title, "Tee");
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_snapshot() {
        let upstream = Arc::new(FakeUpstream {
            fail: true,
            ..FakeUpstream::default()
        });
        let (_temp, store, service, shop) = setup(upstream.clone());

        let stale = Utc::now() - chrono::Duration::days(2);
        let rows = vec![InventoryRow {
            title: "Old".into(),
            size: None,
            color: None,
            sku: Some("OLD".into()),
            inventory: 1,
            price: Decimal::ZERO,
        }];
        store.replace_inventory(&shop.id, &rows, stale).unwrap();

        let result = service.sync_inventory(&shop).await;
        assert!(matches!(result, Err(Error::Upstream(_))));
        assert_eq!(store.list_inventory(&shop.id).unwrap()[0].row.title, "Old");

        let sales = vec![
            SalesRow {
                title: "Old".into(),
                size: None,
                color: None,
                sku: Some("OLD".into()),
                quantity_sold: 3,
                order_date: date("2023-06-01"),
            },
            SalesRow {
                title: "Old".into(),
                size: None,
                color: None,
                sku: Some("OLD".into()),
                quantity_sold: 2,
                order_date: date("2023-06-15"),
            },
        ];
        store.replace_sales(&shop.id, &sales).unwrap();
        let period_before = store.sales_period(&shop.id).unwrap();

        let result = service
            .sync_sales(&shop, date("2024-01-01"), date("2024-01-31"))
            .await;
        assert!(matches!(result, Err(Error::Upstream(_))));
        assert_eq!(upstream.sales_calls.load(Ordering::SeqCst), 1);

        assert_eq!(store.sales_period(&shop.id).unwrap(), period_before);
        assert_eq!(period_before.min_sales_date, Some(date("2023-06-01")));
        assert_eq!(period_before.max_sales_date, Some(date("2023-06-15")));

        let mut kept: Vec<SalesRow> = store
            .list_sales(&shop.id)
            .unwrap()
            .into_iter()
            .map(|record| record.row)
            .collect();
        kept.sort_by_key(|row| row.order_date);
        assert_eq!(kept, sales);
    }

    #[tokio::test]
    async fn test_sales_sync_skips_identical_range_only() {
        let upstream = Arc::new(FakeUpstream::default());
        let (_temp, store, service, shop) = setup(upstream.clone());

        let outcome = service
            .sync_sales(&shop, date("2024-01-01"), date("2024-01-31"))
            .await
            .unwrap();
        assert_eq!(outcome, SyncOutcome::Synced { rows: 2 });

        let outcome = service
            .sync_sales(&shop, date("2024-01-01"), date("2024-01-31"))
            .await
            .unwrap();
        assert!(matches!(outcome, SyncOutcome::SalesCurrent { .. }));
        assert_eq!(upstream.sales_calls.load(Ordering::SeqCst), 1);

        // narrower range wipes and shrinks the stored history
        let outcome = service
            .sync_sales(&shop, date("2024-01-10"), date("2024-01-20"))
            .await
            .unwrap();
        assert_eq!(outcome, SyncOutcome::Synced { rows: 2 });
        assert_eq!(upstream.sales_calls.load(Ordering::SeqCst), 2);

        let period = store.sales_period(&shop.id).unwrap();
        assert_eq!(period.min_sales_date, Some(date("2024-01-10")));
        assert_eq!(period.max_sales_date, Some(date("2024-01-20")));
    }

    #[tokio::test]
    async fn test_sync_rejects_bad_input() {
        let upstream = Arc::new(FakeUpstream::default());
        let (_temp, _store, service, mut shop) = setup(upstream.clone());

        let result = service
            .sync_sales(&shop, date("2024-02-01"), date("2024-01-01"))
            .await;
        assert!(matches!(result, Err(Error::BadRequest(_))));

        shop.access_token = String::new();
        let result = service.sync_inventory(&shop).await;
        assert!(matches!(result, Err(Error::MissingCredential)));
        assert_eq!(upstream.inventory_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrent_syncs_for_one_shop_fetch_once() {
        let upstream = Arc::new(FakeUpstream::default());
        let (_temp, _store, service, shop) = setup(upstream.clone());
        let service = Arc::new(service);

        let a = {
            let service = service.clone();
            let shop = shop.clone();
            tokio::spawn(async move { service.sync_inventory(&shop).await })
        };
        let b = {
            let service = service.clone();
            let shop = shop.clone();
            tokio::spawn(async move { service.sync_inventory(&shop).await })
        };

        let outcomes = [a.await.unwrap().unwrap(), b.await.unwrap().unwrap()];
        assert_eq!(outcomes.iter().filter(|o| o.is_skipped()).count(), 1);
        assert_eq!(upstream.inventory_calls.load(Ordering::SeqCst), 1);
    }
}
