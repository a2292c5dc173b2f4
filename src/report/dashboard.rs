use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Result;
use crate::forecast::{checked_product, checked_ratio, round2};
use crate::store::Store;

/// Turns coverage days into a stock-risk score.
pub trait RiskScorer: Send + Sync {
    fn score(&self, coverage_days: Decimal) -> Result<Decimal>;
}

/// Scales coverage by a fixed multiplier.
#[derive(Debug, Clone, Copy)]
pub struct CoverageRiskScorer {
    pub multiplier: Decimal,
}

impl Default for CoverageRiskScorer {
    fn default() -> Self {
        Self {
            multiplier: Decimal::new(6, 1),
        }
    }
}

impl RiskScorer for CoverageRiskScorer {
    fn score(&self, coverage_days: Decimal) -> Result<Decimal> {
        if coverage_days.is_zero() {
            return Ok(Decimal::ZERO);
        }
        checked_product(coverage_days, self.multiplier).map(round2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_skus: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_sales_per_day: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub coverage_days: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub stock_risk: Decimal,
}

pub struct DashboardService {
    store: Arc<dyn Store>,
    scorer: Box<dyn RiskScorer>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn Store>, scorer: Box<dyn RiskScorer>) -> Self {
        Self { store, scorer }
    }

    /// Inventory variants carrying a SKU.
    pub fn total_sku_count(&self, shop_id: &str) -> Result<i64> {
        Ok(self.store.shop_totals(shop_id)?.sku_count)
    }

    pub fn average_sales_per_day(&self, shop_id: &str) -> Result<Decimal> {
        let totals = self.store.shop_totals(shop_id)?;
        let days = self.store.sales_period(shop_id)?.days();
        if totals.total_sold == 0 || days <= 0 {
            return Ok(Decimal::ZERO);
        }
        checked_ratio(Decimal::from(totals.total_sold), Decimal::from(days)).map(round2)
    }

    /// Days the on-hand stock lasts at the average daily rate.
    pub fn coverage_days(&self, shop_id: &str) -> Result<Decimal> {
        let average = self.average_sales_per_day(shop_id)?;
        if average.is_zero() {
            return Ok(Decimal::ZERO);
        }
        let totals = self.store.shop_totals(shop_id)?;
        checked_ratio(Decimal::from(totals.total_inventory), average).map(round2)
    }

    pub fn stock_risk(&self, shop_id: &str) -> Result<Decimal> {
        let coverage = self.coverage_days(shop_id)?;
        self.scorer.score(coverage)
    }

    pub fn summary(&self, shop_id: &str) -> Result<DashboardSummary> {
        let coverage_days = self.coverage_days(shop_id)?;
        Ok(DashboardSummary {
            total_skus: self.total_sku_count(shop_id)?,
            average_sales_per_day: self.average_sales_per_day(shop_id)?,
            coverage_days,
            stock_risk: self.scorer.score(coverage_days)?,
        })
    }
}
