//! Restock forecasting from historical sell-through.
//!
//! Every inventory variant gets a *lifetime*: the days its stock lasts at the
//! shop's historical daily velocity. Titles whose mean lifetime falls under
//! the configured threshold are projected forward over the requested horizon.
//!
//! All arithmetic is exact decimal so half-cent results round the same way a
//! SQL `numeric` column would.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::config::ForecastPolicy;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::DemandRow;

/// Rounds half away from zero to two decimal places.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn checked_ratio(numerator: Decimal, denominator: Decimal) -> Result<Decimal> {
    numerator
        .checked_div(denominator)
        .ok_or_else(|| Error::Computation(format!("cannot divide {numerator} by {denominator}")))
}

pub(crate) fn checked_product(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| Error::Computation(format!("{a} * {b} overflows")))
}

fn checked_sum(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| Error::Computation(format!("{a} + {b} overflows")))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestockTotal {
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_restock_amount: Decimal,
}

/// Per-variant row of the restock table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestockLine {
    pub title: String,
    pub size: Option<String>,
    pub sku: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub lifetime: Decimal,
    pub inventory: i64,
    pub net_items_sold: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub restock_amount: Decimal,
}

/// Horizon and history window for one forecast run.
#[derive(Debug, Clone, Copy)]
pub struct Horizon {
    pub restock_days: i64,
    pub sales_duration: i64,
}

impl Horizon {
    pub fn new(restock_days: i64, sales_duration: i64) -> Result<Self> {
        if restock_days <= 0 {
            return Err(Error::BadRequest(
                "number_of_days must be greater than 0".into(),
            ));
        }
        Ok(Self {
            restock_days,
            sales_duration,
        })
    }

    /// Units sold per day; 0 when there is no history window to divide by.
    fn velocity(&self, net_items_sold: i64) -> Result<Decimal> {
        if self.sales_duration <= 0 {
            return Ok(Decimal::ZERO);
        }
        checked_ratio(Decimal::from(net_items_sold), Decimal::from(self.sales_duration))
    }

    fn lifetime(&self, row: &DemandRow) -> Result<Decimal> {
        let velocity = self.velocity(row.net_items_sold)?;
        if row.net_items_sold == 0 || velocity.is_zero() {
            return Ok(Decimal::from(row.inventory));
        }
        checked_ratio(Decimal::from(row.inventory), velocity).map(round2)
    }

    fn restock_amount(&self, row: &DemandRow) -> Result<Decimal> {
        if row.net_items_sold <= 0 {
            return Ok(Decimal::from(self.restock_days));
        }
        checked_product(
            self.velocity(row.net_items_sold)?,
            Decimal::from(self.restock_days),
        )
    }
}

/// Builds the restock table: lifetime per row, then only rows whose title
/// averages under `threshold` days of runway.
pub fn restock_table(
    rows: &[DemandRow],
    horizon: Horizon,
    threshold: Decimal,
) -> Result<Vec<RestockLine>> {
    let lifetimes = rows
        .iter()
        .map(|row| horizon.lifetime(row))
        .collect::<Result<Vec<_>>>()?;

    let mut per_title: HashMap<&str, (Decimal, i64)> = HashMap::new();
    for (row, lifetime) in rows.iter().zip(&lifetimes) {
        let entry = per_title.entry(row.title.as_str()).or_default();
        entry.0 = checked_sum(entry.0, *lifetime)?;
        entry.1 += 1;
    }

    let mut below: HashMap<&str, bool> = HashMap::with_capacity(per_title.len());
    for (title, (sum, count)) in per_title {
        let mean = checked_ratio(sum, Decimal::from(count))?;
        below.insert(title, mean < threshold);
    }

    let mut lines = Vec::new();
    for (row, lifetime) in rows.iter().zip(lifetimes) {
        if !below.get(row.title.as_str()).copied().unwrap_or(false) {
            continue;
        }
        lines.push(RestockLine {
            title: row.title.clone(),
            size: row.size.clone(),
            sku: row.sku.clone(),
            lifetime,
            inventory: row.inventory,
            net_items_sold: row.net_items_sold,
            restock_amount: horizon.restock_amount(row)?,
        });
    }
    Ok(lines)
}

/// Sums restock amounts per title, largest first.
pub fn totals_by_title(lines: &[RestockLine]) -> Result<Vec<RestockTotal>> {
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, Decimal> = HashMap::new();
    for line in lines {
        let sum = sums.entry(line.title.as_str()).or_insert_with(|| {
            order.push(line.title.as_str());
            Decimal::ZERO
        });
        *sum = checked_sum(*sum, line.restock_amount)?;
    }

    let mut totals: Vec<RestockTotal> = order
        .into_iter()
        .map(|title| RestockTotal {
            title: title.to_string(),
            total_restock_amount: round2(sums[title]),
        })
        .collect();

    totals.sort_by(|a, b| {
        b.total_restock_amount
            .cmp(&a.total_restock_amount)
            .then_with(|| a.title.cmp(&b.title))
    });
    Ok(totals)
}

pub struct ForecastEngine {
    store: Arc<dyn Store>,
    policy: ForecastPolicy,
}

impl ForecastEngine {
    pub fn new(store: Arc<dyn Store>, policy: ForecastPolicy) -> Self {
        Self { store, policy }
    }

    /// Days spanned by the shop's stored sales history.
    pub fn sales_duration(&self, shop_id: &str) -> Result<i64> {
        self.store
            .sales_period(shop_id)
            .map(|period| period.days())
            .map_err(computation)
    }

    fn lines(&self, shop_id: &str, items: Option<&[String]>, horizon: Horizon) -> Result<Vec<RestockLine>> {
        let rows = self.store.demand_rows(shop_id, items).map_err(computation)?;
        restock_table(&rows, horizon, self.policy.lifetime_threshold())
    }

    pub fn forecast_all_items(&self, shop_id: &str, horizon: Horizon) -> Result<Vec<RestockTotal>> {
        let lines = self.lines(shop_id, None, horizon)?;
        totals_by_title(&lines)
    }

    /// Same as [`Self::forecast_all_items`] restricted to the given titles.
    pub fn forecast_items(
        &self,
        shop_id: &str,
        items: &[String],
        horizon: Horizon,
    ) -> Result<Vec<RestockTotal>> {
        let lines = self.lines(shop_id, Some(items), horizon)?;
        totals_by_title(&lines)
    }

    /// Per-variant drill-down, SKU-less rows excluded, best sellers first.
    pub fn items_breakdown(&self, shop_id: &str, horizon: Horizon) -> Result<Vec<RestockLine>> {
        let mut lines = self.lines(shop_id, None, horizon)?;
        lines.retain(|line| line.sku.is_some());
        lines.sort_by(|a, b| {
            b.net_items_sold
                .cmp(&a.net_items_sold)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.size.cmp(&b.size))
        });
        Ok(lines)
    }
}

fn computation(err: Error) -> Error {
    match err {
        Error::Computation(_) => err,
        other => Error::Computation(other.to_string()),
    }
}
