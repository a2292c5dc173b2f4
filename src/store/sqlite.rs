use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use uuid::Uuid;

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_date(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_decimal(idx: usize, s: &str) -> rusqlite::Result<Decimal> {
    Decimal::from_str(s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn shop_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Shop> {
    Ok(Shop {
        id: row.get(0)?,
        shop_domain: row.get(1)?,
        access_token: row.get(2)?,
        is_active: row.get(3)?,
        installed_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

/// Escapes LIKE wildcards so user input matches literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Shop directory

    fn create_shop(&self, shop: &Shop) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO shops (id, shop_domain, access_token, installed_at, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                shop.id,
                shop.shop_domain,
                shop.access_token,
                format_datetime(&shop.installed_at),
                shop.is_active,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::AlreadyExists)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_shop_by_domain(&self, domain: &str) -> Result<Option<Shop>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, shop_domain, access_token, is_active, installed_at
             FROM shops WHERE shop_domain = ?1",
            params![domain],
            shop_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_shops(&self) -> Result<Vec<Shop>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, shop_domain, access_token, is_active, installed_at
             FROM shops ORDER BY shop_domain",
        )?;

        let rows = stmt.query_map([], shop_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_shop_token(&self, id: &str, access_token: &str) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE shops SET access_token = ?1, is_active = 1 WHERE id = ?2",
            params![access_token, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn deactivate_shop(&self, id: &str) -> Result<bool> {
        let rows = self.conn().execute(
            "UPDATE shops SET is_active = 0 WHERE id = ?1 AND is_active = 1",
            params![id],
        )?;
        Ok(rows > 0)
    }

    // Inventory mirror

    fn replace_inventory(
        &self,
        shop_id: &str,
        rows: &[InventoryRow],
        synced_at: DateTime<Utc>,
    ) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM inventory WHERE shop_id = ?1", params![shop_id])?;

        let created_at = format_datetime(&synced_at);
        {
            let mut stmt = tx.prepare(
                "INSERT INTO inventory (id, shop_id, title, size, color, sku, inventory, price, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(params![
                    Uuid::new_v4().to_string(),
                    shop_id,
                    row.title,
                    row.size,
                    row.color,
                    row.sku,
                    row.inventory,
                    row.price.to_string(),
                    created_at,
                ])?;
            }
        }

        tx.commit()?;
        Ok(rows.len())
    }

    fn list_inventory(&self, shop_id: &str) -> Result<Vec<InventoryRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, shop_id, title, size, color, sku, inventory, price, created_at
             FROM inventory WHERE shop_id = ?1 ORDER BY rowid",
        )?;

        let rows = stmt.query_map(params![shop_id], |row| {
            Ok(InventoryRecord {
                id: row.get(0)?,
                shop_id: row.get(1)?,
                row: InventoryRow {
                    title: row.get(2)?,
                    size: row.get(3)?,
                    color: row.get(4)?,
                    sku: row.get(5)?,
                    inventory: row.get(6)?,
                    price: parse_decimal(7, &row.get::<_, String>(7)?)?,
                },
                created_at: parse_datetime(&row.get::<_, String>(8)?),
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn last_inventory_update(&self, shop_id: &str) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn();
        let latest: Option<String> = conn.query_row(
            "SELECT MAX(created_at) FROM inventory WHERE shop_id = ?1",
            params![shop_id],
            |row| row.get(0),
        )?;
        Ok(latest.map(|s| parse_datetime(&s)))
    }

    fn search_inventory_titles(&self, shop_id: &str, query: &str, limit: i64) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT title FROM inventory
             WHERE shop_id = ?1 AND title LIKE ?2 ESCAPE '\\'
             ORDER BY title LIMIT ?3",
        )?;

        let rows = stmt.query_map(params![shop_id, like_pattern(query), limit], |row| {
            row.get(0)
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Sales mirror

    fn replace_sales(&self, shop_id: &str, rows: &[SalesRow]) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM sales WHERE shop_id = ?1", params![shop_id])?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO sales (id, shop_id, title, size, color, sku, quantity_sold, order_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(params![
                    Uuid::new_v4().to_string(),
                    shop_id,
                    row.title,
                    row.size,
                    row.color,
                    row.sku,
                    row.quantity_sold,
                    row.order_date.format(DATE_FORMAT).to_string(),
                ])?;
            }
        }

        tx.commit()?;
        Ok(rows.len())
    }

    fn list_sales(&self, shop_id: &str) -> Result<Vec<SalesRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, shop_id, title, size, color, sku, quantity_sold, order_date
             FROM sales WHERE shop_id = ?1 ORDER BY order_date, rowid",
        )?;

        let rows = stmt.query_map(params![shop_id], |row| {
            Ok(SalesRecord {
                id: row.get(0)?,
                shop_id: row.get(1)?,
                row: SalesRow {
                    title: row.get(2)?,
                    size: row.get(3)?,
                    color: row.get(4)?,
                    sku: row.get(5)?,
                    quantity_sold: row.get(6)?,
                    order_date: parse_date(7, &row.get::<_, String>(7)?)?,
                },
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn sales_period(&self, shop_id: &str) -> Result<SalesPeriod> {
        let conn = self.conn();
        conn.query_row(
            "SELECT MIN(order_date), MAX(order_date) FROM sales WHERE shop_id = ?1",
            params![shop_id],
            |row| {
                let min: Option<String> = row.get(0)?;
                let max: Option<String> = row.get(1)?;
                Ok(SalesPeriod {
                    min_sales_date: min.as_deref().map(|s| parse_date(0, s)).transpose()?,
                    max_sales_date: max.as_deref().map(|s| parse_date(1, s)).transpose()?,
                })
            },
        )
        .map_err(Error::from)
    }

    // Aggregates

    fn demand_rows(&self, shop_id: &str, titles: Option<&[String]>) -> Result<Vec<DemandRow>> {
        let title_filter = match titles {
            Some([]) => return Ok(Vec::new()),
            Some(titles) => {
                let placeholders: Vec<String> =
                    (0..titles.len()).map(|i| format!("?{}", i + 2)).collect();
                format!(" AND i.title IN ({})", placeholders.join(", "))
            }
            None => String::new(),
        };

        let sql = format!(
            "WITH sold AS (
                 SELECT title, size, sku, SUM(quantity_sold) AS net_items_sold
                 FROM sales
                 WHERE shop_id = ?1
                 GROUP BY title, size, sku
             )
             SELECT i.title, i.size, i.sku, i.inventory, COALESCE(s.net_items_sold, 0)
             FROM inventory i
             LEFT JOIN sold s ON i.sku = s.sku
             WHERE i.shop_id = ?1{title_filter}
             ORDER BY i.rowid"
        );

        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;

        let values = std::iter::once(shop_id)
            .chain(titles.unwrap_or_default().iter().map(String::as_str));

        let rows = stmt.query_map(params_from_iter(values), |row| {
            Ok(DemandRow {
                title: row.get(0)?,
                size: row.get(1)?,
                sku: row.get(2)?,
                inventory: row.get(3)?,
                net_items_sold: row.get(4)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn shop_totals(&self, shop_id: &str) -> Result<ShopTotals> {
        let conn = self.conn();
        conn.query_row(
            "SELECT
                 (SELECT COUNT(sku) FROM inventory WHERE shop_id = ?1),
                 (SELECT COALESCE(SUM(inventory), 0) FROM inventory WHERE shop_id = ?1),
                 (SELECT COALESCE(SUM(quantity_sold), 0) FROM sales WHERE shop_id = ?1)",
            params![shop_id],
            |row| {
                Ok(ShopTotals {
                    sku_count: row.get(0)?,
                    total_inventory: row.get(1)?,
                    total_sold: row.get(2)?,
                })
            },
        )
        .map_err(Error::from)
    }
}
