pub const SCHEMA: &str = r#"
-- Installed shops (tenants)
CREATE TABLE IF NOT EXISTS shops (
    id TEXT PRIMARY KEY,
    shop_domain TEXT NOT NULL UNIQUE,
    access_token TEXT NOT NULL,
    installed_at TEXT DEFAULT (datetime('now')),

    -- Uninstalled shops are deactivated, never purged
    is_active INTEGER NOT NULL DEFAULT 1
);

-- Mirrored product variants, replaced wholesale on every sync
CREATE TABLE IF NOT EXISTS inventory (
    id TEXT PRIMARY KEY,
    shop_id TEXT NOT NULL REFERENCES shops(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    size TEXT,
    color TEXT,
    sku TEXT,
    inventory INTEGER NOT NULL DEFAULT 0,
    price TEXT NOT NULL DEFAULT '0',  -- decimal string, never a float
    created_at TEXT DEFAULT (datetime('now'))
);

-- Mirrored order line items, replaced wholesale on every sync
CREATE TABLE IF NOT EXISTS sales (
    id TEXT PRIMARY KEY,
    shop_id TEXT NOT NULL REFERENCES shops(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    size TEXT,
    color TEXT,
    sku TEXT,
    quantity_sold INTEGER NOT NULL DEFAULT 0,
    order_date TEXT NOT NULL  -- YYYY-MM-DD
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_inventory_shop ON inventory(shop_id);
CREATE INDEX IF NOT EXISTS idx_inventory_sku ON inventory(shop_id, sku);
CREATE INDEX IF NOT EXISTS idx_sales_shop ON sales(shop_id);
CREATE INDEX IF NOT EXISTS idx_sales_order_date ON sales(shop_id, order_date);
"#;
