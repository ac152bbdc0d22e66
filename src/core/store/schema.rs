//! Database schema initialization

use rusqlite::{params, OptionalExtension};

use super::{MaintenanceStore, StoreError, SCHEMA_VERSION};

pub const SERVICE_MANUAL_TABLE: &str = "maintenance_service_manual";
pub const SERVICE_PARTS_TABLE: &str = "maintenance_service_parts";
pub const PARTS_STOCK_TABLE: &str = "procurement_parts_stock";
pub const RECONCILIATION_VIEW: &str = "procurement_stock_vs_maintenance";

/// Tables and views in creation order
pub const RELATIONS: [&str; 4] = [
    SERVICE_MANUAL_TABLE,
    SERVICE_PARTS_TABLE,
    PARTS_STOCK_TABLE,
    RECONCILIATION_VIEW,
];

const DDL: &str = r#"
    -- Schema version tracking
    CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER PRIMARY KEY
    );

    -- maintenance: one row per equipment service manual
    CREATE TABLE IF NOT EXISTS maintenance_service_manual (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        unique_id INTEGER NOT NULL UNIQUE,
        service_description TEXT NOT NULL,
        service_manual TEXT,
        content_hash TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_service_manual_unique_id
        ON maintenance_service_manual(unique_id);

    -- maintenance: parts consumed by a service, duplicates allowed
    CREATE TABLE IF NOT EXISTS maintenance_service_parts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        equipment_id INTEGER NOT NULL
            REFERENCES maintenance_service_manual(unique_id) ON DELETE CASCADE,
        part TEXT NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity >= 1)
    );
    CREATE INDEX IF NOT EXISTS idx_service_parts_equipment_id
        ON maintenance_service_parts(equipment_id);
    CREATE INDEX IF NOT EXISTS idx_service_parts_part
        ON maintenance_service_parts(part);

    -- procurement: stock levels, correlated to parts by part number only
    CREATE TABLE IF NOT EXISTS procurement_parts_stock (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        part_number TEXT NOT NULL UNIQUE,
        part_description TEXT,
        current_stock INTEGER NOT NULL DEFAULT 0 CHECK (current_stock >= 0),
        minimum_stock INTEGER NOT NULL DEFAULT 0 CHECK (minimum_stock >= 0),
        reorder_point INTEGER NOT NULL DEFAULT 0 CHECK (reorder_point >= 0),
        unit_cost REAL NOT NULL DEFAULT 0 CHECK (unit_cost >= 0),
        supplier TEXT,
        last_updated TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_parts_stock_part_number
        ON procurement_parts_stock(part_number);
    CREATE INDEX IF NOT EXISTS idx_parts_stock_current_stock
        ON procurement_parts_stock(current_stock);
    CREATE INDEX IF NOT EXISTS idx_parts_stock_reorder_point
        ON procurement_parts_stock(reorder_point);

    -- procurement: stock against aggregated maintenance demand, never materialized
    CREATE VIEW IF NOT EXISTS procurement_stock_vs_maintenance AS
    SELECT
        ps.part_number,
        ps.part_description,
        ps.current_stock,
        ps.minimum_stock,
        ps.reorder_point,
        ps.unit_cost,
        ps.supplier,
        COALESCE(demand.total_need, 0) AS total_maintenance_need,
        ps.current_stock - COALESCE(demand.total_need, 0) AS stock_after_maintenance,
        CASE
            WHEN ps.current_stock < ps.reorder_point THEN 'REORDER'
            WHEN ps.current_stock < ps.minimum_stock THEN 'LOW_STOCK'
            WHEN ps.current_stock < COALESCE(demand.total_need, 0)
                THEN 'INSUFFICIENT_FOR_MAINTENANCE'
            ELSE 'SUFFICIENT'
        END AS stock_status
    FROM procurement_parts_stock ps
    LEFT JOIN (
        SELECT part, SUM(quantity) AS total_need
        FROM maintenance_service_parts
        GROUP BY part
    ) demand ON demand.part = ps.part_number;
"#;

impl MaintenanceStore {
    /// Create tables, indexes and the reconciliation view, then check the version
    pub(super) fn init_schema(&mut self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(DDL)
            .map_err(|e| StoreError::Schema(e.to_string()))?;

        let version: Option<i32> = self
            .conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .optional()
            .map_err(|e| StoreError::Schema(e.to_string()))?
            .flatten();

        match version {
            None => {
                self.conn
                    .execute(
                        "INSERT INTO schema_version (version) VALUES (?1)",
                        params![SCHEMA_VERSION],
                    )
                    .map_err(|e| StoreError::Schema(e.to_string()))?;
                Ok(())
            }
            Some(v) if v == SCHEMA_VERSION => Ok(()),
            Some(v) => Err(StoreError::Schema(format!(
                "database schema version {} does not match expected version {}",
                v, SCHEMA_VERSION
            ))),
        }
    }

    /// Version recorded in `schema_version`
    pub fn schema_version(&self) -> Result<i32, StoreError> {
        Ok(self
            .conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?)
    }
}
