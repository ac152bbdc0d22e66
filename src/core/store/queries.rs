//! Read-only queries and reports

use rusqlite::types::{Type, Value};
use rusqlite::{params, OptionalExtension, Row};

use super::schema::RELATIONS;
use super::{
    like_pattern, ColumnInfo, CostLine, CostScope, EquipmentSummary, MaintenanceStore,
    ReconcileFilter, ReconciliationRow, RelationInfo, ServiceManual, ServicePart, StockItem,
    StockSummary, StoreError,
};
use crate::procurement::StockStatus;

/// Items listed in the stock summary
const LOWEST_STOCK_LIMIT: usize = 10;

const STOCK_COLUMNS: &str = "part_number, part_description, current_stock, minimum_stock, \
                             reorder_point, unit_cost, supplier, last_updated";

impl MaintenanceStore {
    /// Get one service manual by equipment id
    pub fn manual(&self, unique_id: u32) -> Result<Option<ServiceManual>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT unique_id, service_description, service_manual, content_hash
                 FROM maintenance_service_manual
                 WHERE unique_id = ?1",
                params![unique_id],
                |row| {
                    Ok(ServiceManual {
                        unique_id: row.get(0)?,
                        service_description: row.get(1)?,
                        service_manual: row.get(2)?,
                        content_hash: row.get(3)?,
                    })
                },
            )
            .optional()?)
    }

    /// Parts for a piece of equipment, in load order
    pub fn parts_for_equipment(&self, unique_id: u32) -> Result<Vec<ServicePart>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT equipment_id, part, quantity
             FROM maintenance_service_parts
             WHERE equipment_id = ?1
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![unique_id], |row| {
            Ok(ServicePart {
                equipment_id: row.get(0)?,
                part: row.get(1)?,
                quantity: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Equipment with parts count and total quantity, ordered by id
    pub fn list_equipment(&self, limit: Option<usize>) -> Result<Vec<EquipmentSummary>, StoreError> {
        let limit = limit.map_or(-1, |l| l as i64);
        let mut stmt = self.conn.prepare(
            "SELECT sm.unique_id, sm.service_description,
                    COUNT(sp.id), COALESCE(SUM(sp.quantity), 0)
             FROM maintenance_service_manual sm
             LEFT JOIN maintenance_service_parts sp ON sp.equipment_id = sm.unique_id
             GROUP BY sm.unique_id, sm.service_description
             ORDER BY sm.unique_id
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(EquipmentSummary {
                unique_id: row.get(0)?,
                service_description: row.get(1)?,
                parts_count: row.get(2)?,
                total_quantity: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Distinct part identifiers referenced by maintenance, sorted
    pub fn distinct_parts(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT part FROM maintenance_service_parts ORDER BY part")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Read the reconciliation view
    ///
    /// The view is evaluated on every call, so stock or demand changes show
    /// up immediately.
    pub fn reconcile(&self, filter: &ReconcileFilter) -> Result<Vec<ReconciliationRow>, StoreError> {
        let mut sql = String::from(
            "SELECT part_number, part_description, current_stock, minimum_stock,
                    reorder_point, unit_cost, supplier, total_maintenance_need,
                    stock_after_maintenance, stock_status
             FROM procurement_stock_vs_maintenance
             WHERE 1 = 1",
        );
        let mut args: Vec<String> = Vec::new();

        if let Some(status) = filter.status {
            args.push(status.as_str().to_string());
            sql.push_str(&format!(" AND stock_status = ?{}", args.len()));
        }
        if let Some(pattern) = &filter.pattern {
            args.push(like_pattern(pattern));
            sql.push_str(&format!(" AND part_number LIKE ?{}", args.len()));
        }
        sql.push_str(" ORDER BY part_number");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), reconciliation_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Stock row for a part number
    pub fn stock_item(&self, part_number: &str) -> Result<Option<StockItem>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM procurement_parts_stock WHERE part_number = ?1",
                    STOCK_COLUMNS
                ),
                params![part_number],
                stock_item,
            )
            .optional()?)
    }

    /// Stock rows, optionally filtered by part-number pattern
    pub fn list_stock(&self, pattern: Option<&str>) -> Result<Vec<StockItem>, StoreError> {
        let like = pattern.map_or_else(|| "%".to_string(), like_pattern);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM procurement_parts_stock
             WHERE part_number LIKE ?1
             ORDER BY part_number",
            STOCK_COLUMNS
        ))?;
        let rows = stmt.query_map(params![like], stock_item)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Stock level counts, inventory value and the lowest items
    pub fn stock_summary(&self) -> Result<StockSummary, StoreError> {
        let (total_parts, in_stock, low_stock, out_of_stock, inventory_value) =
            self.conn.query_row(
                "SELECT
                    COUNT(*),
                    COALESCE(SUM(CASE WHEN current_stock > reorder_point THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN current_stock <= reorder_point
                                       AND current_stock > minimum_stock THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN current_stock <= minimum_stock THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(current_stock * unit_cost), 0.0)
                 FROM procurement_parts_stock",
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, f64>(4)?,
                    ))
                },
            )?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM procurement_parts_stock
             WHERE current_stock <= reorder_point
             ORDER BY current_stock, part_number
             LIMIT ?1",
            STOCK_COLUMNS
        ))?;
        let lowest = stmt
            .query_map(params![LOWEST_STOCK_LIMIT as i64], stock_item)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StockSummary {
            total_parts,
            in_stock,
            low_stock,
            out_of_stock,
            inventory_value,
            lowest,
        })
    }

    /// Maintenance demand priced against stock
    ///
    /// For one piece of equipment every parts line is kept; for a pattern the
    /// demand is summed per part across all equipment.
    pub fn cost_analysis(&self, scope: &CostScope) -> Result<Vec<CostLine>, StoreError> {
        let lines = match scope {
            CostScope::Equipment(unique_id) => {
                let mut stmt = self.conn.prepare(
                    "SELECT sp.part, sp.quantity, ps.unit_cost, ps.supplier
                     FROM maintenance_service_parts sp
                     LEFT JOIN procurement_parts_stock ps ON ps.part_number = sp.part
                     WHERE sp.equipment_id = ?1
                     ORDER BY sp.id",
                )?;
                let rows = stmt.query_map(params![unique_id], cost_line)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            CostScope::Pattern(pattern) => {
                let mut stmt = self.conn.prepare(
                    "SELECT sp.part, SUM(sp.quantity), ps.unit_cost, ps.supplier
                     FROM maintenance_service_parts sp
                     LEFT JOIN procurement_parts_stock ps ON ps.part_number = sp.part
                     WHERE sp.part LIKE ?1
                     GROUP BY sp.part, ps.unit_cost, ps.supplier
                     ORDER BY sp.part",
                )?;
                let rows = stmt.query_map(params![like_pattern(pattern)], cost_line)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(lines)
    }

    /// Tables and the view with their columns and row counts
    pub fn describe(&self) -> Result<Vec<RelationInfo>, StoreError> {
        let mut relations = Vec::with_capacity(RELATIONS.len());

        for name in RELATIONS {
            let kind: Option<String> = self
                .conn
                .query_row(
                    "SELECT type FROM sqlite_master WHERE name = ?1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(kind) = kind else {
                return Err(StoreError::Schema(format!("missing relation: {}", name)));
            };

            let mut stmt = self
                .conn
                .prepare(&format!("PRAGMA table_info({})", name))?;
            let columns = stmt
                .query_map([], |row| {
                    Ok(ColumnInfo {
                        name: row.get(1)?,
                        decl_type: row.get(2)?,
                        not_null: row.get::<_, i64>(3)? != 0,
                        primary_key: row.get::<_, i64>(5)? != 0,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            let rows: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", name), [], |row| {
                    row.get(0)
                })?;

            relations.push(RelationInfo {
                name: name.to_string(),
                kind,
                columns,
                rows,
            });
        }

        Ok(relations)
    }

    /// Execute a read-only SQL query and return rows as strings
    ///
    /// `ATTACH`/`DETACH` count as writes: SQLite reports them read-only but
    /// attaching a missing path creates the file.
    pub fn query_raw(&self, sql: &str) -> Result<Vec<Vec<String>>, StoreError> {
        if matches!(leading_keyword(sql).as_deref(), Some("ATTACH" | "DETACH")) {
            return Err(StoreError::NotReadOnly(sql.trim().to_string()));
        }
        let mut stmt = self.conn.prepare(sql)?;
        if !stmt.readonly() {
            return Err(StoreError::NotReadOnly(sql.trim().to_string()));
        }
        let column_count = stmt.column_count();

        let rows = stmt.query_map([], |row| {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value = match row.get::<_, Value>(i)? {
                    Value::Null => "NULL".to_string(),
                    Value::Integer(i) => i.to_string(),
                    Value::Real(f) => f.to_string(),
                    Value::Text(s) => s,
                    Value::Blob(_) => "<blob>".to_string(),
                };
                values.push(value);
            }
            Ok(values)
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Column names of a query
    pub fn query_columns(&self, sql: &str) -> Result<Vec<String>, StoreError> {
        let stmt = self.conn.prepare(sql)?;
        Ok(stmt.column_names().iter().map(|s| s.to_string()).collect())
    }
}

/// First keyword of a statement, upper-cased, skipping comments
fn leading_keyword(sql: &str) -> Option<String> {
    let mut rest = sql;
    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/").map_or("", |(_, tail)| tail);
        } else {
            break;
        }
    }
    let word: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    (!word.is_empty()).then(|| word.to_ascii_uppercase())
}

fn stock_item(row: &Row<'_>) -> rusqlite::Result<StockItem> {
    Ok(StockItem {
        part_number: row.get(0)?,
        part_description: row.get(1)?,
        current_stock: row.get(2)?,
        minimum_stock: row.get(3)?,
        reorder_point: row.get(4)?,
        unit_cost: row.get(5)?,
        supplier: row.get(6)?,
        last_updated: row.get(7)?,
    })
}

fn cost_line(row: &Row<'_>) -> rusqlite::Result<CostLine> {
    Ok(CostLine {
        part: row.get(0)?,
        quantity: row.get(1)?,
        unit_cost: row.get(2)?,
        supplier: row.get(3)?,
    })
}

fn reconciliation_row(row: &Row<'_>) -> rusqlite::Result<ReconciliationRow> {
    let status: String = row.get(9)?;
    let stock_status = status
        .parse::<StockStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, e.into()))?;

    Ok(ReconciliationRow {
        part_number: row.get(0)?,
        part_description: row.get(1)?,
        current_stock: row.get(2)?,
        minimum_stock: row.get(3)?,
        reorder_point: row.get(4)?,
        unit_cost: row.get(5)?,
        supplier: row.get(6)?,
        total_maintenance_need: row.get(7)?,
        stock_after_maintenance: row.get(8)?,
        stock_status,
    })
}
