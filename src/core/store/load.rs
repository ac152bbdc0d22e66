//! Batch writes: manual/parts loads, manual content refresh and stock population

use std::collections::BTreeSet;

use chrono::Utc;
use rand::Rng;
use rusqlite::{params, OptionalExtension};
use tracing::{debug, info, warn};

use super::schema::{PARTS_STOCK_TABLE, SERVICE_MANUAL_TABLE, SERVICE_PARTS_TABLE};
use super::{
    content_hash, ContentUpdateStats, LoadOptions, LoadStats, MaintenanceStore, PopulateOptions,
    PopulateStats, ServiceManual, ServicePart, StoreError,
};
use crate::generator::{Corpus, ManualDocument};
use crate::procurement::{synthesize, StockEntry};

/// Manual and part rows to load together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadBatch {
    pub manuals: Vec<ServiceManual>,
    pub parts: Vec<ServicePart>,
}

impl LoadBatch {
    /// Rows for every piece of equipment in a corpus, full manual text included
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let mut batch = Self::default();
        for item in &corpus.equipment {
            batch.manuals.push(ServiceManual {
                unique_id: item.unique_id,
                service_description: item.manual.service_description(),
                service_manual: Some(item.manual.content.clone()),
                content_hash: Some(content_hash(&item.manual.content)),
            });
            batch.parts.extend(
                item.parts
                    .lines
                    .iter()
                    .map(|l| ServicePart::new(item.unique_id, &l.part, i64::from(l.quantity))),
            );
        }
        batch
    }
}

impl MaintenanceStore {
    /// Load manuals then parts in one transaction
    ///
    /// Any constraint failure (duplicate id, part for an unknown manual,
    /// quantity below one) rolls back the whole batch, including the clear.
    pub fn load(&mut self, batch: &LoadBatch, options: LoadOptions) -> Result<LoadStats, StoreError> {
        let tx = self.conn.transaction()?;
        let mut stats = LoadStats::default();

        if options.clear_existing {
            stats.cleared_parts = tx.execute("DELETE FROM maintenance_service_parts", [])?;
            stats.cleared_manuals = tx.execute("DELETE FROM maintenance_service_manual", [])?;
            debug!(
                manuals = stats.cleared_manuals,
                parts = stats.cleared_parts,
                "cleared existing maintenance data"
            );
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO maintenance_service_manual
                    (unique_id, service_description, service_manual, content_hash)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for manual in &batch.manuals {
                stmt.execute(params![
                    manual.unique_id,
                    manual.service_description,
                    manual.service_manual,
                    manual.content_hash,
                ])
                .map_err(|e| {
                    StoreError::on_write(e, SERVICE_MANUAL_TABLE, || {
                        format!("unique_id={}", manual.unique_id)
                    })
                })?;
                stats.manuals += 1;
            }
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO maintenance_service_parts (equipment_id, part, quantity)
                 VALUES (?1, ?2, ?3)",
            )?;
            for part in &batch.parts {
                stmt.execute(params![part.equipment_id, part.part, part.quantity])
                    .map_err(|e| {
                        StoreError::on_write(e, SERVICE_PARTS_TABLE, || {
                            format!(
                                "equipment_id={} part={} quantity={}",
                                part.equipment_id, part.part, part.quantity
                            )
                        })
                    })?;
                stats.parts += 1;
            }
        }

        tx.commit()?;
        info!(manuals = stats.manuals, parts = stats.parts, "load committed");
        Ok(stats)
    }

    /// Refresh the stored text of existing manuals
    ///
    /// Only rows that already exist are touched; ids without a row are reported.
    pub fn update_manual_content(
        &mut self,
        manuals: &[ManualDocument],
    ) -> Result<ContentUpdateStats, StoreError> {
        let tx = self.conn.transaction()?;
        let mut stats = ContentUpdateStats::default();

        for manual in manuals {
            let hash = content_hash(&manual.content);
            let existing: Option<Option<String>> = tx
                .query_row(
                    "SELECT content_hash FROM maintenance_service_manual WHERE unique_id = ?1",
                    params![manual.unique_id],
                    |row| row.get(0),
                )
                .optional()?;

            match existing {
                None => {
                    warn!(unique_id = manual.unique_id, "no stored manual, skipping");
                    stats.missing.push(manual.unique_id);
                }
                Some(Some(stored)) if stored == hash => stats.unchanged += 1,
                Some(_) => {
                    tx.execute(
                        "UPDATE maintenance_service_manual
                         SET service_manual = ?1, content_hash = ?2
                         WHERE unique_id = ?3",
                        params![manual.content, hash, manual.unique_id],
                    )?;
                    stats.updated += 1;
                }
            }
        }

        tx.commit()?;
        info!(
            updated = stats.updated,
            unchanged = stats.unchanged,
            missing = stats.missing.len(),
            "manual content refreshed"
        );
        Ok(stats)
    }

    /// Create a stock row for every distinct part referenced by maintenance
    ///
    /// Existing rows are kept unless `replace` is set, in which case all stock
    /// is deleted first. Blank part identifiers are skipped; others are stored
    /// exactly as maintenance references them.
    pub fn populate_stock<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        options: PopulateOptions,
    ) -> Result<PopulateStats, StoreError> {
        let parts = self.distinct_parts()?;
        let tx = self.conn.transaction()?;
        let mut stats = PopulateStats {
            distinct_parts: parts.len(),
            ..Default::default()
        };

        if options.replace {
            stats.cleared = tx.execute("DELETE FROM procurement_parts_stock", [])?;
        }

        let existing: BTreeSet<String> = {
            let mut stmt = tx.prepare("SELECT part_number FROM procurement_parts_stock")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect::<Result<_, _>>()?
        };

        let now = timestamp();
        for part in &parts {
            let part_number = part.trim();
            if part_number.is_empty() {
                warn!(part = ?part, "blank part identifier in service parts, skipping");
                stats.skipped_blank += 1;
                continue;
            }
            if existing.contains(part.as_str()) {
                stats.existing += 1;
                continue;
            }

            // Keep the identifier byte-for-byte so the view's join finds its demand
            let mut entry = synthesize(part_number, rng);
            entry.part_number = part.clone();
            insert_stock(&tx, &entry, &now)?;
            stats.inserted += 1;
        }

        tx.commit()?;
        info!(
            inserted = stats.inserted,
            existing = stats.existing,
            skipped = stats.skipped_blank,
            "stock populated"
        );
        Ok(stats)
    }

    /// Insert or overwrite one stock row
    pub fn upsert_stock(&mut self, entry: &StockEntry) -> Result<(), StoreError> {
        let now = timestamp();
        self.conn
            .execute(
                "INSERT INTO procurement_parts_stock
                    (part_number, part_description, current_stock, minimum_stock,
                     reorder_point, unit_cost, supplier, last_updated)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(part_number) DO UPDATE SET
                    part_description = excluded.part_description,
                    current_stock = excluded.current_stock,
                    minimum_stock = excluded.minimum_stock,
                    reorder_point = excluded.reorder_point,
                    unit_cost = excluded.unit_cost,
                    supplier = excluded.supplier,
                    last_updated = excluded.last_updated",
                params![
                    entry.part_number,
                    entry.part_description,
                    entry.current_stock,
                    entry.minimum_stock,
                    entry.reorder_point,
                    entry.unit_cost,
                    entry.supplier,
                    now,
                ],
            )
            .map_err(|e| {
                StoreError::on_write(e, PARTS_STOCK_TABLE, || {
                    format!("part_number={}", entry.part_number)
                })
            })?;
        Ok(())
    }

    /// Set the current stock of a part, returning false if the part has no row
    pub fn set_current_stock(&mut self, part_number: &str, current: i64) -> Result<bool, StoreError> {
        let changed = self
            .conn
            .execute(
                "UPDATE procurement_parts_stock
                 SET current_stock = ?1, last_updated = ?2
                 WHERE part_number = ?3",
                params![current, timestamp(), part_number],
            )
            .map_err(|e| {
                StoreError::on_write(e, PARTS_STOCK_TABLE, || {
                    format!("part_number={} current_stock={}", part_number, current)
                })
            })?;
        Ok(changed > 0)
    }

    /// Delete a manual; its parts go with it
    pub fn delete_manual(&mut self, unique_id: u32) -> Result<bool, StoreError> {
        let deleted = self.conn.execute(
            "DELETE FROM maintenance_service_manual WHERE unique_id = ?1",
            params![unique_id],
        )?;
        Ok(deleted > 0)
    }
}

fn insert_stock(
    tx: &rusqlite::Transaction<'_>,
    entry: &StockEntry,
    now: &str,
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT INTO procurement_parts_stock
            (part_number, part_description, current_stock, minimum_stock,
             reorder_point, unit_cost, supplier, last_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            entry.part_number,
            entry.part_description,
            entry.current_stock,
            entry.minimum_stock,
            entry.reorder_point,
            entry.unit_cost,
            entry.supplier,
            now,
        ],
    )
    .map_err(|e| {
        StoreError::on_write(e, PARTS_STOCK_TABLE, || {
            format!("part_number={}", entry.part_number)
        })
    })?;
    Ok(())
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
