use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::generator::Corpus;
use crate::procurement::{StockEntry, StockStatus};

fn loaded_store(count: u32) -> (MaintenanceStore, Corpus) {
    let mut store = MaintenanceStore::open_in_memory().unwrap();
    let corpus = Corpus::generate(1, count).unwrap();
    store
        .load(&LoadBatch::from_corpus(&corpus), LoadOptions::default())
        .unwrap();
    (store, corpus)
}

fn stock(part: &str, current: i64, minimum: i64, reorder: i64, cost: f64) -> StockEntry {
    StockEntry {
        part_number: part.to_string(),
        part_description: "test part".to_string(),
        current_stock: current,
        minimum_stock: minimum,
        reorder_point: reorder,
        unit_cost: cost,
        supplier: "Parts Warehouse".to_string(),
    }
}

fn manual(unique_id: u32) -> ServiceManual {
    ServiceManual {
        unique_id,
        service_description: format!("Equipment {}", unique_id),
        service_manual: None,
        content_hash: None,
    }
}

#[test]
fn test_schema_version_recorded() {
    let store = MaintenanceStore::open_in_memory().unwrap();
    assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
}

#[test]
fn test_reopen_file_database() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("maintkit.db");
    {
        let mut store = MaintenanceStore::open(&path).unwrap();
        let corpus = Corpus::generate(1, 2).unwrap();
        store
            .load(&LoadBatch::from_corpus(&corpus), LoadOptions::default())
            .unwrap();
    }
    let store = MaintenanceStore::open(&path).unwrap();
    assert_eq!(store.list_equipment(None).unwrap().len(), 2);
}

#[test]
fn test_schema_version_mismatch_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("maintkit.db");
    {
        let store = MaintenanceStore::open(&path).unwrap();
        store
            .conn
            .execute("UPDATE schema_version SET version = 99", [])
            .unwrap();
    }
    assert!(matches!(
        MaintenanceStore::open(&path),
        Err(StoreError::Schema(_))
    ));
}

#[test]
fn test_load_counts() {
    let (store, corpus) = loaded_store(100);
    let listing = store.list_equipment(None).unwrap();
    assert_eq!(listing.len(), 100);
    assert_eq!(
        listing.iter().map(|e| e.parts_count as usize).sum::<usize>(),
        corpus.total_part_lines()
    );
    assert_eq!(listing[0].equipment_type(), "Turbine Engine");
}

#[test]
fn test_round_trip_parts_for_equipment() {
    let (store, corpus) = loaded_store(20);
    for item in &corpus.equipment {
        let parts = store.parts_for_equipment(item.unique_id).unwrap();
        let expected: Vec<(String, i64)> = item
            .parts
            .lines
            .iter()
            .map(|l| (l.part.clone(), i64::from(l.quantity)))
            .collect();
        let actual: Vec<(String, i64)> = parts.into_iter().map(|p| (p.part, p.quantity)).collect();
        assert_eq!(actual, expected, "equipment {}", item.unique_id);
    }
}

#[test]
fn test_manual_row_carries_description_and_content() {
    let (store, corpus) = loaded_store(3);
    let row = store.manual(2).unwrap().unwrap();
    assert_eq!(
        row.service_description,
        "Compressor - Comprehensive maintenance service including inspection, lubrication, and parts replacement"
    );
    let generated = &corpus.get(2).unwrap().manual.content;
    assert_eq!(row.service_manual.as_deref(), Some(generated.as_str()));
    assert_eq!(row.content_hash, Some(content_hash(generated)));
    assert!(store.manual(42).unwrap().is_none());
}

#[test]
fn test_delete_manual_cascades_to_parts() {
    let (mut store, _) = loaded_store(3);
    assert_eq!(store.parts_for_equipment(2).unwrap().len(), 8);

    assert!(store.delete_manual(2).unwrap());
    assert!(store.parts_for_equipment(2).unwrap().is_empty());
    assert_eq!(store.parts_for_equipment(1).unwrap().len(), 8);
    assert!(!store.delete_manual(2).unwrap());
}

#[test]
fn test_load_replaces_previous_contents() {
    let (mut store, _) = loaded_store(10);
    let corpus = Corpus::generate(1, 4).unwrap();
    let stats = store
        .load(&LoadBatch::from_corpus(&corpus), LoadOptions::default())
        .unwrap();
    assert_eq!(stats.cleared_manuals, 10);
    assert_eq!(stats.cleared_parts, 80);
    assert_eq!(stats.manuals, 4);
    assert_eq!(stats.parts, 32);
    assert_eq!(store.list_equipment(None).unwrap().len(), 4);
}

#[test]
fn test_load_keep_existing_rejects_duplicates() {
    let (mut store, _) = loaded_store(5);
    let corpus = Corpus::generate(1, 1).unwrap();
    let err = store
        .load(
            &LoadBatch::from_corpus(&corpus),
            LoadOptions {
                clear_existing: false,
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::ConstraintViolation {
            table: "maintenance_service_manual",
            ..
        }
    ));
    assert_eq!(store.list_equipment(None).unwrap().len(), 5);
}

#[test]
fn test_duplicate_unique_id_rolls_back_whole_batch() {
    let (mut store, _) = loaded_store(5);
    let batch = LoadBatch {
        manuals: vec![manual(1), manual(2), manual(2)],
        parts: vec![],
    };

    let err = store.load(&batch, LoadOptions::default()).unwrap_err();
    match err {
        StoreError::ConstraintViolation { table, row, .. } => {
            assert_eq!(table, "maintenance_service_manual");
            assert_eq!(row, "unique_id=2");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // the clear was rolled back too
    let listing = store.list_equipment(None).unwrap();
    assert_eq!(listing.len(), 5);
    assert_eq!(store.parts_for_equipment(3).unwrap().len(), 8);
}

#[test]
fn test_orphaned_part_rolls_back() {
    let (mut store, _) = loaded_store(2);
    let batch = LoadBatch {
        manuals: vec![manual(1)],
        parts: vec![ServicePart::new(1, "BEAR-001-01", 2), ServicePart::new(7, "SEAL-007-02", 1)],
    };

    let err = store.load(&batch, LoadOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        StoreError::ConstraintViolation {
            table: "maintenance_service_parts",
            ..
        }
    ));
    assert_eq!(store.list_equipment(None).unwrap().len(), 2);
}

#[test]
fn test_zero_quantity_rejected() {
    let mut store = MaintenanceStore::open_in_memory().unwrap();
    let batch = LoadBatch {
        manuals: vec![manual(1)],
        parts: vec![ServicePart::new(1, "BEAR-001-01", 0)],
    };
    let err = store.load(&batch, LoadOptions::default()).unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation { .. }));
    assert!(store.manual(1).unwrap().is_none());
}

#[test]
fn test_grease_example() {
    let mut store = MaintenanceStore::open_in_memory().unwrap();
    let batch = LoadBatch {
        manuals: vec![manual(1)],
        parts: vec![ServicePart::new(1, "GREASE-001-01", 3)],
    };
    store.load(&batch, LoadOptions::default()).unwrap();
    store.upsert_stock(&stock("GREASE-001-01", 10, 2, 5, 12.0)).unwrap();

    let rows = store.reconcile(&ReconcileFilter::default()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_maintenance_need, 3);
    assert_eq!(rows[0].stock_after_maintenance, 7);
    assert_eq!(rows[0].stock_status, StockStatus::Sufficient);
}

#[test]
fn test_aggregation_includes_duplicates() {
    let mut store = MaintenanceStore::open_in_memory().unwrap();
    let batch = LoadBatch {
        manuals: vec![manual(1), manual(2)],
        parts: vec![
            ServicePart::new(1, "GASKET-001-01", 2),
            ServicePart::new(1, "GASKET-001-01", 3),
            ServicePart::new(2, "GASKET-001-01", 4),
            ServicePart::new(2, "BELT-002-02", 1),
        ],
    };
    store.load(&batch, LoadOptions::default()).unwrap();
    store.upsert_stock(&stock("GASKET-001-01", 20, 1, 3, 4.0)).unwrap();
    store.upsert_stock(&stock("FAN-010-02", 5, 0, 2, 90.0)).unwrap();

    let rows = store.reconcile(&ReconcileFilter::default()).unwrap();
    assert_eq!(rows.len(), 2);
    let fan = &rows[0];
    assert_eq!(fan.part_number, "FAN-010-02");
    assert_eq!(fan.total_maintenance_need, 0);
    assert_eq!(fan.stock_after_maintenance, 5);
    let gasket = &rows[1];
    assert_eq!(gasket.total_maintenance_need, 9);
    assert_eq!(gasket.stock_after_maintenance, 11);
}

#[test]
fn test_reorder_precedence_in_view() {
    let mut store = MaintenanceStore::open_in_memory().unwrap();
    store.load(&LoadBatch::default(), LoadOptions::default()).unwrap();
    // above minimum and no demand, but below reorder point
    store.upsert_stock(&stock("BEAR-001-01", 4, 2, 5, 10.0)).unwrap();
    // minimum above reorder point
    store.upsert_stock(&stock("SEAL-001-02", 3, 10, 5, 10.0)).unwrap();
    store.upsert_stock(&stock("SEAL-002-02", 6, 10, 5, 10.0)).unwrap();

    let rows = store.reconcile(&ReconcileFilter::default()).unwrap();
    let statuses: Vec<_> = rows.iter().map(|r| r.stock_status).collect();
    assert_eq!(
        statuses,
        vec![StockStatus::Reorder, StockStatus::Reorder, StockStatus::LowStock]
    );
}

#[test]
fn test_view_reflects_changes_immediately() {
    let mut store = MaintenanceStore::open_in_memory().unwrap();
    let batch = LoadBatch {
        manuals: vec![manual(1)],
        parts: vec![ServicePart::new(1, "PUMP-003-01", 6)],
    };
    store.load(&batch, LoadOptions::default()).unwrap();
    store.upsert_stock(&stock("PUMP-003-01", 10, 0, 2, 150.0)).unwrap();
    let filter = ReconcileFilter::default();
    assert_eq!(store.reconcile(&filter).unwrap()[0].stock_status, StockStatus::Sufficient);

    assert!(store.set_current_stock("PUMP-003-01", 4).unwrap());
    assert_eq!(
        store.reconcile(&filter).unwrap()[0].stock_status,
        StockStatus::InsufficientForMaintenance
    );

    store.delete_manual(1).unwrap();
    let row = &store.reconcile(&filter).unwrap()[0];
    assert_eq!(row.total_maintenance_need, 0);
    assert_eq!(row.stock_status, StockStatus::Sufficient);

    assert!(!store.set_current_stock("NOPE-000-00", 1).unwrap());
}

#[test]
fn test_view_agrees_with_classify() {
    let (mut store, _) = loaded_store(100);
    let mut rng = StdRng::seed_from_u64(2024);
    store
        .populate_stock(&mut rng, PopulateOptions::default())
        .unwrap();

    let rows = store.reconcile(&ReconcileFilter::default()).unwrap();
    assert!(!rows.is_empty());
    for row in rows {
        assert_eq!(
            row.stock_status,
            StockStatus::classify(
                row.current_stock,
                row.minimum_stock,
                row.reorder_point,
                row.total_maintenance_need
            ),
            "{}",
            row.part_number
        );
        assert_eq!(
            row.stock_after_maintenance,
            row.current_stock - row.total_maintenance_need
        );
    }
}

#[test]
fn test_reconcile_filters() {
    let mut store = MaintenanceStore::open_in_memory().unwrap();
    store.upsert_stock(&stock("BEAR-001-01", 0, 1, 3, 10.0)).unwrap();
    store.upsert_stock(&stock("BEAR-011-01", 9, 1, 3, 10.0)).unwrap();
    store.upsert_stock(&stock("SEAL-001-02", 0, 1, 3, 10.0)).unwrap();

    let reorder = store
        .reconcile(&ReconcileFilter {
            status: Some(StockStatus::Reorder),
            pattern: None,
        })
        .unwrap();
    assert_eq!(reorder.len(), 2);

    let bears = store
        .reconcile(&ReconcileFilter {
            status: None,
            pattern: Some("BEAR*".to_string()),
        })
        .unwrap();
    assert_eq!(bears.len(), 2);

    let both = store
        .reconcile(&ReconcileFilter {
            status: Some(StockStatus::Reorder),
            pattern: Some("bear".to_string()),
        })
        .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].part_number, "BEAR-001-01");
}

#[test]
fn test_populate_one_row_per_distinct_part() {
    let (mut store, _) = loaded_store(100);
    let distinct = store.distinct_parts().unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let stats = store
        .populate_stock(&mut rng, PopulateOptions::default())
        .unwrap();

    assert_eq!(stats.distinct_parts, distinct.len());
    assert_eq!(stats.inserted, distinct.len());
    let items = store.list_stock(None).unwrap();
    assert_eq!(items.len(), distinct.len());
    for item in &items {
        assert!(item.current_stock >= 0);
        assert!(item.minimum_stock >= 0);
        assert!(item.reorder_point >= 0);
        assert!(item.unit_cost >= 0.0);
    }
}

#[test]
fn test_populate_keeps_existing_rows_unless_replaced() {
    let (mut store, _) = loaded_store(2);
    store.upsert_stock(&stock("BEAR-001-01", 42, 1, 3, 1.0)).unwrap();

    let mut rng = StdRng::seed_from_u64(5);
    let stats = store
        .populate_stock(&mut rng, PopulateOptions::default())
        .unwrap();
    assert_eq!(stats.existing, 1);
    assert_eq!(stats.inserted, stats.distinct_parts - 1);
    assert_eq!(store.stock_item("BEAR-001-01").unwrap().unwrap().current_stock, 42);

    let stats = store
        .populate_stock(&mut rng, PopulateOptions { replace: true })
        .unwrap();
    assert_eq!(stats.cleared, stats.distinct_parts);
    assert_eq!(stats.inserted, stats.distinct_parts);
    assert_ne!(store.stock_item("BEAR-001-01").unwrap().unwrap().current_stock, 42);
}

#[test]
fn test_populate_is_deterministic_for_seed() {
    let run = |seed| {
        let (mut store, _) = loaded_store(10);
        let mut rng = StdRng::seed_from_u64(seed);
        store
            .populate_stock(&mut rng, PopulateOptions::default())
            .unwrap();
        store
            .list_stock(None)
            .unwrap()
            .into_iter()
            .map(|i| (i.part_number, i.current_stock, i.unit_cost, i.supplier))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(11), run(11));
}

#[test]
fn test_populate_skips_blank_parts() {
    let mut store = MaintenanceStore::open_in_memory().unwrap();
    let batch = LoadBatch {
        manuals: vec![manual(1)],
        parts: vec![
            ServicePart::new(1, "  ", 1),
            ServicePart::new(1, "BELT-001-02", 1),
        ],
    };
    store.load(&batch, LoadOptions::default()).unwrap();

    let mut rng = StdRng::seed_from_u64(3);
    let stats = store
        .populate_stock(&mut rng, PopulateOptions::default())
        .unwrap();
    assert_eq!(stats.skipped_blank, 1);
    assert_eq!(stats.inserted, 1);
    assert_eq!(store.list_stock(None).unwrap().len(), 1);
}

#[test]
fn test_populate_keeps_whitespace_variants_distinct() {
    let mut store = MaintenanceStore::open_in_memory().unwrap();
    let batch = LoadBatch {
        manuals: vec![manual(1)],
        parts: vec![
            ServicePart::new(1, "GREASE-001-01", 3),
            ServicePart::new(1, " GREASE-001-01", 2),
        ],
    };
    store.load(&batch, LoadOptions::default()).unwrap();

    let mut rng = StdRng::seed_from_u64(9);
    let stats = store
        .populate_stock(&mut rng, PopulateOptions::default())
        .unwrap();
    assert_eq!(stats.inserted, 2);
    assert_eq!(stats.skipped_blank, 0);

    let rows = store.reconcile(&ReconcileFilter::default()).unwrap();
    let need = |part: &str| {
        rows.iter()
            .find(|r| r.part_number == part)
            .map(|r| r.total_maintenance_need)
    };
    assert_eq!(need("GREASE-001-01"), Some(3));
    assert_eq!(need(" GREASE-001-01"), Some(2));

    let padded = store.stock_item(" GREASE-001-01").unwrap().unwrap();
    assert_eq!(padded.part_description.as_deref(), Some("Grease component for maintenance"));
}

#[test]
fn test_stock_summary() {
    let mut store = MaintenanceStore::open_in_memory().unwrap();
    store.upsert_stock(&stock("BEAR-001-01", 10, 1, 3, 2.0)).unwrap();
    store.upsert_stock(&stock("SEAL-001-02", 3, 1, 3, 5.0)).unwrap();
    store.upsert_stock(&stock("GREASE-001-01", 1, 2, 4, 8.5)).unwrap();
    store.upsert_stock(&stock("OIL-001-01", 0, 2, 4, 12.0)).unwrap();

    let summary = store.stock_summary().unwrap();
    assert_eq!(summary.total_parts, 4);
    assert_eq!(summary.in_stock, 1);
    assert_eq!(summary.low_stock, 1);
    assert_eq!(summary.out_of_stock, 2);
    assert!((summary.inventory_value - (20.0 + 15.0 + 8.5)).abs() < 1e-9);
    let lowest: Vec<_> = summary.lowest.iter().map(|i| i.part_number.as_str()).collect();
    assert_eq!(lowest, vec!["OIL-001-01", "GREASE-001-01", "SEAL-001-02"]);
}

#[test]
fn test_empty_stock_summary() {
    let store = MaintenanceStore::open_in_memory().unwrap();
    let summary = store.stock_summary().unwrap();
    assert_eq!(summary, StockSummary::default());
}

#[test]
fn test_cost_analysis_for_equipment() {
    let (mut store, _) = loaded_store(1);
    store.upsert_stock(&stock("BEAR-001-01", 5, 1, 3, 10.0)).unwrap();

    let lines = store.cost_analysis(&CostScope::Equipment(1)).unwrap();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0].part, "BEAR-001-01");
    assert_eq!(lines[0].line_cost(), Some(30.0));
    assert_eq!(lines.iter().filter(|l| l.unit_cost.is_none()).count(), 7);
}

#[test]
fn test_cost_analysis_by_pattern_sums_demand() {
    let (mut store, _) = loaded_store(20);
    store.upsert_stock(&stock("GREASE-001-01", 5, 2, 4, 10.0)).unwrap();

    let lines = store
        .cost_analysis(&CostScope::Pattern("GREASE-001-*".to_string()))
        .unwrap();
    let parts: Vec<_> = lines.iter().map(|l| l.part.as_str()).collect();
    assert_eq!(parts, vec!["GREASE-001-01", "GREASE-001-04"]);
    assert_eq!(lines[0].quantity, 3);
    assert_eq!(lines[0].unit_cost, Some(10.0));
}

#[test]
fn test_update_manual_content() {
    let (mut store, corpus) = loaded_store(3);
    let mut manuals: Vec<_> = corpus.equipment.iter().map(|e| e.manual.clone()).collect();
    manuals[1].content.push_str("\n## Addendum\n");
    manuals.push(crate::generator::ManualDocument::from_content(
        50,
        "# orphan".to_string(),
    ));

    let stats = store.update_manual_content(&manuals).unwrap();
    assert_eq!(stats.updated, 1);
    assert_eq!(stats.unchanged, 2);
    assert_eq!(stats.missing, vec![50]);

    let row = store.manual(2).unwrap().unwrap();
    assert!(row.service_manual.unwrap().ends_with("## Addendum\n"));
    assert!(store.manual(50).unwrap().is_none());
}

#[test]
fn test_query_raw_is_read_only() {
    let (store, _) = loaded_store(5);
    let rows = store
        .query_raw("SELECT COUNT(*) FROM maintenance_service_manual")
        .unwrap();
    assert_eq!(rows, vec![vec!["5".to_string()]]);

    let columns = store
        .query_columns("SELECT part_number, stock_status FROM procurement_stock_vs_maintenance")
        .unwrap();
    assert_eq!(columns, vec!["part_number", "stock_status"]);

    assert!(matches!(
        store.query_raw("DELETE FROM maintenance_service_manual"),
        Err(StoreError::NotReadOnly(_))
    ));
}

#[test]
fn test_query_raw_rejects_attach() {
    let tmp = tempfile::tempdir().unwrap();
    let target = tmp.path().join("side.db");
    let (store, _) = loaded_store(1);

    for sql in [
        format!("ATTACH DATABASE '{}' AS side", target.display()),
        format!("  -- note\n/* x */ attach '{}' as side", target.display()),
        "DETACH DATABASE side".to_string(),
    ] {
        assert!(matches!(
            store.query_raw(&sql),
            Err(StoreError::NotReadOnly(_))
        ));
    }
    assert!(!target.exists());
}

#[test]
fn test_describe_lists_relations() {
    let (store, _) = loaded_store(2);
    let relations = store.describe().unwrap();
    let names: Vec<_> = relations.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, schema::RELATIONS.to_vec());
    assert_eq!(relations[0].rows, 2);
    assert_eq!(relations[1].rows, 16);
    assert_eq!(relations[3].kind, "view");
    assert!(relations[3]
        .columns
        .iter()
        .any(|c| c.name == "stock_status"));
}

#[test]
fn test_like_pattern() {
    assert_eq!(like_pattern("BEAR*"), "BEAR%");
    assert_eq!(like_pattern("bear"), "%bear%");
    assert_eq!(like_pattern("%-001-%"), "%-001-%");
    assert_eq!(like_pattern("GEAR_007"), "%GEAR_007%");
}
