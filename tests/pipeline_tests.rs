//! End-to-end decomposition tests over Iowa-style liquor sales exports

use std::collections::HashSet;

use star_schema::config::PipelineConfig;
use star_schema::ingest::{ChunkSource, SourceOptions};
use star_schema::models::{ProjectedBatch, Value};
use star_schema::pipeline::{
    Accumulator, StarPipeline, StarSchema, decompose_file, dedup_first_seen,
};
use star_schema::schema::StarSchemaSpec;
use star_schema::StarError;
use tempfile::TempDir;

const HEADER: &str = "Invoice/Item Number,Date,Store Number,Store Name,Address,City,Zip Code,\
Store Location,County Number,County,Category,Category Name,Vendor Number,Vendor Name,\
Item Number,Item Description,Pack,Bottle Volume (ml),State Bottle Cost,State Bottle Retail,\
Bottles Sold,Sale (Dollars),Volume Sold (Liters),Volume Sold (Gallons)";

fn sale(
    invoice: &str,
    store: &str,
    city: &str,
    vendor: &str,
    vendor_name: &str,
    item: u32,
) -> String {
    format!(
        "{invoice},11/04/2015,{store},Store {store},1 Main St,{city},50010,,85,Story,1012100,\
CANADIAN WHISKIES,{vendor},{vendor_name},{item},Item {item},12,750,$7.47,$11.21,12,$134.52,9.00,2.38"
    )
}

fn export(rows: &[String]) -> String {
    let mut out = String::from(HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out.push('\n');
    out
}

fn sample_rows() -> Vec<String> {
    vec![
        sale("INV-01", "2633", "Ames", "260", "DIAGEO AMERICAS", 11296),
        sale("INV-02", "2634", "Perry", "65", "JIM BEAM BRANDS", 26827),
        sale("INV-03", "2633", "Amess-typo", "260", "Diageo", 11296),
        sale("INV-04", "4829", "Adel", "370", "PERNOD RICARD USA", 38176),
        sale("INV-05", "2634", "Perry", "65", "JIM BEAM BRANDS", 11296),
        sale("INV-06", "2633", "Ames", "434", "LUXCO INC", 64866),
        sale("INV-07", "5102", "Boone", "260", "DIAGEO AMERICAS", 38176),
    ]
}

fn run(input: &str, batch_size: usize) -> StarSchema {
    let schema = StarSchemaSpec::default();
    let options = SourceOptions::default().with_batch_size(batch_size);
    let source = ChunkSource::from_reader(input.as_bytes(), &schema, &options).unwrap();
    let mut pipeline = StarPipeline::new(&schema).unwrap();
    pipeline.run_source(source).unwrap();
    pipeline.finish().unwrap()
}

fn fingerprints(star: &StarSchema) -> Vec<String> {
    star.iter().map(|t| t.fingerprint()).collect()
}

#[test]
fn test_six_tables_in_spec_order() {
    let star = run(&export(&sample_rows()), 3);
    let names: Vec<&str> = star.iter().map(|t| t.name()).collect();
    assert_eq!(
        names,
        vec!["transaction", "store", "county", "category", "vendor", "item"]
    );
    assert_eq!(star.stats.records_read, 7);
    assert_eq!(star.stats.batches_processed, 3);
    assert_eq!(
        star.fact_table(&StarSchemaSpec::default()).unwrap().name(),
        "transaction"
    );
}

#[test]
fn test_every_table_has_unique_keys() {
    let star = run(&export(&sample_rows()), 2);
    for table in star.iter() {
        let keys: HashSet<&Value> = table.keys().collect();
        assert_eq!(keys.len(), table.len(), "duplicate key in {}", table.name());
    }

    assert_eq!(star.table("transaction").unwrap().len(), 7);
    assert_eq!(star.table("store").unwrap().len(), 4);
    assert_eq!(star.table("county").unwrap().len(), 1);
    assert_eq!(star.table("vendor").unwrap().len(), 4);
    assert_eq!(star.table("item").unwrap().len(), 4);
}

#[test]
fn test_first_seen_wins_across_chunk_boundary() {
    let rows = vec![
        sale("INV-01", "2633", "Ames", "260", "DIAGEO AMERICAS", 1),
        sale("INV-02", "2634", "Perry", "260", "DIAGEO AMERICAS", 1),
        sale("INV-03", "2633", "Amess-typo", "260", "DIAGEO AMERICAS", 1),
    ];
    let star = run(&export(&rows), 2);

    let store = star.table("store").unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(
        store.get(&Value::Float(2633.0)).unwrap().get("City"),
        Some(&Value::from("Ames"))
    );
    assert_eq!(
        store.get(&Value::Float(2634.0)).unwrap().get("City"),
        Some(&Value::from("Perry"))
    );
}

#[test]
fn test_later_duplicates_never_update_fields() {
    let star = run(&export(&sample_rows()), 1);
    let vendor = star.table("vendor").unwrap();
    assert_eq!(
        vendor.get(&Value::Float(260.0)).unwrap().get("Vendor Name"),
        Some(&Value::from("DIAGEO AMERICAS"))
    );
}

#[test]
fn test_batch_size_does_not_change_result() {
    let input = export(&sample_rows());
    let whole = fingerprints(&run(&input, 10_000));
    for batch_size in [1, 2, 3, 5] {
        assert_eq!(
            fingerprints(&run(&input, batch_size)),
            whole,
            "batch size {}",
            batch_size
        );
    }
}

#[test]
fn test_merge_is_associative_under_first_seen_wins() {
    let rows = sample_rows();
    let (first, second) = rows.split_at(3);

    let combined = run(&export(&rows), 2);
    let left = run(&export(first), 2);
    let right = run(&export(second), 2);

    for table in combined.iter() {
        let a = left.table(table.name()).unwrap();
        let b = right.table(table.name()).unwrap();
        let merged = dedup_first_seen(
            a.records().iter().chain(b.records()).cloned(),
            table.key_index(),
        );
        assert_eq!(merged.as_slice(), table.records(), "table {}", table.name());
    }
}

#[test]
fn test_runs_are_deterministic() {
    let input = export(&sample_rows());
    let first = run(&input, 3);
    let second = run(&input, 3);
    assert_eq!(fingerprints(&first), fingerprints(&second));

    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.records(), b.records());
    }
}

#[test]
fn test_missing_keys_collapse_to_one_record() {
    let rows = vec![
        sale("INV-01", "2633", "Ames", "", "UNKNOWN A", 1),
        sale("INV-02", "2633", "Ames", "260", "DIAGEO AMERICAS", 1),
        sale("INV-03", "2633", "Ames", "", "UNKNOWN B", 1),
        sale("INV-04", "2633", "Ames", "", "UNKNOWN C", 1),
    ];
    let star = run(&export(&rows), 2);

    let vendor = star.table("vendor").unwrap();
    assert_eq!(vendor.len(), 2);
    let missing = vendor.get(&Value::Missing).unwrap();
    assert_eq!(missing.get("Vendor Name"), Some(&Value::from("UNKNOWN A")));
}

#[test]
fn test_malformed_row_is_skipped_without_halting() {
    let rows = vec![
        sale("INV-01", "2633", "Ames", "260", "DIAGEO AMERICAS", 1),
        "INV-BAD,11/04/2015,2633,only a few fields".to_string(),
        sale("INV-02", "2634", "Perry", "65", "JIM BEAM BRANDS", 2),
    ];
    let star = run(&export(&rows), 10);

    let fact = star.table("transaction").unwrap();
    let invoices: Vec<String> = fact.keys().map(ToString::to_string).collect();
    assert_eq!(invoices, vec!["INV-01", "INV-02"]);
    assert_eq!(star.stats.records_read, 2);
    assert_eq!(star.stats.records_skipped, 1);
    assert!(star.iter().all(|t| t.keys().all(|k| k.to_string() != "INV-BAD")));
}

#[test]
fn test_row_with_bad_date_is_skipped() {
    let mut bad = sale("INV-02", "2634", "Perry", "65", "JIM BEAM BRANDS", 2);
    bad = bad.replace("11/04/2015", "not a date");
    let rows = vec![sale("INV-01", "2633", "Ames", "260", "DIAGEO AMERICAS", 1), bad];
    let star = run(&export(&rows), 10);

    assert_eq!(star.table("transaction").unwrap().len(), 1);
    assert_eq!(star.table("store").unwrap().len(), 1);
    assert_eq!(star.stats.records_skipped, 1);
}

#[test]
fn test_values_are_typed_consistently_across_chunks() {
    let star = run(&export(&sample_rows()), 1);
    let fact = star.table("transaction").unwrap();
    for record in fact.records() {
        assert!(matches!(record.get("Date"), Some(Value::Date(_))));
        assert!(matches!(record.get("Store Number"), Some(Value::Float(_))));
        assert!(matches!(record.get("Bottles Sold"), Some(Value::Integer(12))));
    }
}

#[test]
fn test_missing_header_column_fails_before_processing() {
    let input = "Invoice/Item Number,Date\nINV-01,11/04/2015\n";
    let schema = StarSchemaSpec::default();
    let result = ChunkSource::from_reader(input.as_bytes(), &schema, &SourceOptions::default());
    assert!(matches!(result, Err(StarError::MissingColumn { .. })));
}

#[test]
fn test_append_after_finalize_is_rejected() {
    let schema = StarSchemaSpec::default();
    let spec = schema.table("county").unwrap();
    let mut accumulator = Accumulator::new(spec).unwrap();
    let table = accumulator.finalize().unwrap();
    assert!(table.is_empty());

    let fields: std::sync::Arc<[String]> = spec.columns.iter().cloned().collect();
    let late = ProjectedBatch::new("county", 9, fields, 0, Vec::new());
    assert!(matches!(
        accumulator.append(late),
        Err(StarError::LateAppend { table }) if table == "county"
    ));
}

#[test]
fn test_decompose_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Iowa_Liquor_Sales.csv");
    std::fs::write(&path, export(&sample_rows())).unwrap();

    let mut config = PipelineConfig::default();
    config.source.batch_size = 4;
    let star = decompose_file(&config, &path).unwrap();
    assert_eq!(star.stats.batches_processed, 2);
    assert_eq!(star.table("store").unwrap().len(), 4);
    assert!(star.stats.bytes_processed > 0);
}

#[test]
fn test_unreadable_source_yields_no_tables() {
    let dir = TempDir::new().unwrap();
    let result = decompose_file(&PipelineConfig::default(), dir.path().join("missing.csv"));
    assert!(matches!(result, Err(StarError::SourceUnavailable { .. })));
}
