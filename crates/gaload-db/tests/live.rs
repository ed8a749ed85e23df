//! Live warehouse tests, ignored by default.
//!
//! Run with `cargo test -p gaload-db -- --ignored` against a database
//! described by `GALOAD_TEST_WAREHOUSE_JSON` (same JSON shape as the
//! credential file). The target schema must contain:
//!
//! ```sql
//! CREATE TABLE live_load_test ("ga:pagePath" TEXT, "ga:pageviews" TEXT);
//! ```

use gaload_core::WarehouseCredentials;
use gaload_db::{connect, insert_rows, PoolConfig, QualifiedTable};

fn live_credentials() -> Option<WarehouseCredentials> {
    let raw = std::env::var("GALOAD_TEST_WAREHOUSE_JSON").ok()?;
    Some(WarehouseCredentials::parse(&raw, "GALOAD_TEST_WAREHOUSE_JSON").expect("valid test creds"))
}

#[tokio::test]
#[ignore = "requires a live warehouse (GALOAD_TEST_WAREHOUSE_JSON)"]
async fn insert_appends_rows_additively() {
    let Some(creds) = live_credentials() else {
        panic!("GALOAD_TEST_WAREHOUSE_JSON is not set");
    };
    let pool = connect(&creds, PoolConfig::default())
        .await
        .expect("should connect");

    let table = QualifiedTable {
        schema: creds.schema.clone(),
        table: "live_load_test".to_string(),
    };
    let columns = vec!["ga:pagePath".to_string(), "ga:pageviews".to_string()];
    let rows = vec![
        vec!["/home".to_string(), "120".to_string()],
        vec!["/pricing".to_string(), "48".to_string()],
    ];

    let first = insert_rows(&pool, &table, &columns, &rows)
        .await
        .expect("first insert should succeed");
    assert_eq!(first, 2);

    // Re-running the same load appends a second batch; no dedup.
    let second = insert_rows(&pool, &table, &columns, &rows)
        .await
        .expect("second insert should succeed");
    assert_eq!(second, 2);

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM live_load_test")
        .fetch_one(&pool)
        .await
        .expect("count should succeed");
    assert!(total >= 4);
}

#[tokio::test]
#[ignore = "requires a live warehouse (GALOAD_TEST_WAREHOUSE_JSON)"]
async fn empty_report_inserts_nothing() {
    let Some(creds) = live_credentials() else {
        panic!("GALOAD_TEST_WAREHOUSE_JSON is not set");
    };
    let pool = connect(&creds, PoolConfig::default())
        .await
        .expect("should connect");

    let table = QualifiedTable {
        schema: creds.schema.clone(),
        table: "live_load_test".to_string(),
    };
    let columns = vec!["ga:pagePath".to_string(), "ga:pageviews".to_string()];

    let written = insert_rows(&pool, &table, &columns, &[])
        .await
        .expect("empty insert should succeed");
    assert_eq!(written, 0);
}
