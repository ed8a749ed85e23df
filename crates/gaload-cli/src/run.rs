//! The load pipeline: credentials, one fetch, one bulk insert.
//!
//! Strictly linear. Every failure class (config, auth, upstream request,
//! write) propagates out of here and aborts the process; nothing is
//! retried and nothing is rolled back.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use gaload_core::{ReportConfig, WarehouseCredentials};
use gaload_db::{PoolConfig, QualifiedTable, RunLogEntry};
use gaload_ga::{flatten_report, GaClient, ReportQuery, ServiceAccountKey};

pub(crate) async fn run(
    config_path: &Path,
    key_path: &Path,
    warehouse_path: &Path,
    timeout_secs: u64,
) -> anyhow::Result<()> {
    let config = ReportConfig::from_path(config_path)
        .with_context(|| format!("loading report config from {}", config_path.display()))?;
    let creds = WarehouseCredentials::from_path(warehouse_path).with_context(|| {
        format!(
            "loading warehouse credentials from {}",
            warehouse_path.display()
        )
    })?;
    let key = ServiceAccountKey::from_path(key_path)
        .with_context(|| format!("loading service account key from {}", key_path.display()))?;

    let client = GaClient::new(&key, timeout_secs)
        .await
        .context("authenticating with the Reporting API")?;

    let query = build_query(&config);
    let report = client
        .batch_get(&query)
        .await
        .context("fetching the report")?;
    let table = flatten_report(&report).context("flattening the report")?;

    tracing::info!(
        rows = table.row_count(),
        columns = table.columns.len(),
        "report fetched"
    );

    // Connection happens after the fetch; bad warehouse credentials still
    // abort before any insert is attempted.
    let pool = gaload_db::connect(&creds, PoolConfig::from_env())
        .await
        .context("connecting to the warehouse")?;

    let target = QualifiedTable {
        schema: creds.schema.clone(),
        table: config.target.table.clone(),
    };
    let written = gaload_db::insert_rows(&pool, &target, &table.columns, &table.rows)
        .await
        .with_context(|| format!("inserting into {}", config.target.table))?;

    if let Some(log_table) = &config.target.log_table {
        let log_target = QualifiedTable {
            schema: creds.schema.clone(),
            table: log_table.clone(),
        };
        let entry = RunLogEntry {
            start_date: config.start_date.clone(),
            end_date: config.end_date.clone(),
            records_sent: i64::try_from(written).unwrap_or(i64::MAX),
            table_name: config.target.table.clone(),
            loaded_at: Utc::now(),
        };
        gaload_db::write_run_log(&pool, &log_target, &entry)
            .await
            .with_context(|| format!("writing run log to {log_table}"))?;
    }

    println!("transferred {written} rows to {}", config.target.table);
    Ok(())
}

fn build_query(config: &ReportConfig) -> ReportQuery {
    ReportQuery {
        view_id: config.view_id.clone(),
        start_date: config.start_date.clone(),
        end_date: config.end_date.clone(),
        dimensions: config.dimensions.clone(),
        metrics: config.metrics.clone(),
    }
}
