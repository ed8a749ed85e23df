//! Bulk insert of flattened report rows.
//!
//! One logical insert per run: a multi-row `INSERT ... VALUES` built with
//! `QueryBuilder::push_values`, split into statements only where the
//! Postgres bind-parameter limit forces it. Every value is bound as text;
//! the pre-existing target table's column types do any further coercion.
//! Appends only: no upsert, no deduplication, no rollback of
//! already-written statements if a later one fails.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{quote_ident, DbError};

/// Postgres caps bind parameters per statement at u16::MAX.
const BIND_LIMIT: usize = 65_535;

/// A schema-qualified destination table.
#[derive(Debug, Clone)]
pub struct QualifiedTable {
    pub schema: String,
    pub table: String,
}

impl QualifiedTable {
    /// Renders `"schema"."table"` with both parts quoted.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidIdentifier`] if either part cannot be
    /// quoted.
    pub fn qualified(&self) -> Result<String, DbError> {
        Ok(format!(
            "{}.{}",
            quote_ident(&self.schema)?,
            quote_ident(&self.table)?
        ))
    }
}

/// One run-summary row for the optional load log.
#[derive(Debug, Clone)]
pub struct RunLogEntry {
    pub start_date: String,
    pub end_date: String,
    pub records_sent: i64,
    pub table_name: String,
    pub loaded_at: DateTime<Utc>,
}

/// Inserts `rows` into `table` with the given column order and returns the
/// number of rows written.
///
/// Zero rows writes nothing and returns 0. Rows are bound as text in
/// config order; callers guarantee (and this function re-checks) that
/// every row is as wide as `columns`.
///
/// # Errors
///
/// - [`DbError::InvalidIdentifier`] if the table or a column name cannot
///   be quoted.
/// - [`DbError::Mismatch`] if a row's width disagrees with `columns`.
/// - [`DbError::Sqlx`] if an insert statement fails (schema mismatch,
///   permission denial, lost connection).
pub async fn insert_rows(
    pool: &PgPool,
    table: &QualifiedTable,
    columns: &[String],
    rows: &[Vec<String>],
) -> Result<u64, DbError> {
    if columns.is_empty() {
        return Err(DbError::Mismatch("no columns to insert".to_string()));
    }
    for (index, row) in rows.iter().enumerate() {
        if row.len() != columns.len() {
            return Err(DbError::Mismatch(format!(
                "row {index} has {} values but {} columns are configured",
                row.len(),
                columns.len()
            )));
        }
    }
    if rows.is_empty() {
        tracing::info!(table = %table.table, "report is empty; nothing to insert");
        return Ok(0);
    }

    let head = insert_head(table, columns)?;
    let chunk_rows = rows_per_statement(columns.len());
    let mut written: u64 = 0;

    for chunk in rows.chunks(chunk_rows) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(&head);
        builder.push_values(chunk, |mut b, row| {
            for value in row {
                b.push_bind(value.as_str());
            }
        });
        let result = builder.build().execute(pool).await?;
        written += result.rows_affected();
    }

    tracing::info!(table = %table.table, rows = written, "bulk insert complete");
    Ok(written)
}

/// Writes one run-summary row to the load-log table.
///
/// # Errors
///
/// Returns [`DbError::InvalidIdentifier`] if the log table name cannot be
/// quoted, or [`DbError::Sqlx`] if the insert fails.
pub async fn write_run_log(
    pool: &PgPool,
    table: &QualifiedTable,
    entry: &RunLogEntry,
) -> Result<(), DbError> {
    let sql = format!(
        "INSERT INTO {} (start_date, end_date, records_sent, table_name, loaded_at) \
         VALUES ($1, $2, $3, $4, $5)",
        table.qualified()?
    );

    sqlx::query(&sql)
        .bind(&entry.start_date)
        .bind(&entry.end_date)
        .bind(entry.records_sent)
        .bind(&entry.table_name)
        .bind(entry.loaded_at)
        .execute(pool)
        .await?;

    Ok(())
}

/// Builds the `INSERT INTO "schema"."table" ("c1", "c2", ...) ` prefix.
fn insert_head(table: &QualifiedTable, columns: &[String]) -> Result<String, DbError> {
    let quoted: Vec<String> = columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Result<_, _>>()?;
    Ok(format!(
        "INSERT INTO {} ({}) ",
        table.qualified()?,
        quoted.join(", ")
    ))
}

/// How many rows fit in one statement without exceeding the bind limit.
fn rows_per_statement(column_count: usize) -> usize {
    (BIND_LIMIT / column_count).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> QualifiedTable {
        QualifiedTable {
            schema: "ga".to_string(),
            table: "page_performance".to_string(),
        }
    }

    #[test]
    fn qualified_quotes_both_parts() {
        assert_eq!(
            table().qualified().unwrap(),
            "\"ga\".\"page_performance\""
        );
    }

    #[test]
    fn qualified_rejects_quote_in_table() {
        let bad = QualifiedTable {
            schema: "ga".to_string(),
            table: "x\"y".to_string(),
        };
        assert!(matches!(
            bad.qualified(),
            Err(DbError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn insert_head_lists_columns_in_order() {
        let columns = vec![
            "ga:pagePath".to_string(),
            "ga:pageviews".to_string(),
        ];
        let head = insert_head(&table(), &columns).unwrap();
        assert_eq!(
            head,
            "INSERT INTO \"ga\".\"page_performance\" (\"ga:pagePath\", \"ga:pageviews\") "
        );
    }

    #[test]
    fn rows_per_statement_respects_bind_limit() {
        assert_eq!(rows_per_statement(5), 13_107);
        assert!(rows_per_statement(5) * 5 <= BIND_LIMIT);
    }

    #[test]
    fn rows_per_statement_never_zero() {
        assert_eq!(rows_per_statement(BIND_LIMIT * 2), 1);
    }
}
