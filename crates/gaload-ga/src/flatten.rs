//! Flattening of a Reporting API response into an aligned table.
//!
//! Column names come straight from the column header (dimensions then
//! metrics); each row is its dimension values followed by every metric
//! value, in header order. Values are forwarded as the strings the API
//! sent; no numeric coercion happens here or anywhere downstream.

use crate::error::GaError;
use crate::types::Report;

/// A flattened report: ordered column names and rows of equal width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Flattens a [`Report`] into a [`ReportTable`].
///
/// A report whose `data` carries no rows (the API omits the field for an
/// empty result) flattens to an empty table, not an error.
///
/// # Errors
///
/// Returns [`GaError::Shape`] if any row's value count disagrees with the
/// column header. The run aborts rather than writing misaligned rows.
pub fn flatten_report(report: &Report) -> Result<ReportTable, GaError> {
    let mut columns = report.column_header.dimensions.clone();
    columns.extend(
        report
            .column_header
            .metric_header
            .metric_header_entries
            .iter()
            .map(|entry| entry.name.clone()),
    );

    let width = columns.len();
    let mut rows = Vec::with_capacity(report.data.rows.len());

    for (index, row) in report.data.rows.iter().enumerate() {
        let mut values = row.dimensions.clone();
        for range in &row.metrics {
            values.extend(range.values.iter().cloned());
        }

        if values.len() != width {
            return Err(GaError::Shape(format!(
                "row {index} has {} values but the header declares {width} columns",
                values.len()
            )));
        }
        rows.push(values);
    }

    Ok(ReportTable { columns, rows })
}
