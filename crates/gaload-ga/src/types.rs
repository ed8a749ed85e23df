//! Reporting API v4 request and response types.
//!
//! Request bodies serialize to the camelCase JSON shape `reports:batchGet`
//! expects. Response types model the envelope the API returns; every value
//! in `rows` arrives as a string regardless of the declared metric type,
//! per the API's convention.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Top-level `batchGet` request body: `{ "reportRequests": [ ... ] }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGetRequest {
    pub report_requests: Vec<ReportRequest>,
}

/// A single report request inside a [`BatchGetRequest`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub view_id: String,
    pub date_ranges: Vec<DateRange>,
    pub dimensions: Vec<DimensionRef>,
    pub metrics: Vec<MetricRef>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

/// A dimension reference: `{ "name": "ga:pagePath" }`.
#[derive(Debug, Serialize)]
pub struct DimensionRef {
    pub name: String,
}

/// A metric reference: `{ "expression": "ga:pageviews" }`.
#[derive(Debug, Serialize)]
pub struct MetricRef {
    pub expression: String,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Top-level `batchGet` response: `{ "reports": [ ... ] }`.
#[derive(Debug, Deserialize)]
pub struct BatchGetResponse {
    #[serde(default)]
    pub reports: Vec<Report>,
}

/// One report: column header plus row data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub column_header: ColumnHeader,
    pub data: ReportData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    #[serde(default)]
    pub dimensions: Vec<String>,
    pub metric_header: MetricHeader,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricHeader {
    #[serde(default)]
    pub metric_header_entries: Vec<MetricHeaderEntry>,
}

/// A metric column: its name and declared value type (`INTEGER`, `FLOAT`,
/// `TIME`, ...). The type is informational only; values stay strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricHeaderEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: String,
}

/// Row data for a report. `rows` is absent entirely when the query matches
/// nothing, so it defaults to empty rather than failing deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    #[serde(default)]
    pub rows: Vec<ReportRow>,
    #[serde(default)]
    pub row_count: Option<i64>,
}

/// One report row: dimension values plus per-date-range metric values.
#[derive(Debug, Deserialize)]
pub struct ReportRow {
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<DateRangeValues>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeValues {
    #[serde(default)]
    pub values: Vec<String>,
}
