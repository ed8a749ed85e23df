pub mod auth;
pub mod client;
pub mod error;
pub mod flatten;
pub mod types;

pub use auth::ServiceAccountKey;
pub use client::{GaClient, ReportQuery, ANALYTICS_READONLY_SCOPE};
pub use error::GaError;
pub use flatten::{flatten_report, ReportTable};
