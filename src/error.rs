//! Typed errors for loading and querying the customer table

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that abort a render pass
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("image asset not found: {}", .0.display())]
    MissingImage(PathBuf),

    #[error("column not found: {0}")]
    MissingColumn(String),

    #[error("data error: {0}")]
    Polars(#[from] PolarsError),
}
