//! Churn figures quoted in the dashboard commentary, computed from the table

use std::ops::Range;

use polars::prelude::*;

use crate::data::{CustomerTable, ATTRITED_CUSTOMER, ATTRITION_FLAG, EXISTING_CUSTOMER};
use crate::error::DashboardError;
use crate::stats::scalar_count;

/// Low utilization band, 2.4% to 7.4%
pub const LOW_UTILIZATION: Range<f64> = 0.024..0.074;
/// Fewer than three bank products
pub const FEW_PRODUCTS: Range<f64> = f64::NEG_INFINITY..3.0;
/// Transaction totals from 1$ to 2999$
pub const LOW_SPEND: Range<f64> = 1.0..3000.0;

fn is_flag(flag: &str) -> Expr {
    col(ATTRITION_FLAG).cast(DataType::String).eq(lit(flag))
}

/// Fraction of attrited customers whose `column` value falls in `range`
///
/// # Arguments
/// * `table` - Customers to inspect, normally the full table
/// * `column` - Numeric column holding the measure
/// * `range` - Half-open band `[start, end)`
///
/// # Returns
/// * `None` when no attrited customer has a value for the column
pub fn churn_share_in_range(
    table: &CustomerTable,
    column: &str,
    range: Range<f64>,
) -> Result<Option<f64>, DashboardError> {
    table.require_columns(&[ATTRITION_FLAG, column])?;

    let churned = table
        .frame()
        .clone()
        .lazy()
        .filter(is_flag(ATTRITED_CUSTOMER).and(col(column).is_not_null()))
        .select([col(column).cast(DataType::Float64)])
        .collect()?;

    let series = churned.column(column)?.as_materialized_series();
    let values = series.f64()?;
    if values.is_empty() {
        return Ok(None);
    }
    let inside = values
        .into_iter()
        .flatten()
        .filter(|v| range.contains(v))
        .count();
    Ok(Some(inside as f64 / values.len() as f64))
}

/// Existing vs attrited split of a set of customers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttritionSplit {
    pub customers: usize,
    pub existing: f64,
    pub attrited: f64,
}

/// Share of existing and attrited customers among the rows of `table`.
/// `None` for an empty table.
pub fn attrition_split(table: &CustomerTable) -> Result<Option<AttritionSplit>, DashboardError> {
    table.require_columns(&[ATTRITION_FLAG])?;

    let counts = table
        .frame()
        .clone()
        .lazy()
        .select([
            len().alias("customers"),
            is_flag(EXISTING_CUSTOMER).sum().alias("existing"),
            is_flag(ATTRITED_CUSTOMER).sum().alias("attrited"),
        ])
        .collect()?;

    let customers = scalar_count(&counts, "customers")?;
    if customers == 0 {
        return Ok(None);
    }
    let total = customers as f64;
    Ok(Some(AttritionSplit {
        customers,
        existing: scalar_count(&counts, "existing")? as f64 / total,
        attrited: scalar_count(&counts, "attrited")? as f64 / total,
    }))
}

/// Percentage with one decimal, or "n/a"
pub fn format_share(share: Option<f64>) -> String {
    match share {
        Some(share) => format!("{:.1}%", share * 100.0),
        None => "n/a".to_string(),
    }
}
