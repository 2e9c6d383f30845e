//! Churnboard: a credit card customer dashboard
//!
//! This library loads a credit card customer dataset and renders three views of it:
//! a data overview, exploratory charts and filtered visualizations with churn commentary.

pub mod cli;
pub mod data;
pub mod error;
pub mod insights;
pub mod report;
pub mod stats;
pub mod view;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{load_customer_table, CustomerTable};
pub use error::DashboardError;
pub use view::{Dashboard, NavMode, Page, Selection, Widget};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
