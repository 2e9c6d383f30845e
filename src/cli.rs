//! Command-line interface definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;

use crate::view::{NavMode, Selection, DEFAULT_HEAD_ROWS};

/// Credit card churn dashboard: data overview, EDA and interactive visualizations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the customer CSV file
    #[arg(short, long, default_value = "BankChurners.csv")]
    pub input: PathBuf,

    /// Image shown next to the dashboard title
    #[arg(long, default_value = "credit_card_PNG123.png")]
    pub image: PathBuf,

    /// Directory receiving the rendered pages
    #[arg(short, long, default_value = "dashboard")]
    pub output: PathBuf,

    /// Navigation option to render
    #[arg(long, value_enum, default_value_t = NavMode::Overview)]
    pub view: NavMode,

    /// Render every navigation option
    #[arg(long, conflicts_with = "view")]
    pub all: bool,

    /// Gender filter for the visualizations view (defaults to the first value in the data)
    #[arg(short, long)]
    pub gender: Option<String>,

    /// Marital status filter for the visualizations view (defaults to the first value in the data)
    #[arg(short, long)]
    pub marital_status: Option<String>,

    /// Number of rows shown in the data overview
    #[arg(long, default_value_t = DEFAULT_HEAD_ROWS)]
    pub head_rows: usize,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Navigation options this run renders
    pub fn modes(&self) -> Vec<NavMode> {
        if self.all {
            NavMode::ALL.to_vec()
        } else {
            vec![self.view]
        }
    }

    /// Build the selection state from the filter arguments
    /// Filter values are trimmed; blank values are rejected
    pub fn selection(&self) -> crate::Result<Selection> {
        let gender = parse_filter("gender", self.gender.as_deref())?;
        let marital_status = parse_filter("marital-status", self.marital_status.as_deref())?;

        Ok(Selection {
            mode: self.view,
            gender,
            marital_status,
        })
    }
}

fn parse_filter(name: &str, value: Option<&str>) -> crate::Result<Option<String>> {
    match value.map(str::trim) {
        Some("") => anyhow::bail!("--{} must not be blank", name),
        Some(value) => Ok(Some(value.to_string())),
        None => Ok(None),
    }
}
