//! Churnboard: credit card customer dashboard
//!
//! This is the main entrypoint: it loads the dataset once, evaluates the
//! requested navigation views and writes them as HTML pages.

use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use churnboard::data::REQUIRED_COLUMNS;
use churnboard::{load_customer_table, report, Args, Dashboard};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();
    init_logging(args.verbose)?;

    let selection = args.selection()?;
    let start_time = Instant::now();

    if args.verbose {
        println!("Churnboard - Credit Card Analysis");
        println!("=================================\n");
        println!("Loading data from: {}", args.input.display());
    }

    // Startup checks: dataset, header image and the columns the views read
    let table = load_customer_table(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    report::ensure_image(&args.image)?;
    table.require_columns(&REQUIRED_COLUMNS)?;

    println!(
        "✓ Data loaded: {} customers, {} columns",
        table.height(),
        table.column_names().len()
    );

    let dashboard = Dashboard::new(&table).with_head_rows(args.head_rows);
    let generated_at = Utc::now();

    for mode in args.modes() {
        let page_start = Instant::now();
        let page = dashboard.render(&selection.with_mode(mode))?;
        let path = report::write_page(&page, &args.output, &args.image, generated_at)?;

        println!("✓ {} page saved to: {}", mode.label(), path.display());
        if args.verbose {
            println!("  Widgets: {}", page.widgets.len());
            println!("  Render time: {:.2}s", page_start.elapsed().as_secs_f64());
        }
    }

    if args.verbose {
        println!(
            "\nTotal processing time: {:.2}s",
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

/// Log to stderr, filtered by RUST_LOG on top of a level picked by --verbose
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(format!("churnboard={level}").parse()?),
        )
        .init();
    Ok(())
}
