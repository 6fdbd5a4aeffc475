//! Larder
//!
//! Loads a price table, assigns every item to a store and prints the shopping list.
//!
//! Use `-p` to choose the price table
//! Use `-m exact` to include delivery fees in the decision
//! Use `-c` to compare the greedy and exact assignments
//! Use `-e` to print the size of the exact model

use std::{
    io::{self, Write},
    time::Instant,
};

use anyhow::Result;
use humanize_duration::{Truncate, prelude::DurationExt};
use serde::Serialize;
use tracing::{info, warn};

use larder::{
    comparison::{Comparison, ComparisonSummary},
    config::{CliConfig, OutputFormat},
    fixtures::CartFixture,
    observability,
    shopping_list::{ShoppingList, ShoppingListView},
    solvers::{Method, exact::ModelStats},
};

/// JSON report printed with `--output json`
#[derive(Debug, Serialize)]
struct Report {
    #[serde(flatten)]
    list: ShoppingListView,

    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<ComparisonSummary>,

    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<ModelStats>,

    elapsed_seconds: f32,
}

fn main() -> Result<()> {
    let config = CliConfig::load().unwrap_or_else(|e| e.exit());

    observability::init(&config.logging)?;

    let fixture = CartFixture::from_path(&config.prices)?;

    info!(
        path = %config.prices.display(),
        items = fixture.table.len(),
        stores = fixture.table.store_count(),
        "loaded price table"
    );

    if config.explain && config.method == Method::Greedy {
        warn!("--explain describes the exact model and is ignored for the greedy method");
    }

    let start = Instant::now();

    let mut stats = None;

    let assignment = if config.explain && config.method == Method::Exact {
        let mut model = ModelStats::default();
        let assignment = config
            .method
            .assign_with_observer(&fixture.table, &fixture.fees, &mut model)?;

        stats = Some(model);

        assignment
    } else {
        config.method.assign(&fixture.table, &fixture.fees)?
    };

    let elapsed = start.elapsed();

    let list =
        ShoppingList::from_assignment(&fixture.table, &fixture.fees, &assignment, config.method)?;

    let comparison = if config.compare {
        let solved = Some((config.method, assignment.clone()));

        Some(Comparison::reusing(&fixture.table, &fixture.fees, solved)?.summary()?)
    } else {
        None
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match config.output {
        OutputFormat::Json => {
            let report = Report {
                list: list.view(),
                comparison,
                model: stats,
                elapsed_seconds: elapsed.as_secs_f32(),
            };

            serde_json::to_writer_pretty(&mut handle, &report)?;
            writeln!(handle)?;
        }
        OutputFormat::Table => {
            list.write_to(&mut handle)?;

            if let Some(model) = stats {
                writeln!(
                    handle,
                    "\n Model: {} variables ({} store, {} item-store, {} sentinel), {} constraints",
                    model.variables(),
                    model.activation_variables,
                    model.assignment_variables,
                    model.sentinel_pairings,
                    model.constraints(),
                )?;
            }

            if let Some(summary) = comparison {
                writeln!(
                    handle,
                    "\n Greedy: {} across {} stores\n Exact:  {} across {} stores\n Saving: {} ({}%)",
                    summary.greedy_total,
                    summary.greedy_stores,
                    summary.exact_total,
                    summary.exact_stores,
                    summary.savings,
                    summary.savings_percent,
                )?;
            }

            writeln!(
                handle,
                "\n {} ({}s)",
                elapsed.human(Truncate::Nano),
                elapsed.as_secs_f32()
            )?;
        }
    }

    Ok(())
}
