//! Inspect command implementation.

use parish_core::{Kind, Store};
use serde::Serialize;

/// Store inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Backend description, e.g. `file:parish.json`.
    pub backend: String,
    /// Record count per kind, in key-space order.
    pub counts: Vec<KindCount>,
    /// Total records across all kinds.
    pub total: usize,
}

/// Record count for a single kind.
#[derive(Debug, Serialize)]
pub struct KindCount {
    /// The kind's wire tag.
    pub kind: String,
    /// Number of records of that kind.
    pub count: usize,
}

/// Runs the inspect command.
pub fn run(store: &Store, backend: &str, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let counts: Vec<KindCount> = Kind::ALL
        .into_iter()
        .map(|kind| KindCount {
            kind: kind.tag().to_owned(),
            count: store.count(Some(kind)),
        })
        .collect();
    let result = InspectResult {
        backend: backend.to_owned(),
        total: counts.iter().map(|c| c.count).sum(),
        counts,
    };

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("Parish Store Inspection");
    println!("=======================");
    println!();
    println!("Backend: {}", result.backend);
    println!();
    println!("Records:");
    for entry in &result.counts {
        println!("  {:<18} {}", entry.kind, entry.count);
    }
    println!("  {:<18} {}", "total", result.total);
}
