//! Shared helpers for CLI commands.

use std::io::Read;

use anyhow::{Context, Result};
use console::style;
use qexp_hal::Counts;
use qexp_runner::CircuitSource;

/// Outcomes shown in the console table.
const MAX_ROWS: usize = 16;

/// Source for a command-line argument. `-` reads stdin.
pub fn source_from_arg(arg: &str) -> Result<CircuitSource> {
    if arg == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read circuit from stdin")?;
        Ok(CircuitSource::inline("stdin", text))
    } else {
        Ok(CircuitSource::file(arg))
    }
}

/// Print an outcome table, most frequent first.
pub fn print_counts(counts: &Counts, shots: u32) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        shots
    );

    let sorted = counts.sorted();
    let total = f64::from(shots.max(1));

    for (bitstring, count) in sorted.iter().take(MAX_ROWS) {
        let prob = *count as f64 / total * 100.0;
        let bar = "█".repeat((prob / 2.0).round() as usize);
        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > MAX_ROWS {
        println!("  ... and {} more outcomes", sorted.len() - MAX_ROWS);
    }
}
