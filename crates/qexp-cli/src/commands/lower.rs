//! Lower command implementation.

use std::fs;

use anyhow::{Context, Result};
use console::style;
use qexp_compile::lower_with_stats;
use qexp_ir::CircuitDescription;
use qexp_qasm::emit;

use super::common::source_from_arg;
use crate::cli::LowerArgs;

/// Execute the lower command.
pub fn execute(args: &LowerArgs) -> Result<()> {
    let source = source_from_arg(&args.source)?;
    let circuit = source.load()?;
    let basis = args.target.basis();

    // Progress goes to stderr so stdout carries only QASM.
    eprintln!(
        "{} Lowering {} for {} (level {})",
        style("→").cyan().bold(),
        style(circuit.name()).green(),
        style(basis.name()).yellow(),
        args.optimization_level
    );

    let (lowered, stats) = lower_with_stats(&circuit, &basis, args.optimization_level)?;
    eprintln!("  Before: {}", summarize(&circuit));
    eprintln!("  After:  {}", summarize(&lowered));
    eprintln!(
        "  {} decomposed, {} identities removed, {} pairs cancelled, {} rotations merged",
        stats.decomposed, stats.removed_identities, stats.cancelled_pairs, stats.merged_rotations
    );

    let qasm = emit(&lowered);
    match &args.output {
        Some(path) => {
            fs::write(path, &qasm)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            eprintln!(
                "{} Wrote {}",
                style("✓").green().bold(),
                style(path.display()).green()
            );
        }
        None => print!("{qasm}"),
    }
    Ok(())
}

/// `N ops, depth D (h: 1, cx: 1)`
pub fn summarize(circuit: &CircuitDescription) -> String {
    let counts: Vec<String> = circuit
        .count_ops()
        .into_iter()
        .map(|(name, n)| format!("{name}: {n}"))
        .collect();
    format!(
        "{} ops, depth {} ({})",
        circuit.num_ops(),
        circuit.depth(),
        counts.join(", ")
    )
}
