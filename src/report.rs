//! Formatting and persistence of solver results.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use itertools::Itertools;

use crate::error::Result;
use crate::instance::Instance;
use crate::SolveResult;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// The summary block printed at the end of a run.
pub fn format_summary(result: &SolveResult) -> String {
    let mut lines = vec![
        "--------------".to_string(),
        format!("Time: {:.4}", result.elapsed.as_secs_f64()),
        format!("FO: {:.4}", result.cost),
        format!("Hubs: [{}]", result.hubs.iter().join(" ")),
    ];
    if let Some(gap) = result.gap {
        lines.push(format!("GAP: {:.4}%", gap));
    }
    lines.push("--------------".to_string());

    lines.join("\n")
}

/// Print the summary block to stdout.
pub fn print_summary(result: &SolveResult) {
    println!("{}", format_summary(result));
}

/// Save a human readable description of a result.
pub fn save_solution<P: AsRef<Path>>(
    result: &SolveResult,
    instance: &Instance,
    path: P,
) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "Hub location solution for instance: {}", instance.name())?;
    writeln!(file, "Total Cost: {:.4}", result.cost)?;
    writeln!(file, "Runtime: {}", format_duration(result.elapsed))?;
    writeln!(file, "Iterations: {}", result.iterations)?;
    if let Some(gap) = result.gap {
        writeln!(file, "Gap: {:.4}%", gap)?;
    }
    writeln!(file, "Number of Hubs: {}", result.hubs.len())?;
    writeln!(file)?;

    for &hub in &result.hubs {
        let served = result
            .assignment
            .iter()
            .positions(|&h| h == hub)
            .join(" ");
        writeln!(
            file,
            "Hub {} (installation {:.4}): {}",
            hub,
            instance.installation_cost(hub),
            served
        )?;
    }

    file.flush()?;
    Ok(())
}

/// Save a result as pretty-printed JSON.
pub fn save_json<P: AsRef<Path>>(result: &SolveResult, path: P) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, result)?;
    Ok(())
}
