use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "keyed-deque workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the deque benchmarks and write a comparison report
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

const BENCHES: &[&str] = &["indexed_deque_benchmark", "serialized_benchmark"];

/// Implementation names treated as the 1.0x reference within a group.
const BASELINES: &[&str] = &["std::VecDeque", "Mutex<IndexedDeque>"];

#[derive(Deserialize)]
struct Estimates {
    mean: Estimate,
}

#[derive(Deserialize)]
struct Estimate {
    point_estimate: f64,
}

/// group -> implementation -> mean time in nanoseconds
type Results = BTreeMap<String, BTreeMap<String, f64>>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool) -> Result<()> {
    for bench in BENCHES {
        println!("\n>>> Running {bench}");
        let start = Instant::now();

        let mut cmd = Command::new("cargo");
        cmd.arg("bench").arg("--bench").arg(bench);

        // Args for the test runner (Criterion) go after --
        cmd.arg("--");
        if quick {
            cmd.arg("--measurement-time").arg("0.1");
            cmd.arg("--noplot");
            cmd.arg("--sample-size").arg("10");
        }

        let status = cmd
            .status()
            .with_context(|| format!("Failed to run bench {bench}"))?;
        if status.success() {
            println!("Finished {bench} in {:.2?}", start.elapsed());
        } else {
            eprintln!("Warning: benchmark {bench} failed");
        }
    }

    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");
    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    let mut results = Results::new();
    collect_results(criterion_dir, &mut results)?;

    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(report_path)?;

    writeln!(file, "# Deque Benchmark Report")?;
    for (group, implementations) in &results {
        let baseline = implementations
            .iter()
            .find(|(name, _)| BASELINES.contains(&name.as_str()))
            .map(|(_, time)| *time);

        writeln!(file, "\n## {group}\n")?;
        writeln!(file, "| Implementation | Mean | vs Baseline |")?;
        writeln!(file, "|---|---|---|")?;
        for (name, time_ns) in implementations {
            let relative = match baseline {
                Some(base) if *time_ns > 0.0 => format!("**{:.2}x**", base / time_ns),
                _ => "-".to_owned(),
            };
            writeln!(file, "| {name} | {} | {relative} |", format_time(*time_ns))?;
        }
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn format_time(ns: f64) -> String {
    if ns > 1_000_000.0 {
        format!("{:.2} ms", ns / 1_000_000.0)
    } else if ns > 1_000.0 {
        format!("{:.2} µs", ns / 1_000.0)
    } else {
        format!("{ns:.0} ns")
    }
}

/// Walks `target/criterion/<group>/<implementation>/new/estimates.json`.
fn collect_results(dir: &Path, results: &mut Results) -> Result<()> {
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_results(&path, results)?;
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("estimates.json") {
            continue;
        }

        let Some(run_dir) = path.parent() else { continue };
        if run_dir.file_name().and_then(|s| s.to_str()) != Some("new") {
            continue;
        }
        let Some(impl_dir) = run_dir.parent() else { continue };
        let Some(group_dir) = impl_dir.parent() else { continue };
        let (Some(implementation), Some(group)) = (
            impl_dir.file_name().and_then(|s| s.to_str()),
            group_dir.file_name().and_then(|s| s.to_str()),
        ) else {
            continue;
        };
        if group == "report" || implementation == "report" {
            continue;
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let estimates: Estimates = serde_json::from_str(&content)
            .with_context(|| format!("Malformed estimates in {}", path.display()))?;

        // Criterion writes the display name into benchmark.json; the directory name is sanitized.
        let name = read_function_name(impl_dir).unwrap_or_else(|| implementation.to_owned());
        let group_name = read_group_name(impl_dir).unwrap_or_else(|| group.to_owned());
        results
            .entry(group_name)
            .or_default()
            .insert(name, estimates.mean.point_estimate);
    }
    Ok(())
}

#[derive(Deserialize)]
struct BenchmarkId {
    group_id: String,
    function_id: Option<String>,
}

fn read_benchmark_id(impl_dir: &Path) -> Option<BenchmarkId> {
    let content = fs::read_to_string(impl_dir.join("new").join("benchmark.json")).ok()?;
    serde_json::from_str(&content).ok()
}

fn read_function_name(impl_dir: &Path) -> Option<String> {
    read_benchmark_id(impl_dir)?.function_id
}

fn read_group_name(impl_dir: &Path) -> Option<String> {
    read_benchmark_id(impl_dir).map(|id| id.group_id)
}
