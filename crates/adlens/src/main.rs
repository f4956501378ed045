//! adlens: CLI for rendering campaign performance breakdowns.
//!
//! Loads a marketing dataset, builds the demographic, device, regional
//! and weekly views, prints their tables (or JSON) and optionally
//! writes every chart as an SVG file.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin adlens -- [OPTIONS] <DATASET>
//! ```
//!
//! Pass `-` as the dataset to read JSON from standard input. Log
//! verbosity follows `RUST_LOG` (default `warn`).

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod tables;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use adlens_export::dashboard::{
    RenderedChart, demographic_charts, device_charts, region_charts, weekly_charts,
};
use adlens_export::{ChartConfigs, GeoTable};
use adlens_io::{FileSource, JsonSource, LoadOutcome};
use adlens_pipeline::diagnostics::{SystemClock, ViewDiagnostics, build_views_with_diagnostics};
use adlens_pipeline::{DashboardViews, MarketingData};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Render campaign performance breakdowns from a marketing dataset.
///
/// Prints the selected views as text tables and writes their charts as
/// SVG documents when `--out-dir` is given.
#[derive(Parser)]
#[command(name = "adlens", version)]
struct Cli {
    /// Path to the dataset JSON, or `-` for standard input.
    dataset: PathBuf,

    /// Which view to print and render.
    #[arg(long, value_enum, default_value_t = ViewKind::All)]
    view: ViewKind,

    /// Directory to write one SVG per chart into.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Output the selected views as JSON instead of text tables.
    #[arg(long)]
    json: bool,

    /// Print per-view timing diagnostics to stderr.
    #[arg(long)]
    diagnostics: bool,

    /// Number of view builds to time when `--diagnostics` is set.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Chart configuration as a JSON string.
    ///
    /// Applied as a patch over the default chart set: omitted fields, at
    /// any depth, keep that chart's default.
    #[arg(long)]
    config_json: Option<String>,
}

/// View selection.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewKind {
    /// Every view.
    All,
    /// Gender summaries, age-group spend and revenue, age-group tables.
    Demographic,
    /// Mobile and desktop totals with derived rates.
    Device,
    /// Revenue and spend per region.
    Region,
    /// Revenue and spend per week.
    Weekly,
}

impl ViewKind {
    fn includes(self, other: Self) -> bool {
        self == Self::All || self == other
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn configs_from_cli(cli: &Cli) -> Result<ChartConfigs, String> {
    cli.config_json.as_ref().map_or_else(
        || Ok(ChartConfigs::default()),
        |json| serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}")),
    )
}

fn load(dataset: &Path) -> LoadOutcome {
    if dataset.as_os_str() == "-" {
        match JsonSource::from_reader(std::io::stdin().lock(), "<stdin>") {
            Ok(source) => LoadOutcome::load(&source),
            Err(e) => LoadOutcome::Failed {
                message: e.to_string(),
            },
        }
    } else {
        LoadOutcome::load(&FileSource::new(dataset))
    }
}

/// Build the views `runs` times, returning the last build and every
/// run's diagnostics.
fn timed_builds(data: &MarketingData, runs: usize) -> (DashboardViews, Vec<ViewDiagnostics>) {
    let mut all = Vec::with_capacity(runs);
    let (mut views, diagnostics) = build_views_with_diagnostics(data, &SystemClock);
    all.push(diagnostics);
    for _ in 1..runs {
        let (next, diagnostics) = build_views_with_diagnostics(data, &SystemClock);
        views = next;
        all.push(diagnostics);
    }
    (views, all)
}

fn selected_json(views: &DashboardViews, kind: ViewKind) -> serde_json::Result<String> {
    match kind {
        ViewKind::All => serde_json::to_string_pretty(views),
        ViewKind::Demographic => serde_json::to_string_pretty(&views.demographic),
        ViewKind::Device => serde_json::to_string_pretty(&views.device),
        ViewKind::Region => serde_json::to_string_pretty(&views.region),
        ViewKind::Weekly => serde_json::to_string_pretty(&views.weekly),
    }
}

fn selected_text(views: &DashboardViews, kind: ViewKind) -> String {
    let mut sections = Vec::new();
    if kind.includes(ViewKind::Demographic) {
        sections.push(tables::demographic(&views.demographic));
    }
    if kind.includes(ViewKind::Device) {
        sections.push(tables::device(&views.device));
    }
    if kind.includes(ViewKind::Region) {
        sections.push(tables::region(&views.region));
    }
    if kind.includes(ViewKind::Weekly) {
        sections.push(tables::weekly(&views.weekly));
    }
    sections.join("\n")
}

fn selected_charts(
    views: &DashboardViews,
    kind: ViewKind,
    configs: &ChartConfigs,
    geo: &GeoTable,
) -> Vec<RenderedChart> {
    let mut charts = Vec::new();
    if kind.includes(ViewKind::Demographic) {
        charts.extend(demographic_charts(&views.demographic, configs));
    }
    if kind.includes(ViewKind::Device) {
        charts.extend(device_charts(&views.device, configs));
    }
    if kind.includes(ViewKind::Region) {
        charts.extend(region_charts(&views.region, configs, geo));
    }
    if kind.includes(ViewKind::Weekly) {
        charts.extend(weekly_charts(&views.weekly, configs));
    }
    charts
}

fn write_charts(charts: &[RenderedChart], out_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(out_dir)
        .map_err(|e| format!("Error creating {}: {e}", out_dir.display()))?;
    for chart in charts {
        let path = out_dir.join(format!("{}.svg", chart.name));
        std::fs::write(&path, &chart.svg)
            .map_err(|e| format!("Error writing SVG to {}: {e}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = chart.svg.len(), "chart written");
    }
    eprintln!("{} charts written to {}", charts.len(), out_dir.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let configs = match configs_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = load(&cli.dataset);
    let data = match &outcome {
        LoadOutcome::Ready(data) => data,
        LoadOutcome::Failed { message } => {
            eprintln!("Error loading {}: {message}", cli.dataset.display());
            return ExitCode::FAILURE;
        }
    };

    let (views, diagnostics) = timed_builds(data, cli.runs);

    if cli.diagnostics {
        for (run, diag) in diagnostics.iter().enumerate() {
            if cli.runs > 1 {
                eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
            }
            eprintln!("{}", diag.report());
        }
        if cli.runs > 1 {
            print_multi_run_summary(&diagnostics);
        }
    }

    if cli.json {
        match selected_json(&views, cli.view) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing views: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", selected_text(&views, cli.view));
    }

    if let Some(ref out_dir) = cli.out_dir {
        let charts = selected_charts(&views, cli.view, &configs, &GeoTable::builtin());
        if let Err(msg) = write_charts(&charts, out_dir) {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

/// Function pointer type for extracting a view duration from diagnostics.
type StageExtractor = fn(&ViewDiagnostics) -> std::time::Duration;

/// Print aggregated timings across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[ViewDiagnostics]) {
    eprintln!();
    eprintln!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    if all_diagnostics.is_empty() {
        return;
    }

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    eprintln!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    eprintln!();
    eprintln!("{:<24} {:>12}", "View", "Mean (ms)");
    eprintln!("{}", "-".repeat(40));

    let stage_extractors: &[(&str, StageExtractor)] = &[
        ("Demographic", |d| d.demographic.duration),
        ("Device", |d| d.device.duration),
        ("Region", |d| d.region.duration),
        ("Weekly", |d| d.weekly.duration),
    ];

    for (name, extractor) in stage_extractors {
        let stage_mean = all_diagnostics
            .iter()
            .map(|d| extractor(d).as_secs_f64() * 1000.0)
            .sum::<f64>()
            / all_diagnostics.len() as f64;
        eprintln!("{name:<24} {stage_mean:>10.3}ms");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("adlens").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_select_every_view() {
        let cli = cli(&["data.json"]);
        assert!(cli.view == ViewKind::All);
        assert_eq!(cli.runs, 1);
        assert!(!cli.json);
        assert!(configs_from_cli(&cli).is_ok());
    }

    #[test]
    fn zero_runs_are_rejected() {
        assert!(Cli::try_parse_from(["adlens", "--runs", "0", "data.json"]).is_err());
    }

    #[test]
    fn config_json_overrides_nested_fields() {
        let cli = cli(&["--config-json", r#"{"bar": {"width": 640}}"#, "data.json"]);
        let configs = configs_from_cli(&cli).unwrap();
        assert!((configs.bar.width - 640.0).abs() < f64::EPSILON);
        assert_eq!(configs.weekly_revenue, ChartConfigs::default().weekly_revenue);
    }

    #[test]
    fn config_json_keeps_per_chart_presets() {
        let cli = cli(&["--config-json", r#"{"region_spend": {"zoom": 5}}"#, "data.json"]);
        let configs = configs_from_cli(&cli).unwrap();
        let defaults = ChartConfigs::default();
        assert_eq!(configs.region_spend.zoom, 5);
        assert_eq!(configs.region_spend.low_color, defaults.region_spend.low_color);
        assert_eq!(configs.region_spend.high_color, defaults.region_spend.high_color);
    }

    #[test]
    fn malformed_config_json_is_reported() {
        let cli = cli(&["--config-json", "{", "data.json"]);
        assert!(configs_from_cli(&cli).unwrap_err().starts_with("Error parsing --config-json"));
    }

    #[test]
    fn view_selection_limits_charts() {
        let views = adlens_pipeline::build_views(&MarketingData::default());
        let configs = ChartConfigs::default();
        let geo = GeoTable::builtin();
        assert_eq!(selected_charts(&views, ViewKind::All, &configs, &geo).len(), 10);
        let weekly: Vec<&str> = selected_charts(&views, ViewKind::Weekly, &configs, &geo)
            .iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(weekly, vec!["weekly-revenue", "weekly-spend"]);
        assert!(selected_text(&views, ViewKind::Device).starts_with("Devices"));
    }

    #[test]
    fn repeated_runs_keep_every_diagnostic() {
        let (_, diagnostics) = timed_builds(&MarketingData::default(), 3);
        assert_eq!(diagnostics.len(), 3);
    }
}
