//! DashLab CLI: quote and tips dashboards rendered as text.
//!
//! Commands:
//! - `quotes`: daily OHLCV for one ticker plus a Close summary
//! - `tips`: tips dataset preview and the four chart specs
//! - `config`: print the effective configuration as TOML

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dashlab_core::charts::{ChartParams, ChartSpec, HistogramParams, ScatterParams, TimeSeriesParams};
use dashlab_core::config::DashConfig;
use dashlab_core::session::{QuotesReport, Session, TipsReport};
use dashlab_core::status::{Notice, Severity};
use dashlab_core::tips::columns;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dashlab",
    about = "DashLab CLI: stock quotes and restaurant tips dashboards"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to ./dashlab.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show daily quotes for a ticker.
    Quotes {
        /// Ticker symbol. Defaults to the configured ticker.
        #[arg(long)]
        ticker: Option<String>,

        /// Start date (YYYY-MM-DD). Defaults to the configured lookback.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), exclusive. Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Print JSON instead of tables.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Load the tips dataset and describe its charts.
    Tips {
        /// CSV to use instead of the remote demo dataset.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Preview row count. Defaults to the configured value.
        #[arg(long)]
        rows: Option<usize>,

        /// Print chart specs as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the effective configuration.
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = DashConfig::load(cli.config.as_deref()).context("load configuration")?;

    let notices = match cli.command {
        Commands::Quotes {
            ticker,
            start,
            end,
            json,
        } => run_quotes(config, ticker, start, end, json)?,
        Commands::Tips { file, rows, json } => run_tips(config, file, rows, json)?,
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Vec::new()
        }
    };

    if notices.iter().any(|n| n.severity == Severity::Error) {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "dashlab_core=debug,dashlab=debug"
    } else {
        "dashlab_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_date(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .with_context(|| format!("--{flag} must be YYYY-MM-DD"))
}

fn run_quotes(
    config: DashConfig,
    ticker: Option<String>,
    start: Option<String>,
    end: Option<String>,
    json: bool,
) -> Result<Vec<Notice>> {
    let session = Session::from_config(config)?;
    let today = chrono::Local::now().date_naive();
    let (default_start, default_end) = session.quote_window(today);

    let end = parse_date(end.as_deref(), "end")?.unwrap_or(default_end);
    let start = parse_date(start.as_deref(), "start")?.unwrap_or(default_start);
    let ticker = ticker.unwrap_or_else(|| session.config().quotes.default_ticker.clone());

    let report = session.quotes(&ticker, start, end);

    if json {
        let value = serde_json::json!({
            "ticker": report.ticker,
            "start": report.start,
            "end": report.end,
            "notices": report.notices,
            "bars": report.table.bars(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_quotes(&report)?;
    }
    Ok(report.notices)
}

fn print_quotes(report: &QuotesReport) -> Result<()> {
    println!();
    println!("=== {} quotes ===", report.ticker);
    println!("Period:  {} to {} (end exclusive)", report.start, report.end);
    print_notices(&report.notices);

    if report.table.is_empty() {
        return Ok(());
    }

    let frame = report.table.to_dataframe().context("build quote table")?;
    println!("{frame}");

    let closes = report.table.close_series();
    if let (Some(first), Some(last)) = (closes.first(), closes.last()) {
        let low = closes.iter().map(|(_, c)| *c).fold(f64::INFINITY, f64::min);
        let high = closes.iter().map(|(_, c)| *c).fold(f64::NEG_INFINITY, f64::max);
        println!();
        println!("--- Close ---");
        println!("First:   {} {:.2}", first.0, first.1);
        println!("Last:    {} {:.2}", last.0, last.1);
        println!("Range:   {low:.2} to {high:.2}");
        println!("Change:  {:+.2}%", (last.1 / first.1 - 1.0) * 100.0);
    }
    println!();
    Ok(())
}

fn run_tips(
    config: DashConfig,
    file: Option<PathBuf>,
    rows: Option<usize>,
    json: bool,
) -> Result<Vec<Notice>> {
    let preview_rows = rows.unwrap_or(config.tips.preview_rows);
    let session = Session::from_config(config)?;

    let upload = file
        .as_ref()
        .map(|path| std::fs::read(path).with_context(|| format!("read {}", path.display())))
        .transpose()?;

    let report = session.tips(upload.as_deref());

    if json {
        let value = serde_json::json!({
            "provenance": report.provenance,
            "rows": report.table.height(),
            "columns": report.table.column_names(),
            "notices": report.notices,
            "charts": report.specs,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_tips(&report, preview_rows);
    }
    Ok(report.notices)
}

fn print_tips(report: &TipsReport, preview_rows: usize) {
    println!();
    println!("=== Tips ===");
    println!("Source:  {:?}", report.provenance);
    println!("Rows:    {}", report.table.height());
    print_notices(&report.notices);

    if wants_column_hint(report) {
        println!("{}", columns::expected_hint());
        println!();
    }

    if !report.table.is_empty() {
        println!(
            "Preview (first {} rows):",
            preview_rows.min(report.table.height())
        );
        println!("{}", report.table.head(preview_rows).frame());
    }

    for spec in &report.specs {
        print_spec(spec);
    }
    println!();
}

/// The upload guide is shown whenever some chart cannot be drawn.
fn wants_column_hint(report: &TipsReport) -> bool {
    report.table.is_empty() || !report.specs.iter().all(ChartSpec::is_renderable)
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        println!("{notice}");
    }
    println!();
}

fn print_spec(spec: &ChartSpec) {
    println!();
    println!("--- {} ---", spec.title());
    match spec.params() {
        None => println!("(not shown) {}", spec.reason().unwrap_or_default()),
        Some(ChartParams::TimeSeries(series)) => print_series(series),
        Some(ChartParams::Histogram(hist)) => print_histogram(hist),
        Some(ChartParams::Scatter(scatter)) => print_scatter(scatter),
    }
}

fn print_series(series: &TimeSeriesParams) {
    println!("{} by {} ({:?})", series.y_label, series.x_label, series.frequency);
    for point in &series.points {
        println!("{}  {:>7.2}", point.date, point.value);
    }
}

const HISTOGRAM_WIDTH: usize = 40;

fn print_histogram(hist: &HistogramParams) {
    println!("{} ({} bins, n = {})", hist.x_label, hist.bins, hist.total());
    let peak = hist.counts.iter().copied().max().unwrap_or(0).max(1);
    for (i, count) in hist.counts.iter().enumerate() {
        let (lo, hi) = (hist.edges[i], hist.edges[i + 1]);
        let bar = "#".repeat((*count as usize * HISTOGRAM_WIDTH).div_ceil(peak as usize));
        println!("{lo:>8.2} – {hi:>8.2} | {bar} {count}");
    }
    if let Some(top) = hist
        .density
        .iter()
        .max_by(|a, b| a.y.total_cmp(&b.y))
    {
        println!("Smoothed peak near {:.2} ({:.1} per bin)", top.x, top.y);
    }
}

fn print_scatter(scatter: &ScatterParams) {
    println!(
        "{} vs {}: {} points, opacity {}",
        scatter.y_label,
        scatter.x_label,
        scatter.points.len(),
        scatter.opacity
    );
    if let Some(label) = &scatter.size_label {
        let smallest = scatter
            .points
            .iter()
            .map(|p| p.marker)
            .fold(f64::INFINITY, f64::min);
        println!(
            "Marker size by {label}: {smallest:.1} to {:.1}",
            scatter.size_max
        );
    }
}
