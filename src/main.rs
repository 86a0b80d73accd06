//! CLI entry point for the bikeflow station traffic tool.
//!
//! Provides subcommands for computing a single traffic snapshot, sweeping
//! the time-of-day filter across a whole day, and scrubbing interactively
//! from stdin.

use anyhow::{Context, Result, bail};
use bikeflow::controller::{Controller, run_event_loop};
use bikeflow::fetch::load_source;
use bikeflow::load::{parse_stations, parse_trips};
use bikeflow::model::TimeFilter;
use bikeflow::output::{append_sweep_rows, print_json, write_views_csv};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeflow")]
#[command(about = "Per-station bike-share traffic with a time-of-day filter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one traffic snapshot at a fixed time-of-day selection
    Snapshot {
        /// Station information JSON: file path or URL
        #[arg(long)]
        stations: String,

        /// Trip history CSV: file path or URL
        #[arg(long)]
        trips: String,

        /// Minutes since midnight in 0..1440, or -1 for any time
        #[arg(short, long, default_value_t = -1, allow_hyphen_values = true)]
        time: i32,

        /// CSV file to write station views to (stdout JSON if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Recompute at fixed intervals across the day, appending to one CSV
    Sweep {
        /// Station information JSON: file path or URL
        #[arg(long)]
        stations: String,

        /// Trip history CSV: file path or URL
        #[arg(long)]
        trips: String,

        /// Minutes between selections
        #[arg(short = 's', long, default_value_t = 60)]
        step: u16,

        /// CSV file to append per-selection rows to
        #[arg(short, long, default_value = "sweep.csv")]
        output: String,
    },
    /// Read selection values from stdin and print a summary per pass
    Interactive {
        /// Station information JSON: file path or URL
        #[arg(long)]
        stations: String,

        /// Trip history CSV: file path or URL
        #[arg(long)]
        trips: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeflow.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeflow.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Snapshot {
            stations,
            trips,
            time,
            output,
        } => {
            let mut controller = build_controller(&stations, &trips).await?;

            let Some(filter) = TimeFilter::from_slider(time) else {
                bail!("time must be -1 or in 0..1440, got {time}");
            };

            let views = controller.apply(filter);
            let label = controller.selection_label();
            info!(time, label = %label, "Snapshot computed");

            match output {
                Some(path) => write_views_csv(&path, &views)?,
                None => print_json(&label, &views)?,
            }
        }
        Commands::Sweep {
            stations,
            trips,
            step,
            output,
        } => {
            if step == 0 || step >= 1440 {
                bail!("step must be in 1..1440, got {step}");
            }

            let mut controller = build_controller(&stations, &trips).await?;

            for minutes in (0..1440).step_by(step as usize) {
                let filter = TimeFilter::At(minutes);
                let views = controller.apply(filter);
                append_sweep_rows(&output, filter, &views)?;
            }

            info!(output = %output, step, "Sweep complete");
        }
        Commands::Interactive { stations, trips } => {
            let mut controller = build_controller(&stations, &trips).await?;
            let (tx, rx) = mpsc::channel(64);

            // Forward stdin lines as selection events; the event loop
            // coalesces bursts to the latest value.
            let reader_task = tokio::spawn(async move {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let selection = match trimmed.parse::<i32>().map(TimeFilter::from_slider) {
                        Ok(Some(filter)) => filter,
                        _ => {
                            warn!(input = trimmed, "Ignoring invalid selection");
                            continue;
                        }
                    };

                    if tx.send(selection).await.is_err() {
                        break;
                    }
                }
            });

            run_event_loop(&mut controller, rx, |label, views| {
                let busiest = views
                    .iter()
                    .max_by_key(|v| v.total_traffic)
                    .map(|v| format!("{} ({} trips)", v.name, v.total_traffic))
                    .unwrap_or_else(|| "none".to_string());
                let departures: usize = views.iter().map(|v| v.departures).sum();

                let shown = if label.is_empty() { "any time" } else { label };
                println!("[{shown}] {departures} departures in window, busiest station: {busiest}");
            })
            .await;

            reader_task.await.context("stdin reader task failed")?;
        }
    }

    Ok(())
}

/// Loads both datasets and builds the controller.
///
/// Either dataset failing to load or parse aborts activation before any
/// aggregation runs.
#[tracing::instrument(skip_all, fields(stations = %stations_src, trips = %trips_src))]
async fn build_controller(stations_src: &str, trips_src: &str) -> Result<Controller> {
    let station_bytes = load_source(stations_src)
        .await
        .context("loading station dataset")?;
    let stations = parse_stations(&station_bytes)?;

    let trip_bytes = load_source(trips_src)
        .await
        .context("loading trip dataset")?;
    let trips = parse_trips(trip_bytes.as_slice())?;

    Ok(Controller::new(stations, trips))
}
