use benchplot::config::ReportConfig;
use benchplot::duration::{parse_duration_ms, DurationPolicy};
use benchplot::errors::BenchPlotError;
use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::Result;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Clone, ValueEnum, Debug)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "benchplot")]
#[command(version)]
#[command(about = "Bar charts comparing optimization modes across benchmark timings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase logging verbosity (Info -> Debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Silence all logs
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format (text or json)
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the absolute and normalized comparison charts
    Plot(PlotArgs),
    /// Print the millisecond value of duration strings
    Parse {
        #[arg(value_name = "DURATION", required = true)]
        durations: Vec<String>,
    },
}

#[derive(Args)]
struct PlotArgs {
    /// Report configuration YAML
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the timing CSVs
    #[arg(long, value_name = "DIR")]
    input_dir: Option<PathBuf>,

    /// File name glob, e.g. "*_timing.csv"
    #[arg(long, value_name = "GLOB")]
    pattern: Option<String>,

    /// Directory the chart images are written to
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Mode label to normalize against (default: first mode)
    #[arg(long, value_name = "LABEL")]
    baseline: Option<String>,

    /// Fail on unrecognized durations instead of reading them as 0
    #[arg(long)]
    strict_durations: bool,

    /// Open the charts in the image viewer
    #[arg(long)]
    show: bool,

    /// Write a JSON run summary
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Compute chart data without rendering images
    #[arg(long)]
    dry_run: bool,
}

impl PlotArgs {
    fn into_config(self) -> Result<ReportConfig, BenchPlotError> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_path(path)?,
            None => ReportConfig::default(),
        };
        if let Some(dir) = self.input_dir {
            config.input_dir = dir;
        }
        if let Some(pattern) = self.pattern {
            config.pattern = pattern;
        }
        if let Some(dir) = self.out_dir {
            config.output_dir = dir;
        }
        if let Some(baseline) = self.baseline {
            config.baseline = Some(baseline);
        }
        if self.strict_durations {
            config.durations = DurationPolicy::Strict;
        }
        if let Some(summary) = self.summary {
            config.summary_path = Some(summary);
        }
        config.show |= self.show;
        config.dry_run |= self.dry_run;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // BENCHPLOT_LOG takes precedence over the CLI flags
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("BENCHPLOT_LOG")
        .from_env_lossy();

    let run_id = Uuid::new_v4();

    match cli.log_format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .with_span_list(false)
                .with_current_span(false)
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    let _span = tracing::info_span!("root", run_id = %run_id).entered();

    match cli.command {
        Commands::Plot(args) => {
            let config = args.into_config()?;
            let outcome = benchplot::runner::execute_report(&config, run_id)?;
            for path in &outcome.charts {
                println!("{}", path.display());
            }
        }
        Commands::Parse { durations } => {
            for raw in &durations {
                let ms = parse_duration_ms(raw).map_err(|e| miette::miette!("{e}"))?;
                println!("{raw}\t{ms}");
            }
        }
    }

    Ok(())
}
