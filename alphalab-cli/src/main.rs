//! AlphaLab CLI — run, sweep and synthetic data commands.
//!
//! Commands:
//! - `run` — backtest CSV files or a directory of them, or synthetic data
//! - `sweep` — run the same data at several lookback periods in parallel
//! - `synth` — write deterministic synthetic CSV files for demos

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use alphalab_core::data::{resolve_sources, BarDataProvider, BarSource, CsvProvider};
use alphalab_core::engine::SignalScope;
use alphalab_runner::synthetic::synthetic_symbol;
use alphalab_runner::{
    best_by_sharpe, render_summary, render_sweep, run_with_config, sweep_lookbacks,
    synthetic_series, synthetic_universe, write_csv, BacktestConfig,
};

#[derive(Parser)]
#[command(
    name = "alphalab",
    about = "AlphaLab CLI — open/volume rank-correlation alpha backtester"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a backtest and print the performance report.
    Run {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        params: ParamArgs,

        /// Print the full result as JSON instead of the text summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run the backtest once per lookback period.
    Sweep {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        params: ParamArgs,

        /// Lookback periods to test (e.g. 5 10 20).
        #[arg(long, num_args = 1.., required = true)]
        lookbacks: Vec<usize>,

        /// Print rows as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write synthetic instrument CSV files.
    Synth {
        /// Output directory (created if missing).
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,

        /// Number of instruments.
        #[arg(long, default_value_t = 3)]
        count: usize,

        /// Bars per instrument.
        #[arg(long, default_value_t = 500)]
        bars: usize,

        /// First bar date (YYYY-MM-DD).
        #[arg(long, default_value = "2020-01-02")]
        start: String,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Args)]
struct InputArgs {
    /// CSV files or directories of CSV files. The first loaded file is the
    /// primary instrument.
    #[arg(long, num_args = 1..)]
    data: Vec<PathBuf>,

    /// Use N synthetic instruments instead of files.
    #[arg(long, value_name = "N")]
    synthetic: Option<usize>,

    /// Bars per synthetic instrument.
    #[arg(long, default_value_t = 500)]
    synthetic_bars: usize,

    /// Seed for synthetic instruments.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Args)]
struct ParamArgs {
    /// Path to a TOML config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    lookback: Option<usize>,

    #[arg(long)]
    commission: Option<f64>,

    #[arg(long)]
    slippage: Option<f64>,

    #[arg(long)]
    cash: Option<f64>,

    /// Units bought on every BUY.
    #[arg(long)]
    quantity: Option<f64>,

    #[arg(long, value_enum)]
    scope: Option<ScopeArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeArg {
    Primary,
    PerInstrument,
}

impl From<ScopeArg> for SignalScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Primary => SignalScope::Primary,
            ScopeArg::PerInstrument => SignalScope::PerInstrument,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            input,
            params,
            json,
        } => run_cmd(input, params, json),
        Commands::Sweep {
            input,
            params,
            lookbacks,
            json,
        } => sweep_cmd(input, params, lookbacks, json),
        Commands::Synth {
            out_dir,
            count,
            bars,
            start,
            seed,
        } => synth_cmd(out_dir, count, bars, &start, seed),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_config(params: &ParamArgs) -> Result<BacktestConfig> {
    let mut config = match &params.config {
        Some(path) => BacktestConfig::from_file(path)?,
        None => BacktestConfig::default(),
    };
    if let Some(v) = params.lookback {
        config.lookback_period = v;
    }
    if let Some(v) = params.commission {
        config.commission_rate = v;
    }
    if let Some(v) = params.slippage {
        config.slippage_rate = v;
    }
    if let Some(v) = params.cash {
        config.starting_cash = v;
    }
    if let Some(v) = params.quantity {
        config.trade_quantity = v;
    }
    if let Some(v) = params.scope {
        config.signal_scope = v.into();
    }
    config.validate()?;
    Ok(config)
}

/// Resolve the input flags into a provider and the sources to load from it.
fn build_input(input: &InputArgs) -> Result<(Box<dyn BarDataProvider>, Vec<BarSource>)> {
    match (input.synthetic, input.data.is_empty()) {
        (Some(_), false) => bail!("--data and --synthetic are mutually exclusive"),
        (None, true) => bail!("one of --data or --synthetic is required"),
        (Some(count), true) => {
            let start = NaiveDate::from_ymd_opt(2020, 1, 2).context("invalid start date")?;
            let (provider, sources) =
                synthetic_universe(count, start, input.synthetic_bars, input.seed);
            tracing::warn!(count, "running on SYNTHETIC data");
            Ok((Box::new(provider), sources))
        }
        (None, false) => {
            let sources = resolve_sources(input.data.as_slice()).context("cannot list data sources")?;
            if sources.is_empty() {
                bail!("no CSV files found in {:?}", input.data);
            }
            Ok((Box::new(CsvProvider::new()), sources))
        }
    }
}

fn run_cmd(input: InputArgs, params: ParamArgs, json: bool) -> Result<()> {
    let config = build_config(&params)?;
    let (provider, sources) = build_input(&input)?;

    let result = run_with_config(provider.as_ref(), &sources, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_summary(&result));
    }
    if result.symbols.is_empty() {
        bail!("no source could be loaded ({} skipped)", result.skipped.len());
    }
    Ok(())
}

fn sweep_cmd(
    input: InputArgs,
    params: ParamArgs,
    lookbacks: Vec<usize>,
    json: bool,
) -> Result<()> {
    let config = build_config(&params)?;
    let (provider, sources) = build_input(&input)?;

    let rows = sweep_lookbacks(provider.as_ref(), &sources, &config, &lookbacks)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_sweep(&rows));
        if let Some(best) = best_by_sharpe(&rows) {
            println!("Best Sharpe at lookback {}", best.lookback_period);
        }
    }
    Ok(())
}

fn synth_cmd(out_dir: PathBuf, count: usize, bars: usize, start: &str, seed: u64) -> Result<()> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .with_context(|| format!("invalid --start '{start}', expected YYYY-MM-DD"))?;
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("cannot create {}", out_dir.display()))?;

    for i in 0..count {
        let symbol = synthetic_symbol(i);
        let series = synthetic_series(&symbol, start, bars, seed)?;
        let path = out_dir.join(format!("{symbol}.csv"));
        write_csv(&series, &path).with_context(|| format!("cannot write {}", path.display()))?;
        tracing::info!(
            symbol = %symbol,
            bars = series.len(),
            path = %path.display(),
            "wrote synthetic series"
        );
    }
    println!("Wrote {count} synthetic series to {}", out_dir.display());
    Ok(())
}
