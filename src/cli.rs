//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart::SvgChartAdapter;
use crate::domain::config_validation::{validate_config, validate_settings};
use crate::domain::error::BandsigError;
use crate::domain::indicator::IndicatorParams;
use crate::domain::pipeline::{normalize_ticker, run_pipeline, PipelineOutcome, PipelineRequest};
use crate::domain::returns::ReturnSummary;
use crate::domain::settings::{DataSource, RunSettings};
use crate::ports::chart_port::ChartPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceProvider;

#[derive(Parser, Debug)]
#[command(name = "bandsig", about = "Bollinger Band + RSI signal backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch prices for one ticker, generate signals and report returns
    Run(RunArgs),
    /// Validate a configuration file and print the effective settings
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Ticker symbol; prompted for on stdin when omitted
    #[arg(short, long)]
    pub ticker: Option<String>,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bollinger_window: Option<usize>,
    #[arg(long)]
    pub rsi_window: Option<usize>,
    /// Years of daily history to fetch
    #[arg(long)]
    pub years: Option<u32>,
    /// Read `<TICKER>.csv` from this directory instead of Yahoo Finance
    #[arg(long)]
    pub csv_dir: Option<PathBuf>,
    /// Write the signal chart as SVG to this path
    #[arg(long)]
    pub chart: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Run(args) => run_signals(&args),
        Command::Validate { config } => run_validate(&config),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, BandsigError> {
    FileConfigAdapter::from_file(path).map_err(|e| BandsigError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Read an integer key into `T`, keeping `current` when the key is absent.
fn config_int<T: TryFrom<i64>>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    current: T,
) -> Result<T, BandsigError> {
    if config.get_string(section, key).is_none() {
        return Ok(current);
    }
    let value = config.get_int(section, key, -1);
    T::try_from(value).map_err(|_| BandsigError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("{} is out of range", value),
    })
}

/// Merge defaults, config file values and CLI flags, in increasing priority.
pub fn build_settings(
    config: Option<&dyn ConfigPort>,
    args: &RunArgs,
) -> Result<RunSettings, BandsigError> {
    let mut settings = RunSettings::default();

    if let Some(config) = config {
        validate_config(config)?;

        settings.params = IndicatorParams {
            bollinger_window: config_int(
                config,
                "indicators",
                "bollinger_window",
                settings.params.bollinger_window,
            )?,
            rsi_window: config_int(config, "indicators", "rsi_window", settings.params.rsi_window)?,
        };
        settings.period_years = config_int(config, "data", "period_years", settings.period_years)?;

        let source = config
            .get_string("data", "source")
            .map(|s| s.trim().to_lowercase());
        if source.as_deref() == Some("csv") {
            let dir = config.get_string("data", "csv_dir").unwrap_or_default();
            settings.source = DataSource::Csv {
                dir: PathBuf::from(dir.trim()),
            };
        }

        settings.chart_output = config
            .get_string("chart", "output")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
    }

    if let Some(w) = args.bollinger_window {
        settings.params.bollinger_window = w;
    }
    if let Some(w) = args.rsi_window {
        settings.params.rsi_window = w;
    }
    if let Some(y) = args.years {
        settings.period_years = y;
    }
    if let Some(dir) = &args.csv_dir {
        settings.source = DataSource::Csv { dir: dir.clone() };
    }
    if let Some(chart) = &args.chart {
        settings.chart_output = Some(chart.clone());
    }

    validate_settings(&settings)?;
    Ok(settings)
}

/// Use the `--ticker` value if given, otherwise prompt on `output` and read
/// one line from `input`.
pub fn resolve_ticker<R: BufRead, W: Write>(
    ticker: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> Result<String, BandsigError> {
    if let Some(t) = ticker {
        return normalize_ticker(t);
    }

    writeln!(output, "Choose a Ticker")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    normalize_ticker(&line)
}

pub fn make_provider(source: &DataSource) -> Result<Box<dyn PriceProvider>, BandsigError> {
    match source {
        DataSource::Csv { dir } => Ok(Box::new(CsvAdapter::new(dir.clone()))),
        #[cfg(feature = "yahoo")]
        DataSource::Yahoo => Ok(Box::new(
            crate::adapters::yahoo_adapter::YahooAdapter::new()?,
        )),
        #[cfg(not(feature = "yahoo"))]
        DataSource::Yahoo => Err(BandsigError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: "built without the yahoo feature; use a csv source".into(),
        }),
    }
}

/// The two console lines: cumulative and annualized return in percent.
pub fn format_report(summary: &ReturnSummary) -> String {
    format!(
        "Cumulative Return: {:.2}%\nAnnualized Return: {:.2}%\n",
        summary.cumulative_percent(),
        summary.annualized_percent()
    )
}

/// Run the pipeline for `ticker` and write the report to `out`.
pub fn run_with_provider<W: Write>(
    provider: &dyn PriceProvider,
    settings: &RunSettings,
    ticker: &str,
    end_date: NaiveDate,
    out: &mut W,
) -> Result<PipelineOutcome, BandsigError> {
    let chart = settings.chart_output.clone().map(SvgChartAdapter::new);
    let request = PipelineRequest {
        ticker: ticker.to_string(),
        params: settings.params,
        period_years: settings.period_years,
        end_date,
    };

    let outcome = run_pipeline(
        provider,
        chart.as_ref().map(|c| c as &dyn ChartPort),
        &request,
    )?;

    out.write_all(format_report(&outcome.summary).as_bytes())?;
    Ok(outcome)
}

fn run_signals(args: &RunArgs) -> Result<(), BandsigError> {
    let config = match &args.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            Some(load_config(path)?)
        }
        None => None,
    };
    let settings = build_settings(config.as_ref().map(|c| c as &dyn ConfigPort), args)?;

    let ticker = resolve_ticker(
        args.ticker.as_deref(),
        &mut io::stdin().lock(),
        &mut io::stderr(),
    )?;
    tracing::info!(%ticker, source = %settings.source, params = %settings.params, "starting run");

    let provider = make_provider(&settings.source)?;
    let today = chrono::Local::now().date_naive();
    let outcome = run_with_provider(
        provider.as_ref(),
        &settings,
        &ticker,
        today,
        &mut io::stdout().lock(),
    )?;

    tracing::info!(
        trades = outcome.summary.trade_count(),
        days = outcome.summary.total_days,
        "run complete"
    );
    Ok(())
}

fn run_validate(config_path: &PathBuf) -> Result<(), BandsigError> {
    tracing::info!(path = %config_path.display(), "validating config");
    let config = load_config(config_path)?;
    let settings = build_settings(Some(&config), &RunArgs::default())?;

    println!("bollinger_window = {}", settings.params.bollinger_window);
    println!("rsi_window       = {}", settings.params.rsi_window);
    println!("period_years     = {}", settings.period_years);
    println!("source           = {}", settings.source);
    match &settings.chart_output {
        Some(path) => println!("chart            = {}", path.display()),
        None => println!("chart            = (none)"),
    }
    println!("Configuration is valid.");
    Ok(())
}
