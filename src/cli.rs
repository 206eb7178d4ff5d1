//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_quote_adapter::CsvQuoteAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::advisor::{advise, Advice};
use crate::domain::batch::run_batch;
use crate::domain::config_validation::{
    parse_weekday, validate_simulation_config, validate_strategy_config,
};
use crate::domain::error::FundsimError;
use crate::domain::execution::AllocationPolicy;
use crate::domain::metrics::DEFAULT_RISK_FREE_RATE;
use crate::domain::series::AlignedSeries;
use crate::domain::simulation::{run_simulation, SimulationRequest, SimulationResult};
use crate::domain::strategy::{DcaSchedule, StrategyConfig};
use crate::ports::calendar_port::WeekdayCalendar;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "fundsim", about = "Fund investment strategy simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one strategy simulation
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        /// Write the transaction log as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run DCA and threshold side by side over the same series
    Compare {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Classify today's estimated price as buy, sell or hold
    Advise {
        #[arg(short, long)]
        config: PathBuf,
        /// Today's live estimated price
        #[arg(long)]
        estimated_value: f64,
        /// The date the estimate belongs to (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range of the configured quote file
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate { config, output } => run_simulate(&config, output.as_ref()),
        Command::Compare { config } => run_compare(&config),
        Command::Advise {
            config,
            estimated_value,
            date,
        } => run_advise(&config, estimated_value, &date),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config } => run_info(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = FundsimError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_simulate(config_path: &PathBuf, output_path: Option<&PathBuf>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let strategy = match build_strategy_config(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Strategy: {}", strategy);

    let series = match load_series(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!(
        "Aligned {} dates ({} trading days), {} to {}",
        series.len(),
        series.trading_day_count(),
        series.first_date(),
        series.last_date(),
    );

    let request = build_simulation_request(&config, strategy);
    let result = match run_simulation(&series, &request) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_summary(&result);

    if let Some(output) = output_path {
        let path = output.display().to_string();
        match CsvReportAdapter.write(&result, result.strategy.name(), &path) {
            Ok(()) => eprintln!("\nTransaction log written to: {}", path),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}

fn run_compare(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let series = match load_series(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let dca_amount = config.get_double("strategy", "amount", 1000.0);
    let dca = StrategyConfig::Dca {
        amount: dca_amount,
        schedule: DcaSchedule::Monthly {
            day: config.get_int("strategy", "day", 1).clamp(1, 28) as u32,
        },
    };
    let threshold = StrategyConfig::Threshold {
        buy_pct: config.get_double("strategy", "buy_threshold", -5.0),
        sell_pct: config.get_double("strategy", "sell_threshold", 10.0),
        lookback_days: config.get_int("strategy", "lookback_days", 20).max(1) as usize,
    };

    let trade_amount = config.get_double("simulation", "trade_amount", 10_000.0);
    let commission_rate = config.get_double("simulation", "commission_rate", 0.0);
    let risk_free_rate =
        config.get_double("simulation", "risk_free_rate", DEFAULT_RISK_FREE_RATE);

    let requests = vec![
        (
            "dca".to_string(),
            SimulationRequest {
                strategy: dca,
                policy: AllocationPolicy::ExternalTopUp {
                    trade_amount: dca_amount,
                },
                initial_capital: 0.0,
                commission_rate,
                risk_free_rate,
            },
        ),
        (
            "threshold".to_string(),
            SimulationRequest {
                strategy: threshold,
                policy: AllocationPolicy::ExternalTopUp { trade_amount },
                initial_capital: 0.0,
                commission_rate,
                risk_free_rate,
            },
        ),
    ];

    eprintln!("Running {} strategies over {} dates", requests.len(), series.len());
    let results = run_batch(&series, &requests);

    let mut returns = Vec::new();
    for (label, result) in &results {
        match result {
            Ok(r) => {
                print_summary(r);
                returns.push((label.clone(), r.report.total_return_pct));
            }
            Err(e) => {
                eprintln!("error in {} run: {}", label, e);
                return e.into();
            }
        }
    }

    if let (Some(first), Some(second)) = (returns.first(), returns.get(1)) {
        let (winner, margin) = if first.1 >= second.1 {
            (&first.0, first.1 - second.1)
        } else {
            (&second.0, second.1 - first.1)
        };
        eprintln!(
            "\n{} came out ahead by {:.2} percentage points over this window",
            winner, margin
        );
    }

    ExitCode::SUCCESS
}

fn run_advise(config_path: &PathBuf, estimated_value: f64, date_str: &str) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let today = match NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => {
            let err = FundsimError::invalid_parameter("date", "expected YYYY-MM-DD");
            eprintln!("error: {err}");
            return (&err).into();
        }
    };

    let feed = quote_feed(&config);
    let code = resolve_code(&config);
    let history = match feed.fetch_history(&code, NaiveDate::MIN, today) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let buy_pct = config.get_double("strategy", "buy_threshold", -5.0);
    let sell_pct = config.get_double("strategy", "sell_threshold", 10.0);
    let lookback_days = config.get_int("strategy", "lookback_days", 20).max(0) as usize;

    match advise(&history, today, estimated_value, buy_pct, sell_pct, lookback_days) {
        Ok(advice) => {
            print_advice(&advice, today);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    match build_strategy_config(&config) {
        Ok(strategy) => {
            eprintln!("Strategy: {}", strategy);
            eprintln!("Configuration is valid");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let feed = quote_feed(&config);
    let code = resolve_code(&config);

    match feed.data_range(&code) {
        Ok(Some((min_date, max_date, count))) => {
            println!("{}: {} observations, {} to {}", code, count, min_date, max_date);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no observations found", code);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Strategy parameters from the `[strategy]` section. The kind string is
/// converted here, once, into the closed variant set.
pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, FundsimError> {
    let kind = config
        .get_string("strategy", "kind")
        .ok_or_else(|| FundsimError::ConfigMissing {
            section: "strategy".to_string(),
            key: "kind".to_string(),
        })?;

    let strategy = match kind.trim().to_lowercase().as_str() {
        "threshold" => StrategyConfig::Threshold {
            buy_pct: config.get_double("strategy", "buy_threshold", -5.0),
            sell_pct: config.get_double("strategy", "sell_threshold", 10.0),
            lookback_days: config.get_int("strategy", "lookback_days", 20).max(0) as usize,
        },
        "dca" => {
            let amount = config.get_double("strategy", "amount", 1000.0);
            let frequency = config
                .get_string("strategy", "frequency")
                .unwrap_or_else(|| "monthly".to_string());
            let schedule = match frequency.trim().to_lowercase().as_str() {
                "monthly" => DcaSchedule::Monthly {
                    day: config.get_int("strategy", "day", 1).clamp(0, u32::MAX as i64) as u32,
                },
                "weekly" => {
                    let weekday_str = config
                        .get_string("strategy", "weekday")
                        .unwrap_or_else(|| "monday".to_string());
                    let weekday = parse_weekday(&weekday_str).ok_or_else(|| {
                        FundsimError::ConfigInvalid {
                            section: "strategy".to_string(),
                            key: "weekday".to_string(),
                            reason: "weekday must be monday through friday".to_string(),
                        }
                    })?;
                    DcaSchedule::Weekly { weekday }
                }
                "interval" => DcaSchedule::EveryDays {
                    interval: config.get_int("strategy", "interval_days", 20).max(0) as usize,
                },
                other => {
                    return Err(FundsimError::ConfigInvalid {
                        section: "strategy".to_string(),
                        key: "frequency".to_string(),
                        reason: format!("unknown frequency '{}'", other),
                    });
                }
            };
            StrategyConfig::Dca { amount, schedule }
        }
        "ma-crossover" => StrategyConfig::MaCrossover {
            short_window: config.get_int("strategy", "short_window", 20).max(0) as usize,
            long_window: config.get_int("strategy", "long_window", 60).max(0) as usize,
        },
        "rsi" => StrategyConfig::Rsi {
            period: config.get_int("strategy", "period", 14).max(0) as usize,
            oversold: config.get_double("strategy", "oversold", 30.0),
            overbought: config.get_double("strategy", "overbought", 70.0),
        },
        "bollinger" => StrategyConfig::Bollinger {
            window: config.get_int("strategy", "window", 20).max(0) as usize,
            std_multiplier: config.get_double("strategy", "std_multiplier", 2.0),
        },
        "macd" => StrategyConfig::Macd {
            fast: config.get_int("strategy", "fast", 12).max(0) as usize,
            slow: config.get_int("strategy", "slow", 26).max(0) as usize,
            signal: config.get_int("strategy", "signal", 9).max(0) as usize,
        },
        other => {
            return Err(FundsimError::ConfigInvalid {
                section: "strategy".to_string(),
                key: "kind".to_string(),
                reason: format!("unknown strategy kind '{}'", other),
            });
        }
    };

    strategy.validate()?;
    Ok(strategy)
}

pub fn build_simulation_request(
    config: &dyn ConfigPort,
    strategy: StrategyConfig,
) -> SimulationRequest {
    let trade_amount = config.get_double("simulation", "trade_amount", 10_000.0);
    let allocation = config
        .get_string("simulation", "allocation")
        .unwrap_or_else(|| "external-topup".to_string());

    let policy = match allocation.trim().to_lowercase().as_str() {
        "full" => AllocationPolicy::FullAllocation,
        "fixed" => AllocationPolicy::FixedAmount {
            amount: trade_amount,
        },
        _ => AllocationPolicy::ExternalTopUp { trade_amount },
    };

    SimulationRequest {
        strategy,
        policy,
        initial_capital: config.get_double("simulation", "initial_capital", 0.0),
        commission_rate: config.get_double("simulation", "commission_rate", 0.0),
        risk_free_rate: config.get_double("simulation", "risk_free_rate", DEFAULT_RISK_FREE_RATE),
    }
}

fn quote_feed(config: &dyn ConfigPort) -> CsvQuoteAdapter {
    let csv_path = config
        .get_string("data", "csv_path")
        .unwrap_or_else(|| "quotes.csv".to_string());
    CsvQuoteAdapter::new(PathBuf::from(csv_path))
}

fn resolve_code(config: &dyn ConfigPort) -> String {
    config
        .get_string("data", "code")
        .unwrap_or_else(|| "fund".to_string())
}

fn load_series(config: &dyn ConfigPort) -> Result<AlignedSeries, FundsimError> {
    let start = parse_config_date(config, "start_date")?;
    let end = parse_config_date(config, "end_date")?;

    let feed = quote_feed(config);
    let code = resolve_code(config);
    eprintln!("Fetching observations for {}", code);
    let observations = feed.fetch_history(&code, start, end)?;

    let calendar = config
        .get_string("simulation", "calendar")
        .unwrap_or_else(|| "observed".to_string());
    match calendar.trim().to_lowercase().as_str() {
        "weekday" => AlignedSeries::align_with_calendar(&observations, start, end, &WeekdayCalendar),
        _ => AlignedSeries::align(&observations, start, end),
    }
}

fn parse_config_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, FundsimError> {
    let value = config
        .get_string("simulation", key)
        .ok_or_else(|| FundsimError::ConfigMissing {
            section: "simulation".to_string(),
            key: key.to_string(),
        })?;
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| FundsimError::ConfigInvalid {
        section: "simulation".to_string(),
        key: key.to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

fn print_summary(result: &SimulationResult) {
    let report = &result.report;
    eprintln!("\n=== {} ===", result.strategy);
    eprintln!("Final Value:      {:.2}", report.final_value);
    eprintln!("Total Invested:   {:.2}", report.total_invested);
    eprintln!("Total Return:     {:.2}%", report.total_return_pct);
    eprintln!("Annualized:       {:.2}%", report.annualized_return_pct);
    eprintln!("Volatility:       {:.2}%", report.annualized_volatility_pct);
    eprintln!("Sharpe Ratio:     {:.2}", report.sharpe_ratio);
    eprintln!("Max Drawdown:     {:.2}%", report.max_drawdown_pct);
    eprintln!("Benchmark:        {:.2}%", report.benchmark_return_pct);
    eprintln!("Trades:           {}", result.transactions.len());
}

fn print_advice(advice: &Advice, today: NaiveDate) {
    println!("{}", advice.action.label());
    eprintln!("\nAdvice for {}: {}", today, advice.action.label());
    eprintln!(
        "  estimated value:    {:.4}",
        advice.estimated_value
    );
    eprintln!(
        "  reference value:    {:.4} on {}",
        advice.reference_value, advice.reference_date
    );
    eprintln!(
        "  lookback return:    {:.2}% over {} trading days",
        advice.estimated_return_pct, advice.lookback_days
    );
    eprintln!(
        "  thresholds:         buy <= {}%, sell >= {}%",
        advice.buy_pct, advice.sell_pct
    );
}
