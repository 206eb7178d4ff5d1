//! Per-date decision signals, one generator per strategy variant.
//!
//! Generators are pure functions of (aligned series, parameters). A signal
//! for date d depends only on data at or before d. Non-trading days and
//! dates without enough history hold; insufficient history is never an error
//! here, a run with a short warm-up still completes.

pub mod threshold;
pub mod dca;
pub mod position;

use chrono::NaiveDate;

use crate::domain::error::FundsimError;
use crate::domain::series::AlignedSeries;
use crate::domain::strategy::StrategyConfig;

/// A per-date decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    Hold,
    /// Threshold entry; the allocation policy decides the cash amount.
    Buy,
    /// Threshold exit; liquidates every held share.
    SellAll,
    /// Periodic investment carrying its own amount.
    Invest(f64),
    /// Indicator target position went 0 → 1.
    EnterLong,
    /// Indicator target position went 1 → 0.
    ExitLong,
}

/// Why a threshold signal fired, for transaction-log explanations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerNote {
    pub lookback_return_pct: f64,
    pub reference_value: f64,
    pub reference_date: NaiveDate,
    pub threshold_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub signal: Signal,
    pub note: Option<TriggerNote>,
}

impl SignalPoint {
    pub fn hold(date: NaiveDate) -> Self {
        SignalPoint {
            date,
            signal: Signal::Hold,
            note: None,
        }
    }
}

/// Generate the full per-date signal sequence for a strategy.
///
/// Returns one entry per aligned date. Rejects a malformed config with
/// `InvalidParameter` before anything runs.
pub fn generate_signals(
    series: &AlignedSeries,
    config: &StrategyConfig,
) -> Result<Vec<SignalPoint>, FundsimError> {
    config.validate()?;

    let signals = match config {
        StrategyConfig::Threshold {
            buy_pct,
            sell_pct,
            lookback_days,
        } => threshold::threshold_signals(series, *buy_pct, *sell_pct, *lookback_days),
        StrategyConfig::Dca { amount, schedule } => dca::dca_signals(series, *amount, *schedule),
        StrategyConfig::MaCrossover {
            short_window,
            long_window,
        } => position::crossover_signals(series, *short_window, *long_window),
        StrategyConfig::Rsi {
            period,
            oversold,
            overbought,
        } => position::rsi_signals(series, *period, *oversold, *overbought),
        StrategyConfig::Bollinger {
            window,
            std_multiplier,
        } => position::bollinger_signals(series, *window, *std_multiplier),
        StrategyConfig::Macd { fast, slow, signal } => {
            position::macd_signals(series, *fast, *slow, *signal)
        }
    };

    Ok(signals)
}
