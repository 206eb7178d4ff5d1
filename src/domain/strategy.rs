//! Strategy configuration as a closed set of tagged variants.
//!
//! Dispatch on strategy kind happens by exhaustive match, never by name
//! lookup; the string-to-variant conversion lives at the config boundary.

use chrono::Weekday;
use std::fmt;

use crate::domain::error::FundsimError;

/// When a dollar-cost-averaging strategy invests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DcaSchedule {
    /// First trading day on/after `day` of each calendar month. Clamped to
    /// the month length; a month with no such trading day is skipped.
    Monthly { day: u32 },
    /// First trading day on/after `weekday` within each Monday-anchored week.
    Weekly { weekday: Weekday },
    /// Every `interval`-th trading day, starting with the first.
    EveryDays { interval: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StrategyConfig {
    /// Mean-reversion on the lookback return: buy on a drop, sell all on a
    /// rise. Thresholds are percentages, `buy_pct < 0 < sell_pct`.
    Threshold {
        buy_pct: f64,
        sell_pct: f64,
        lookback_days: usize,
    },
    /// Periodic fixed-amount investing.
    Dca { amount: f64, schedule: DcaSchedule },
    /// Long while the short moving average is above the long one.
    MaCrossover {
        short_window: usize,
        long_window: usize,
    },
    /// Enter on an upward cross through `oversold`, exit on a downward cross
    /// through `overbought`.
    Rsi {
        period: usize,
        oversold: f64,
        overbought: f64,
    },
    /// Enter on an upward cross of the lower band, exit on a downward cross
    /// of the upper band.
    Bollinger { window: usize, std_multiplier: f64 },
    /// Enter when the MACD line crosses above its signal line, exit on the
    /// reverse crossing.
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

impl StrategyConfig {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyConfig::Threshold { .. } => "threshold",
            StrategyConfig::Dca { .. } => "dca",
            StrategyConfig::MaCrossover { .. } => "ma-crossover",
            StrategyConfig::Rsi { .. } => "rsi",
            StrategyConfig::Bollinger { .. } => "bollinger",
            StrategyConfig::Macd { .. } => "macd",
        }
    }

    pub fn is_dca(&self) -> bool {
        matches!(self, StrategyConfig::Dca { .. })
    }

    /// Core-side parameter checks. The config boundary validates first with
    /// section/key context; this is the last line before a simulation runs.
    pub fn validate(&self) -> Result<(), FundsimError> {
        match self {
            StrategyConfig::Threshold {
                buy_pct,
                sell_pct,
                lookback_days,
            } => {
                if !buy_pct.is_finite() || *buy_pct >= 0.0 {
                    return Err(FundsimError::invalid_parameter(
                        "buy_pct",
                        "must be negative",
                    ));
                }
                if !sell_pct.is_finite() || *sell_pct <= 0.0 {
                    return Err(FundsimError::invalid_parameter(
                        "sell_pct",
                        "must be positive",
                    ));
                }
                if *lookback_days == 0 {
                    return Err(FundsimError::invalid_parameter(
                        "lookback_days",
                        "must be at least 1",
                    ));
                }
            }
            StrategyConfig::Dca { amount, schedule } => {
                if !amount.is_finite() || *amount <= 0.0 {
                    return Err(FundsimError::invalid_parameter(
                        "amount",
                        "must be positive",
                    ));
                }
                match schedule {
                    DcaSchedule::Monthly { day } => {
                        if !(1..=28).contains(day) {
                            return Err(FundsimError::invalid_parameter(
                                "day",
                                "must be between 1 and 28",
                            ));
                        }
                    }
                    DcaSchedule::Weekly { weekday } => {
                        if matches!(weekday, Weekday::Sat | Weekday::Sun) {
                            return Err(FundsimError::invalid_parameter(
                                "weekday",
                                "must be a weekday",
                            ));
                        }
                    }
                    DcaSchedule::EveryDays { interval } => {
                        if *interval == 0 {
                            return Err(FundsimError::invalid_parameter(
                                "interval",
                                "must be at least 1",
                            ));
                        }
                    }
                }
            }
            StrategyConfig::MaCrossover {
                short_window,
                long_window,
            } => {
                if *short_window == 0 || *long_window == 0 {
                    return Err(FundsimError::invalid_parameter(
                        "window",
                        "window sizes must be positive",
                    ));
                }
                if short_window >= long_window {
                    return Err(FundsimError::invalid_parameter(
                        "short_window",
                        "must be smaller than long_window",
                    ));
                }
            }
            StrategyConfig::Rsi {
                period,
                oversold,
                overbought,
            } => {
                if *period == 0 {
                    return Err(FundsimError::invalid_parameter(
                        "period",
                        "must be positive",
                    ));
                }
                if !(*oversold > 0.0 && *oversold < *overbought && *overbought < 100.0) {
                    return Err(FundsimError::invalid_parameter(
                        "oversold/overbought",
                        "require 0 < oversold < overbought < 100",
                    ));
                }
            }
            StrategyConfig::Bollinger {
                window,
                std_multiplier,
            } => {
                if *window == 0 {
                    return Err(FundsimError::invalid_parameter(
                        "window",
                        "must be positive",
                    ));
                }
                if !std_multiplier.is_finite() || *std_multiplier <= 0.0 {
                    return Err(FundsimError::invalid_parameter(
                        "std_multiplier",
                        "must be positive",
                    ));
                }
            }
            StrategyConfig::Macd { fast, slow, signal } => {
                if *fast == 0 || *slow == 0 || *signal == 0 {
                    return Err(FundsimError::invalid_parameter(
                        "period",
                        "MACD periods must be positive",
                    ));
                }
                if fast >= slow {
                    return Err(FundsimError::invalid_parameter(
                        "fast",
                        "must be smaller than slow",
                    ));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for StrategyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyConfig::Threshold {
                buy_pct,
                sell_pct,
                lookback_days,
            } => write!(
                f,
                "threshold(buy {buy_pct}%, sell {sell_pct}%, lookback {lookback_days}d)"
            ),
            StrategyConfig::Dca { amount, schedule } => match schedule {
                DcaSchedule::Monthly { day } => write!(f, "dca({amount} monthly, day {day})"),
                DcaSchedule::Weekly { weekday } => write!(f, "dca({amount} weekly, {weekday})"),
                DcaSchedule::EveryDays { interval } => {
                    write!(f, "dca({amount} every {interval} trading days)")
                }
            },
            StrategyConfig::MaCrossover {
                short_window,
                long_window,
            } => write!(f, "ma-crossover({short_window}/{long_window})"),
            StrategyConfig::Rsi {
                period,
                oversold,
                overbought,
            } => write!(f, "rsi({period}, {oversold}/{overbought})"),
            StrategyConfig::Bollinger {
                window,
                std_multiplier,
            } => write!(f, "bollinger({window}, {std_multiplier}σ)"),
            StrategyConfig::Macd { fast, slow, signal } => {
                write!(f, "macd({fast},{slow},{signal})")
            }
        }
    }
}
