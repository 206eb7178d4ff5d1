//! Configuration validation.
//!
//! Validates all config fields at the boundary, before a simulation is
//! built. The domain types defend again with `InvalidParameter`; this layer
//! exists so a bad INI file fails fast with the offending section and key.

use crate::domain::error::FundsimError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const ALLOCATION_KINDS: &[&str] = &["full", "fixed", "external-topup"];
pub const STRATEGY_KINDS: &[&str] = &[
    "threshold",
    "dca",
    "ma-crossover",
    "rsi",
    "bollinger",
    "macd",
];

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), FundsimError> {
    validate_dates(config)?;
    validate_initial_capital(config)?;
    validate_commission_rate(config)?;
    validate_risk_free_rate(config)?;
    validate_allocation(config)?;
    validate_calendar(config)?;
    validate_data_source(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), FundsimError> {
    let kind = match config.get_string("strategy", "kind") {
        Some(k) if !k.trim().is_empty() => k.trim().to_lowercase(),
        _ => {
            return Err(FundsimError::ConfigMissing {
                section: "strategy".to_string(),
                key: "kind".to_string(),
            });
        }
    };

    match kind.as_str() {
        "threshold" => validate_threshold(config),
        "dca" => validate_dca(config),
        "ma-crossover" => validate_crossover(config),
        "rsi" => validate_rsi(config),
        "bollinger" => validate_bollinger(config),
        "macd" => validate_macd(config),
        other => Err(FundsimError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "kind".to_string(),
            reason: format!(
                "unknown strategy kind '{}', expected one of: {}",
                other,
                STRATEGY_KINDS.join(", ")
            ),
        }),
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> FundsimError {
    FundsimError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), FundsimError> {
    let start = parse_date(config, "start_date")?;
    let end = parse_date(config, "end_date")?;
    if start > end {
        return Err(invalid(
            "simulation",
            "start_date",
            "start_date must not be after end_date",
        ));
    }
    Ok(())
}

fn parse_date(config: &dyn ConfigPort, field: &str) -> Result<NaiveDate, FundsimError> {
    match config.get_string("simulation", field) {
        None => Err(FundsimError::ConfigMissing {
            section: "simulation".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            invalid(
                "simulation",
                field,
                format!("invalid {} format, expected YYYY-MM-DD", field),
            )
        }),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), FundsimError> {
    let value = config.get_double("simulation", "initial_capital", 0.0);
    if value < 0.0 {
        return Err(invalid(
            "simulation",
            "initial_capital",
            "initial_capital must be non-negative",
        ));
    }
    Ok(())
}

fn validate_commission_rate(config: &dyn ConfigPort) -> Result<(), FundsimError> {
    let value = config.get_double("simulation", "commission_rate", 0.0);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "simulation",
            "commission_rate",
            "commission_rate must be a fraction in [0, 1)",
        ));
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), FundsimError> {
    let value = config.get_double("simulation", "risk_free_rate", 0.03);
    if value < 0.0 || value >= 1.0 {
        return Err(invalid(
            "simulation",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_allocation(config: &dyn ConfigPort) -> Result<(), FundsimError> {
    let allocation = config
        .get_string("simulation", "allocation")
        .unwrap_or_else(|| "external-topup".to_string());
    let allocation = allocation.trim().to_lowercase();

    if !ALLOCATION_KINDS.contains(&allocation.as_str()) {
        return Err(invalid(
            "simulation",
            "allocation",
            format!(
                "unknown allocation '{}', expected one of: {}",
                allocation,
                ALLOCATION_KINDS.join(", ")
            ),
        ));
    }

    if allocation != "full" {
        let amount = config.get_double("simulation", "trade_amount", 10_000.0);
        if amount <= 0.0 {
            return Err(invalid(
                "simulation",
                "trade_amount",
                "trade_amount must be positive",
            ));
        }
    }
    Ok(())
}

fn validate_calendar(config: &dyn ConfigPort) -> Result<(), FundsimError> {
    let calendar = config
        .get_string("simulation", "calendar")
        .unwrap_or_else(|| "observed".to_string());
    match calendar.trim().to_lowercase().as_str() {
        "observed" | "weekday" => Ok(()),
        other => Err(invalid(
            "simulation",
            "calendar",
            format!("unknown calendar '{}', expected observed or weekday", other),
        )),
    }
}

fn validate_data_source(config: &dyn ConfigPort) -> Result<(), FundsimError> {
    match config.get_string("data", "csv_path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(FundsimError::ConfigMissing {
            section: "data".to_string(),
            key: "csv_path".to_string(),
        }),
    }
}

fn validate_threshold(config: &dyn ConfigPort) -> Result<(), FundsimError> {
    let buy = config.get_double("strategy", "buy_threshold", -5.0);
    if buy >= 0.0 {
        return Err(invalid(
            "strategy",
            "buy_threshold",
            "buy_threshold must be negative",
        ));
    }
    let sell = config.get_double("strategy", "sell_threshold", 10.0);
    if sell <= 0.0 {
        return Err(invalid(
            "strategy",
            "sell_threshold",
            "sell_threshold must be positive",
        ));
    }
    let lookback = config.get_int("strategy", "lookback_days", 20);
    if lookback < 1 {
        return Err(invalid(
            "strategy",
            "lookback_days",
            "lookback_days must be at least 1",
        ));
    }
    Ok(())
}

fn validate_dca(config: &dyn ConfigPort) -> Result<(), FundsimError> {
    let amount = config.get_double("strategy", "amount", 1000.0);
    if amount <= 0.0 {
        return Err(invalid("strategy", "amount", "amount must be positive"));
    }

    let frequency = config
        .get_string("strategy", "frequency")
        .unwrap_or_else(|| "monthly".to_string());
    match frequency.trim().to_lowercase().as_str() {
        "monthly" => {
            let day = config.get_int("strategy", "day", 1);
            if !(1..=28).contains(&day) {
                return Err(invalid("strategy", "day", "day must be between 1 and 28"));
            }
        }
        "weekly" => {
            let weekday = config
                .get_string("strategy", "weekday")
                .unwrap_or_else(|| "monday".to_string());
            if parse_weekday(&weekday).is_none() {
                return Err(invalid(
                    "strategy",
                    "weekday",
                    "weekday must be monday through friday",
                ));
            }
        }
        "interval" => {
            let interval = config.get_int("strategy", "interval_days", 20);
            if interval < 1 {
                return Err(invalid(
                    "strategy",
                    "interval_days",
                    "interval_days must be at least 1",
                ));
            }
        }
        other => {
            return Err(invalid(
                "strategy",
                "frequency",
                format!(
                    "unknown frequency '{}', expected monthly, weekly or interval",
                    other
                ),
            ));
        }
    }
    Ok(())
}

pub fn parse_weekday(value: &str) -> Option<chrono::Weekday> {
    match value.trim().to_lowercase().as_str() {
        "monday" | "mon" => Some(chrono::Weekday::Mon),
        "tuesday" | "tue" => Some(chrono::Weekday::Tue),
        "wednesday" | "wed" => Some(chrono::Weekday::Wed),
        "thursday" | "thu" => Some(chrono::Weekday::Thu),
        "friday" | "fri" => Some(chrono::Weekday::Fri),
        _ => None,
    }
}

fn validate_crossover(config: &dyn ConfigPort) -> Result<(), FundsimError> {
    let short = config.get_int("strategy", "short_window", 20);
    let long = config.get_int("strategy", "long_window", 60);
    if short < 1 || long < 1 {
        return Err(invalid(
            "strategy",
            "short_window",
            "window sizes must be positive",
        ));
    }
    if short >= long {
        return Err(invalid(
            "strategy",
            "short_window",
            "short_window must be smaller than long_window",
        ));
    }
    Ok(())
}

fn validate_rsi(config: &dyn ConfigPort) -> Result<(), FundsimError> {
    let period = config.get_int("strategy", "period", 14);
    if period < 1 {
        return Err(invalid("strategy", "period", "period must be positive"));
    }
    let oversold = config.get_double("strategy", "oversold", 30.0);
    let overbought = config.get_double("strategy", "overbought", 70.0);
    if !(oversold > 0.0 && oversold < overbought && overbought < 100.0) {
        return Err(invalid(
            "strategy",
            "oversold",
            "require 0 < oversold < overbought < 100",
        ));
    }
    Ok(())
}

fn validate_bollinger(config: &dyn ConfigPort) -> Result<(), FundsimError> {
    let window = config.get_int("strategy", "window", 20);
    if window < 1 {
        return Err(invalid("strategy", "window", "window must be positive"));
    }
    let multiplier = config.get_double("strategy", "std_multiplier", 2.0);
    if multiplier <= 0.0 {
        return Err(invalid(
            "strategy",
            "std_multiplier",
            "std_multiplier must be positive",
        ));
    }
    Ok(())
}

fn validate_macd(config: &dyn ConfigPort) -> Result<(), FundsimError> {
    let fast = config.get_int("strategy", "fast", 12);
    let slow = config.get_int("strategy", "slow", 26);
    let signal = config.get_int("strategy", "signal", 9);
    if fast < 1 || slow < 1 || signal < 1 {
        return Err(invalid(
            "strategy",
            "fast",
            "MACD periods must be positive",
        ));
    }
    if fast >= slow {
        return Err(invalid(
            "strategy",
            "fast",
            "fast must be smaller than slow",
        ));
    }
    Ok(())
}
