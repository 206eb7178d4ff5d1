//! Indicator-driven target-position signals.
//!
//! Each variant derives a binary in/out stance per trading day. The realized
//! position is carried sequentially so a crossing rule fires once on the day
//! of the change, not on every day the condition stays true. Signals land
//! only on the date of a 0→1 or 1→0 transition.

use crate::domain::indicator::{
    calculate_bollinger, calculate_macd, calculate_rsi, calculate_sma, IndicatorValue,
};
use crate::domain::series::{AlignedSeries, TradingDay};
use crate::domain::signal::{Signal, SignalPoint};

pub fn crossover_signals(
    series: &AlignedSeries,
    short_window: usize,
    long_window: usize,
) -> Vec<SignalPoint> {
    let days = series.trading_days();
    let short = calculate_sma(&days, short_window);
    let long = calculate_sma(&days, long_window);

    let mut in_market = false;
    let positions: Vec<bool> = (0..days.len())
        .map(|i| {
            let s = &short.values[i];
            let l = &long.values[i];
            if s.valid && l.valid {
                in_market = s.value.simple() > l.value.simple();
            }
            in_market
        })
        .collect();

    signals_from_positions(series, &days, &positions)
}

pub fn rsi_signals(
    series: &AlignedSeries,
    period: usize,
    oversold: f64,
    overbought: f64,
) -> Vec<SignalPoint> {
    let days = series.trading_days();
    let rsi = calculate_rsi(&days, period);

    let mut in_market = false;
    let positions: Vec<bool> = (0..days.len())
        .map(|i| {
            if i > 0 && rsi.values[i].valid && rsi.values[i - 1].valid {
                let current = rsi.values[i].value.simple();
                let previous = rsi.values[i - 1].value.simple();
                if current > oversold && previous <= oversold {
                    in_market = true;
                } else if current < overbought && previous >= overbought {
                    in_market = false;
                }
            }
            in_market
        })
        .collect();

    signals_from_positions(series, &days, &positions)
}

pub fn bollinger_signals(
    series: &AlignedSeries,
    window: usize,
    std_multiplier: f64,
) -> Vec<SignalPoint> {
    let days = series.trading_days();
    let bands = calculate_bollinger(&days, window, std_multiplier);

    let mut in_market = false;
    let positions: Vec<bool> = (0..days.len())
        .map(|i| {
            if i > 0 && bands.values[i].valid && bands.values[i - 1].valid {
                if let (
                    IndicatorValue::Bollinger { upper, lower, .. },
                    IndicatorValue::Bollinger {
                        upper: prev_upper,
                        lower: prev_lower,
                        ..
                    },
                ) = (bands.values[i].value, bands.values[i - 1].value)
                {
                    let close = days[i].close;
                    let prev_close = days[i - 1].close;
                    if close > lower && prev_close <= prev_lower {
                        in_market = true;
                    } else if close < upper && prev_close >= prev_upper {
                        in_market = false;
                    }
                }
            }
            in_market
        })
        .collect();

    signals_from_positions(series, &days, &positions)
}

pub fn macd_signals(
    series: &AlignedSeries,
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Vec<SignalPoint> {
    let days = series.trading_days();
    let macd = calculate_macd(&days, fast, slow, signal_period);

    let mut in_market = false;
    let positions: Vec<bool> = (0..days.len())
        .map(|i| {
            if i > 0 && macd.values[i].valid && macd.values[i - 1].valid {
                if let (
                    IndicatorValue::Macd { line, signal, .. },
                    IndicatorValue::Macd {
                        line: prev_line,
                        signal: prev_signal,
                        ..
                    },
                ) = (macd.values[i].value, macd.values[i - 1].value)
                {
                    if line > signal && prev_line <= prev_signal {
                        in_market = true;
                    } else if line < signal && prev_line >= prev_signal {
                        in_market = false;
                    }
                }
            }
            in_market
        })
        .collect();

    signals_from_positions(series, &days, &positions)
}

/// Expand realized per-trading-day positions into per-date signals: an entry
/// on each 0→1 transition, an exit on each 1→0, hold everywhere else.
fn signals_from_positions(
    series: &AlignedSeries,
    days: &[TradingDay],
    positions: &[bool],
) -> Vec<SignalPoint> {
    let mut signals: Vec<SignalPoint> = series
        .points()
        .iter()
        .map(|p| SignalPoint::hold(p.date))
        .collect();

    let mut previous = false;
    for (day, &position) in days.iter().zip(positions) {
        if position && !previous {
            signals[day.offset].signal = Signal::EnterLong;
        } else if !position && previous {
            signals[day.offset].signal = Signal::ExitLong;
        }
        previous = position;
    }

    signals
}
