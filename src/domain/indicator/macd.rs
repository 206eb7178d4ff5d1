//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Warmup: (slow - 1) + (signal - 1) trading days.

use crate::domain::indicator::{
    calculate_ema, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::series::TradingDay;

pub fn calculate_macd(
    days: &[TradingDay],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    if days.is_empty() || fast == 0 || slow == 0 || signal_period == 0 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Macd {
                fast,
                slow,
                signal: signal_period,
            },
            values: Vec::new(),
        };
    }

    let ema_fast = ema_raw_values(days, fast);
    let ema_slow = ema_raw_values(days, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();

    // Signal line: EMA of the MACD line, seeded with an SMA once the MACD
    // line itself is past its warmup.
    let k = 2.0 / (signal_period as f64 + 1.0);
    let mut signal_line: Vec<f64> = vec![0.0; days.len()];
    let macd_warmup = slow - 1;

    if macd_warmup + signal_period <= days.len() {
        let seed: f64 = macd_line[macd_warmup..macd_warmup + signal_period]
            .iter()
            .sum::<f64>()
            / signal_period as f64;

        let mut signal_ema = seed;
        signal_line[macd_warmup + signal_period - 1] = signal_ema;

        for i in (macd_warmup + signal_period)..days.len() {
            signal_ema = macd_line[i] * k + signal_ema * (1.0 - k);
            signal_line[i] = signal_ema;
        }
    }

    let warmup = macd_warmup + signal_period - 1;

    let values = days
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let line = macd_line[i];
            let signal = signal_line[i];
            IndicatorPoint {
                date: day.date,
                valid: i >= warmup,
                value: IndicatorValue::Macd {
                    line,
                    signal,
                    histogram: line - signal,
                },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Macd {
            fast,
            slow,
            signal: signal_period,
        },
        values,
    }
}

/// Raw EMA values with 0.0 for warmup days.
fn ema_raw_values(days: &[TradingDay], period: usize) -> Vec<f64> {
    calculate_ema(days, period)
        .values
        .iter()
        .map(|p| p.value.simple())
        .collect()
}
