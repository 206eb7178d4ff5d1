//! Simple Moving Average indicator.
//!
//! SMA[i] = mean(close[i-n+1 ..= i]).
//! Warmup: first (n-1) trading days are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::series::TradingDay;

pub fn calculate_sma(days: &[TradingDay], period: usize) -> IndicatorSeries {
    if period == 0 || days.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Sma(period),
            values: Vec::new(),
        };
    }

    let mut values = Vec::with_capacity(days.len());
    let mut window_sum = 0.0;

    for (i, day) in days.iter().enumerate() {
        window_sum += day.close;
        if i >= period {
            window_sum -= days[i - period].close;
        }

        let valid = i >= period - 1;
        let sma = if valid { window_sum / period as f64 } else { 0.0 };

        values.push(IndicatorPoint {
            date: day.date,
            valid,
            value: IndicatorValue::Simple(sma),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
