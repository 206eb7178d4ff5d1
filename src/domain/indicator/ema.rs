//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) trading days are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::series::TradingDay;

pub fn calculate_ema(days: &[TradingDay], period: usize) -> IndicatorSeries {
    if period == 0 || days.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Ema(period),
            values: Vec::new(),
        };
    }

    let mut values = Vec::with_capacity(days.len());
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, day) in days.iter().enumerate() {
        if i < period - 1 {
            sum += day.close;
            values.push(IndicatorPoint {
                date: day.date,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            });
        } else if i == period - 1 {
            sum += day.close;
            ema = sum / period as f64;
            values.push(IndicatorPoint {
                date: day.date,
                valid: true,
                value: IndicatorValue::Simple(ema),
            });
        } else {
            ema = day.close * k + ema * (1.0 - k);
            values.push(IndicatorPoint {
                date: day.date,
                valid: true,
                value: IndicatorValue::Simple(ema),
            });
        }
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}
