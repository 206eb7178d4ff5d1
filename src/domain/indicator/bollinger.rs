//! Bollinger Bands indicator.
//!
//! - Middle: SMA over n trading days
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//! Warmup: first (n-1) trading days are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::series::TradingDay;

pub fn calculate_bollinger(days: &[TradingDay], period: usize, multiplier: f64) -> IndicatorSeries {
    if period == 0 || days.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Bollinger { period, multiplier },
            values: Vec::new(),
        };
    }

    let mut values = Vec::with_capacity(days.len());
    let warmup = period - 1;

    for i in 0..days.len() {
        let date = days[i].date;
        let valid = i >= warmup;

        let (upper, middle, lower) = if valid {
            let window = &days[i + 1 - period..=i];

            let middle: f64 = window.iter().map(|d| d.close).sum::<f64>() / period as f64;
            let variance: f64 = window
                .iter()
                .map(|d| {
                    let diff = d.close - middle;
                    diff * diff
                })
                .sum::<f64>()
                / period as f64;
            let stddev = variance.sqrt();

            (middle + multiplier * stddev, middle, middle - multiplier * stddev)
        } else {
            (0.0, 0.0, 0.0)
        };

        values.push(IndicatorPoint {
            date,
            valid,
            value: IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            },
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger { period, multiplier },
        values,
    }
}
