//! Lookback-return threshold signals.
//!
//! The reference value sits exactly `lookback_days` trading days before the
//! current date, found by walking the trading-day sequence, never by calendar
//! subtraction. The sell comparison runs before the buy comparison; on the
//! degenerate simultaneous trigger, sell wins.

use crate::domain::series::AlignedSeries;
use crate::domain::signal::{Signal, SignalPoint, TriggerNote};

pub fn threshold_signals(
    series: &AlignedSeries,
    buy_pct: f64,
    sell_pct: f64,
    lookback_days: usize,
) -> Vec<SignalPoint> {
    series
        .points()
        .iter()
        .enumerate()
        .map(|(offset, point)| {
            if !point.is_trading_day {
                return SignalPoint::hold(point.date);
            }

            let Some(reference_offset) = series.lookback_offset(offset, lookback_days) else {
                return SignalPoint::hold(point.date);
            };

            let reference = &series.points()[reference_offset];
            let lookback_return_pct =
                (point.closing_value / reference.closing_value - 1.0) * 100.0;

            if lookback_return_pct >= sell_pct {
                SignalPoint {
                    date: point.date,
                    signal: Signal::SellAll,
                    note: Some(TriggerNote {
                        lookback_return_pct,
                        reference_value: reference.closing_value,
                        reference_date: reference.date,
                        threshold_pct: sell_pct,
                    }),
                }
            } else if lookback_return_pct <= buy_pct {
                SignalPoint {
                    date: point.date,
                    signal: Signal::Buy,
                    note: Some(TriggerNote {
                        lookback_return_pct,
                        reference_value: reference.closing_value,
                        reference_date: reference.date,
                        threshold_pct: buy_pct,
                    }),
                }
            } else {
                SignalPoint::hold(point.date)
            }
        })
        .collect()
}
