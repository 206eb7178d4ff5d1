//! Performance metrics derived from the daily valuation series.
//!
//! Every metric degrades to 0 on empty or too-short input. A strategy that
//! never trades is a valid outcome, not an error; a run with zero external
//! capital reports 0% return rather than dividing by zero.

use crate::domain::execution::DailyValuation;
use crate::domain::series::AlignedSeries;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Default annual risk-free rate for the Sharpe ratio.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceReport {
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
    pub annualized_volatility_pct: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
    pub final_value: f64,
    pub total_invested: f64,
    /// Buy-and-hold return of the fund itself over the same window.
    pub benchmark_return_pct: f64,
}

impl PerformanceReport {
    pub fn compute(
        valuations: &[DailyValuation],
        total_invested: f64,
        series: &AlignedSeries,
        risk_free_rate: f64,
    ) -> Self {
        let final_value = valuations.last().map(|v| v.total_value).unwrap_or(0.0);

        let total_return_pct = if total_invested > 0.0 {
            (final_value / total_invested - 1.0) * 100.0
        } else {
            0.0
        };

        let returns = daily_returns(valuations);

        let annualized_return_pct = if returns.is_empty() {
            0.0
        } else {
            let total_return = total_return_pct / 100.0;
            let annualized =
                (1.0 + total_return).powf(TRADING_DAYS_PER_YEAR / returns.len() as f64) - 1.0;
            if annualized.is_finite() {
                annualized * 100.0
            } else {
                0.0
            }
        };

        let annualized_volatility_pct = volatility(&returns) * TRADING_DAYS_PER_YEAR.sqrt() * 100.0;

        let sharpe_ratio = if annualized_volatility_pct > 0.0 {
            (annualized_return_pct / 100.0 - risk_free_rate) / (annualized_volatility_pct / 100.0)
        } else {
            0.0
        };

        let max_drawdown_pct = max_drawdown(valuations);

        let benchmark_return_pct = benchmark_return(series);

        PerformanceReport {
            total_return_pct,
            annualized_return_pct,
            annualized_volatility_pct,
            sharpe_ratio,
            max_drawdown_pct,
            final_value,
            total_invested,
            benchmark_return_pct,
        }
    }
}

/// Day-over-day percentage changes, skipping days where the prior value is
/// not yet positive (a threshold run starts at zero until the first buy).
fn daily_returns(valuations: &[DailyValuation]) -> Vec<f64> {
    valuations
        .windows(2)
        .filter(|w| w[0].total_value > 0.0)
        .map(|w| (w[1].total_value - w[0].total_value) / w[0].total_value)
        .collect()
}

/// Population standard deviation of daily returns.
fn volatility(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Largest peak-to-trough decline, as a negative percentage. Dates before
/// the first positive peak are ignored; 0 for an empty series.
fn max_drawdown(valuations: &[DailyValuation]) -> f64 {
    let mut peak = 0.0_f64;
    let mut max_dd = 0.0_f64;

    for valuation in valuations {
        if valuation.total_value > peak {
            peak = valuation.total_value;
        } else if peak > 0.0 {
            let dd = (valuation.total_value - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd * 100.0
}

fn benchmark_return(series: &AlignedSeries) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let first = series.points()[0].closing_value;
    let last = series.points()[series.len() - 1].closing_value;
    if first > 0.0 {
        (last / first - 1.0) * 100.0
    } else {
        0.0
    }
}
