//! One-shot simulation orchestration: signals → execution → metrics.

use crate::domain::error::FundsimError;
use crate::domain::execution::{
    execute, AllocationPolicy, DailyValuation, ExecutionConfig, SimulationState, Transaction,
};
use crate::domain::metrics::{PerformanceReport, DEFAULT_RISK_FREE_RATE};
use crate::domain::series::AlignedSeries;
use crate::domain::signal::generate_signals;
use crate::domain::strategy::StrategyConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub strategy: StrategyConfig,
    pub policy: AllocationPolicy,
    pub initial_capital: f64,
    pub commission_rate: f64,
    pub risk_free_rate: f64,
}

impl SimulationRequest {
    pub fn new(strategy: StrategyConfig, policy: AllocationPolicy) -> Self {
        SimulationRequest {
            strategy,
            policy,
            initial_capital: 0.0,
            commission_rate: 0.0,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub strategy: StrategyConfig,
    pub valuations: Vec<DailyValuation>,
    pub transactions: Vec<Transaction>,
    pub final_state: SimulationState,
    pub report: PerformanceReport,
}

/// Run one strategy over an aligned series.
///
/// DCA runs force-liquidate on the last date so their final value is
/// comparable with strategies that report value inclusive of holdings.
pub fn run_simulation(
    series: &AlignedSeries,
    request: &SimulationRequest,
) -> Result<SimulationResult, FundsimError> {
    let signals = generate_signals(series, &request.strategy)?;

    let exec_config = ExecutionConfig {
        initial_capital: request.initial_capital,
        commission_rate: request.commission_rate,
        liquidate_at_end: request.strategy.is_dca(),
    };
    let outcome = execute(series, &signals, request.policy, &exec_config)?;

    let report = PerformanceReport::compute(
        &outcome.valuations,
        outcome.total_invested,
        series,
        request.risk_free_rate,
    );

    Ok(SimulationResult {
        strategy: request.strategy.clone(),
        valuations: outcome.valuations,
        transactions: outcome.transactions,
        final_state: outcome.final_state,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::TradeSide;
    use crate::domain::series::Observation;
    use crate::domain::strategy::DcaSchedule;
    use chrono::NaiveDate;

    fn daily_series(values: &[f64]) -> AlignedSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let observations: Vec<Observation> = values
            .iter()
            .enumerate()
            .map(|(i, &value)| Observation {
                date: start.checked_add_days(chrono::Days::new(i as u64)).unwrap(),
                value,
            })
            .collect();
        let end = start
            .checked_add_days(chrono::Days::new(values.len() as u64 - 1))
            .unwrap();
        AlignedSeries::align(&observations, start, end).unwrap()
    }

    #[test]
    fn threshold_run_buys_on_drop() {
        // 10% drop over the 2-day lookback on day 2.
        let series = daily_series(&[1.0, 1.0, 0.9, 0.9, 0.9]);
        let request = SimulationRequest::new(
            StrategyConfig::Threshold {
                buy_pct: -5.0,
                sell_pct: 10.0,
                lookback_days: 2,
            },
            AllocationPolicy::ExternalTopUp {
                trade_amount: 100.0,
            },
        );
        let result = run_simulation(&series, &request).unwrap();

        assert!(!result.transactions.is_empty());
        assert_eq!(result.transactions[0].side, TradeSide::Buy);
        assert!(result.report.total_invested > 0.0);
    }

    #[test]
    fn dca_run_liquidates_at_end() {
        let series = daily_series(&[1.0, 1.0, 1.0, 1.0, 2.0]);
        let request = SimulationRequest::new(
            StrategyConfig::Dca {
                amount: 100.0,
                schedule: DcaSchedule::EveryDays { interval: 2 },
            },
            AllocationPolicy::ExternalTopUp {
                trade_amount: 100.0,
            },
        );
        let result = run_simulation(&series, &request).unwrap();

        let last = result.transactions.last().unwrap();
        assert_eq!(last.side, TradeSide::Sell);
        assert_eq!(result.final_state.shares, 0.0);
        assert_eq!(result.report.final_value, result.final_state.cash);
    }

    #[test]
    fn non_dca_run_keeps_final_holdings() {
        let series = daily_series(&[1.0, 1.0, 0.9, 0.9, 0.9]);
        let request = SimulationRequest {
            strategy: StrategyConfig::Threshold {
                buy_pct: -5.0,
                sell_pct: 10.0,
                lookback_days: 2,
            },
            policy: AllocationPolicy::FullAllocation,
            initial_capital: 1000.0,
            commission_rate: 0.0,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        };
        let result = run_simulation(&series, &request).unwrap();

        assert!(result.final_state.shares > 0.0);
        let last = result.valuations.last().unwrap();
        assert!(last.holdings_value > 0.0);
    }

    #[test]
    fn invalid_strategy_is_rejected_before_running() {
        let series = daily_series(&[1.0, 1.0]);
        let request = SimulationRequest::new(
            StrategyConfig::MaCrossover {
                short_window: 50,
                long_window: 10,
            },
            AllocationPolicy::FullAllocation,
        );
        assert!(matches!(
            run_simulation(&series, &request),
            Err(FundsimError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn identical_runs_are_identical() {
        let values: Vec<f64> = (0..60)
            .map(|i| 1.0 + 0.1 * ((i as f64) * 0.7).sin())
            .collect();
        let series = daily_series(&values);
        let request = SimulationRequest::new(
            StrategyConfig::Threshold {
                buy_pct: -3.0,
                sell_pct: 5.0,
                lookback_days: 5,
            },
            AllocationPolicy::ExternalTopUp {
                trade_amount: 500.0,
            },
        );

        let first = run_simulation(&series, &request).unwrap();
        let second = run_simulation(&series, &request).unwrap();

        assert_eq!(first.transactions, second.transactions);
        assert_eq!(first.valuations, second.valuations);
        assert_eq!(first.report, second.report);
    }
}
