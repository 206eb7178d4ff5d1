//! Parallel execution of independent simulation runs.
//!
//! One run is strictly sequential by date, but separate runs share no
//! mutable state, so a batch of strategies or parameter sets over the same
//! series fans out across threads.

use rayon::prelude::*;

use crate::domain::error::FundsimError;
use crate::domain::series::AlignedSeries;
use crate::domain::simulation::{run_simulation, SimulationRequest, SimulationResult};

/// Run every labelled request against the series, in parallel.
///
/// Results come back in request order; a failed run carries its own error
/// without aborting the rest of the batch.
pub fn run_batch(
    series: &AlignedSeries,
    requests: &[(String, SimulationRequest)],
) -> Vec<(String, Result<SimulationResult, FundsimError>)> {
    requests
        .par_iter()
        .map(|(label, request)| (label.clone(), run_simulation(series, request)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::AllocationPolicy;
    use crate::domain::series::Observation;
    use crate::domain::strategy::{DcaSchedule, StrategyConfig};
    use chrono::NaiveDate;

    fn sample_series() -> AlignedSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let observations: Vec<Observation> = (0..90)
            .map(|i| Observation {
                date: start.checked_add_days(chrono::Days::new(i)).unwrap(),
                value: 1.0 + 0.1 * ((i as f64) * 0.4).sin(),
            })
            .collect();
        let end = start.checked_add_days(chrono::Days::new(89)).unwrap();
        AlignedSeries::align(&observations, start, end).unwrap()
    }

    fn threshold_request(buy_pct: f64) -> SimulationRequest {
        SimulationRequest::new(
            StrategyConfig::Threshold {
                buy_pct,
                sell_pct: 8.0,
                lookback_days: 10,
            },
            AllocationPolicy::ExternalTopUp {
                trade_amount: 1000.0,
            },
        )
    }

    #[test]
    fn batch_preserves_request_order() {
        let series = sample_series();
        let requests = vec![
            ("aggressive".to_string(), threshold_request(-3.0)),
            ("conservative".to_string(), threshold_request(-8.0)),
        ];

        let results = run_batch(&series, &requests);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "aggressive");
        assert_eq!(results[1].0, "conservative");
    }

    #[test]
    fn batch_matches_individual_runs() {
        let series = sample_series();
        let requests = vec![
            ("threshold".to_string(), threshold_request(-5.0)),
            (
                "dca".to_string(),
                SimulationRequest::new(
                    StrategyConfig::Dca {
                        amount: 500.0,
                        schedule: DcaSchedule::Monthly { day: 1 },
                    },
                    AllocationPolicy::ExternalTopUp { trade_amount: 500.0 },
                ),
            ),
        ];

        let batch = run_batch(&series, &requests);
        for (label, result) in &batch {
            let request = &requests.iter().find(|(l, _)| l == label).unwrap().1;
            let solo = run_simulation(&series, request).unwrap();
            let batched = result.as_ref().unwrap();
            assert_eq!(batched.transactions, solo.transactions);
            assert_eq!(batched.report, solo.report);
        }
    }

    #[test]
    fn one_bad_request_does_not_poison_the_batch() {
        let series = sample_series();
        let requests = vec![
            (
                "bad".to_string(),
                SimulationRequest::new(
                    StrategyConfig::Threshold {
                        buy_pct: 1.0,
                        sell_pct: 8.0,
                        lookback_days: 10,
                    },
                    AllocationPolicy::FullAllocation,
                ),
            ),
            ("good".to_string(), threshold_request(-5.0)),
        ];

        let results = run_batch(&series, &requests);
        assert!(results[0].1.is_err());
        assert!(results[1].1.is_ok());
    }
}
