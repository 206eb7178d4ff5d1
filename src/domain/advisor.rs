//! Single-date advisory classification against a live estimated price.
//!
//! This is the threshold rule of the signal generator applied to one date:
//! the reference sits exactly `lookback_days` recorded trading days before
//! today, found by walking backward through the observation history, and the
//! comparator order matches the backtest (sell checked before buy) so live
//! advice agrees with what a backtest would have produced on the same date
//! with the same inputs.

use chrono::NaiveDate;

use crate::domain::error::FundsimError;
use crate::domain::series::Observation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceAction {
    Buy,
    Sell,
    Hold,
}

impl AdviceAction {
    pub fn label(&self) -> &'static str {
        match self {
            AdviceAction::Buy => "buy",
            AdviceAction::Sell => "sell",
            AdviceAction::Hold => "hold",
        }
    }
}

/// A classification plus the exact inputs that produced it, so callers can
/// render a "why" explanation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advice {
    pub action: AdviceAction,
    pub estimated_value: f64,
    pub estimated_return_pct: f64,
    pub reference_value: f64,
    pub reference_date: NaiveDate,
    pub lookback_days: usize,
    pub buy_pct: f64,
    pub sell_pct: f64,
}

/// Classify today's estimated price under the threshold rule.
///
/// `history` is the raw observation feed; only observations strictly before
/// `today` are considered, since today's closing value is not yet published
/// when an intraday estimate exists.
pub fn advise(
    history: &[Observation],
    today: NaiveDate,
    estimated_value: f64,
    buy_pct: f64,
    sell_pct: f64,
    lookback_days: usize,
) -> Result<Advice, FundsimError> {
    if lookback_days == 0 {
        return Err(FundsimError::invalid_parameter(
            "lookback_days",
            "must be at least 1",
        ));
    }
    if !estimated_value.is_finite() || estimated_value <= 0.0 {
        return Err(FundsimError::invalid_parameter(
            "estimated_value",
            "must be positive",
        ));
    }
    if history.is_empty() {
        return Err(FundsimError::EmptyInput);
    }

    // Trading days before today; a duplicated date keeps the later feed
    // entry, matching the aligner.
    let mut past: std::collections::BTreeMap<NaiveDate, f64> = std::collections::BTreeMap::new();
    for obs in history {
        if obs.date < today {
            past.insert(obs.date, obs.value);
        }
    }

    if past.len() < lookback_days {
        return Err(FundsimError::InsufficientHistory {
            have: past.len(),
            need: lookback_days,
        });
    }

    let Some((&reference_date, &reference_value)) = past.iter().rev().nth(lookback_days - 1)
    else {
        return Err(FundsimError::InsufficientHistory {
            have: past.len(),
            need: lookback_days,
        });
    };
    let estimated_return_pct = (estimated_value / reference_value - 1.0) * 100.0;

    // Same order as the backtest classifier: sell first.
    let action = if estimated_return_pct >= sell_pct {
        AdviceAction::Sell
    } else if estimated_return_pct <= buy_pct {
        AdviceAction::Buy
    } else {
        AdviceAction::Hold
    };

    Ok(Advice {
        action,
        estimated_value,
        estimated_return_pct,
        reference_value,
        reference_date,
        lookback_days,
        buy_pct,
        sell_pct,
    })
}
