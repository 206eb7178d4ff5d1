//! Trade execution: the per-date fold from signals to portfolio state.
//!
//! Execution is a strict left-to-right fold over the aligned dates; each
//! day's outcome depends on the previous day's cash and shares, so no step
//! may be reordered. Trades settle at the day's closing valuation with an
//! optional flat commission rate on the traded cash amount.

use chrono::NaiveDate;
use std::fmt;

use crate::domain::error::FundsimError;
use crate::domain::series::AlignedSeries;
use crate::domain::signal::{Signal, SignalPoint, TriggerNote};

/// How buy signals are funded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AllocationPolicy {
    /// Buys commit 100% of available cash.
    FullAllocation,
    /// Buys invest a constant amount, capped to available cash.
    FixedAmount { amount: f64 },
    /// Buys invest a constant amount; any cash shortfall is drawn from an
    /// uncapped external source and counted as invested capital.
    ExternalTopUp { trade_amount: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionConfig {
    pub initial_capital: f64,
    /// Fraction of the traded cash amount, e.g. 0.001 for 0.1%.
    pub commission_rate: f64,
    /// Force-liquidate any remaining shares on the last date. Set for DCA
    /// runs so they compare fairly against hold-to-end strategies.
    pub liquidate_at_end: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            initial_capital: 0.0,
            commission_rate: 0.0,
            liquidate_at_end: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "buy"),
            TradeSide::Sell => write!(f, "sell"),
        }
    }
}

/// One executed trade. Append-only; created only when a signal yields a
/// feasible non-hold action.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub side: TradeSide,
    pub price: f64,
    pub shares: f64,
    /// Cash moved: gross spend on buys, net proceeds on sells.
    pub amount: f64,
    pub reason: String,
    pub reference_value: Option<f64>,
    pub reference_date: Option<NaiveDate>,
}

/// Cash/shares snapshot for one aligned date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyValuation {
    pub date: NaiveDate,
    pub cash: f64,
    pub shares: f64,
    pub holdings_value: f64,
    pub total_value: f64,
}

/// Mutable portfolio state, updated exactly once per date in date order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub cash: f64,
    pub shares: f64,
    /// Capital drawn from outside the strategy; recycled sale proceeds are
    /// never counted here.
    pub external_capital: f64,
}

impl SimulationState {
    pub fn new(initial_cash: f64) -> Self {
        SimulationState {
            cash: initial_cash,
            shares: 0.0,
            external_capital: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub valuations: Vec<DailyValuation>,
    pub transactions: Vec<Transaction>,
    pub final_state: SimulationState,
    /// Initial capital plus every external top-up.
    pub total_invested: f64,
}

/// Apply a signal sequence to a fresh state, in strict date order.
pub fn execute(
    series: &AlignedSeries,
    signals: &[SignalPoint],
    policy: AllocationPolicy,
    config: &ExecutionConfig,
) -> Result<ExecutionOutcome, FundsimError> {
    if signals.len() != series.len() {
        return Err(FundsimError::invalid_parameter(
            "signals",
            format!(
                "signal count {} does not match series length {}",
                signals.len(),
                series.len()
            ),
        ));
    }
    if !config.initial_capital.is_finite() || config.initial_capital < 0.0 {
        return Err(FundsimError::invalid_parameter(
            "initial_capital",
            "must be non-negative",
        ));
    }
    if !(0.0..1.0).contains(&config.commission_rate) {
        return Err(FundsimError::invalid_parameter(
            "commission_rate",
            "must be in [0, 1)",
        ));
    }

    let mut state = SimulationState::new(config.initial_capital);
    let mut valuations = Vec::with_capacity(series.len());
    let mut transactions = Vec::new();

    for (offset, point) in series.points().iter().enumerate() {
        let signal = &signals[offset];
        let price = point.closing_value;

        match signal.signal {
            Signal::Hold => {}
            Signal::SellAll | Signal::ExitLong => {
                if state.shares > 0.0 {
                    let reason = match signal.signal {
                        Signal::SellAll => sell_reason(&signal.note),
                        _ => "exited long position".to_string(),
                    };
                    sell_all(&mut state, &mut transactions, point.date, price, reason, config, &signal.note);
                }
            }
            Signal::Buy | Signal::EnterLong | Signal::Invest(_) => {
                if let Some(funding) = funding_for(signal.signal, policy, state.cash) {
                    let reason = match signal.signal {
                        Signal::Buy => buy_reason(&signal.note),
                        Signal::Invest(_) => "scheduled investment".to_string(),
                        _ => "entered long position".to_string(),
                    };
                    buy(&mut state, &mut transactions, point.date, price, funding, reason, config, &signal.note);
                }
            }
        }

        if state.cash < 0.0 || state.shares < 0.0 {
            return Err(FundsimError::InvariantViolation {
                date: point.date,
                reason: format!(
                    "negative balance after trade: cash {}, shares {}",
                    state.cash, state.shares
                ),
            });
        }

        let holdings_value = state.shares * price;
        valuations.push(DailyValuation {
            date: point.date,
            cash: state.cash,
            shares: state.shares,
            holdings_value,
            total_value: holdings_value + state.cash,
        });
    }

    if config.liquidate_at_end && state.shares > 0.0 {
        let last = &series.points()[series.len() - 1];
        sell_all(
            &mut state,
            &mut transactions,
            last.date,
            last.closing_value,
            "final liquidation at end of period".to_string(),
            config,
            &None,
        );
        if let Some(valuation) = valuations.last_mut() {
            valuation.cash = state.cash;
            valuation.shares = 0.0;
            valuation.holdings_value = 0.0;
            valuation.total_value = state.cash;
        }
    }

    let total_invested = config.initial_capital + state.external_capital;

    Ok(ExecutionOutcome {
        valuations,
        transactions,
        final_state: state,
        total_invested,
    })
}

/// Gross cash amount and external draw for a buy-type signal, or `None` when
/// the signal cannot be funded and is downgraded to hold.
fn funding_for(signal: Signal, policy: AllocationPolicy, cash: f64) -> Option<Funding> {
    let (gross, external) = match signal {
        Signal::Invest(amount) => match policy {
            AllocationPolicy::ExternalTopUp { .. } => (amount, (amount - cash).max(0.0)),
            // Without an external source a scheduled investment requires the
            // full amount in cash.
            _ if cash >= amount => (amount, 0.0),
            _ => return None,
        },
        Signal::Buy | Signal::EnterLong => match policy {
            AllocationPolicy::FullAllocation => (cash, 0.0),
            AllocationPolicy::FixedAmount { amount } => (cash.min(amount), 0.0),
            AllocationPolicy::ExternalTopUp { trade_amount } => {
                (trade_amount, (trade_amount - cash).max(0.0))
            }
        },
        _ => return None,
    };

    if gross <= 0.0 {
        return None;
    }
    Some(Funding { gross, external })
}

struct Funding {
    gross: f64,
    external: f64,
}

#[allow(clippy::too_many_arguments)]
fn buy(
    state: &mut SimulationState,
    transactions: &mut Vec<Transaction>,
    date: NaiveDate,
    price: f64,
    funding: Funding,
    reason: String,
    config: &ExecutionConfig,
    note: &Option<TriggerNote>,
) {
    let commission = funding.gross * config.commission_rate;
    let shares_bought = (funding.gross - commission) / price;

    state.external_capital += funding.external;
    state.cash -= funding.gross - funding.external;
    state.shares += shares_bought;

    transactions.push(Transaction {
        date,
        side: TradeSide::Buy,
        price,
        shares: shares_bought,
        amount: funding.gross,
        reason,
        reference_value: note.map(|n| n.reference_value),
        reference_date: note.map(|n| n.reference_date),
    });
}

#[allow(clippy::too_many_arguments)]
fn sell_all(
    state: &mut SimulationState,
    transactions: &mut Vec<Transaction>,
    date: NaiveDate,
    price: f64,
    reason: String,
    config: &ExecutionConfig,
    note: &Option<TriggerNote>,
) {
    let shares_sold = state.shares;
    let value = shares_sold * price;
    let commission = value * config.commission_rate;
    let proceeds = value - commission;

    state.cash += proceeds;
    state.shares = 0.0;

    transactions.push(Transaction {
        date,
        side: TradeSide::Sell,
        price,
        shares: shares_sold,
        amount: proceeds,
        reason,
        reference_value: note.map(|n| n.reference_value),
        reference_date: note.map(|n| n.reference_date),
    });
}

fn buy_reason(note: &Option<TriggerNote>) -> String {
    match note {
        Some(n) => format!(
            "lookback return {:.2}% <= buy threshold {}%",
            n.lookback_return_pct, n.threshold_pct
        ),
        None => "buy signal".to_string(),
    }
}

fn sell_reason(note: &Option<TriggerNote>) -> String {
    match note {
        Some(n) => format!(
            "lookback return {:.2}% >= sell threshold {}%",
            n.lookback_return_pct, n.threshold_pct
        ),
        None => "sell signal".to_string(),
    }
}
