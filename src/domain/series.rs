//! Price observations and the calendar-aligned valuation series.
//!
//! Raw feeds arrive unsorted, duplicated, and sparse. [`AlignedSeries::align`]
//! reindexes them onto a contiguous daily grid: forward-fill from the most
//! recent earlier observation, back-fill the leading gap from the first known
//! value, and mark which dates carry a genuine observation. Lookbacks count
//! trading days, never calendar days, so every point also carries the most
//! recent date on which a real observation existed.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::domain::error::FundsimError;
use crate::ports::calendar_port::CalendarPort;

/// One raw quote from the feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// One date on the aligned daily grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub closing_value: f64,
    pub is_trading_day: bool,
    /// Most recent date with a real observation, `None` inside a leading gap.
    pub last_trading_date: Option<NaiveDate>,
}

/// A trading day projected out of an aligned series, with its offset back
/// into the daily grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradingDay {
    pub offset: usize,
    pub date: NaiveDate,
    pub close: f64,
}

/// Contiguous daily valuation series over a closed date range.
///
/// Immutable once built; owned by a single simulation run.
#[derive(Debug, Clone)]
pub struct AlignedSeries {
    points: Vec<PricePoint>,
    date_index: HashMap<NaiveDate, usize>,
    trading_offsets: Vec<usize>,
}

impl AlignedSeries {
    /// Align raw observations onto every calendar date in `[start, end]`.
    ///
    /// A date is a trading day iff it had a genuine observation.
    pub fn align(
        observations: &[Observation],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, FundsimError> {
        Self::build(observations, start, end, None)
    }

    /// Align raw observations, taking trading-day status from an
    /// authoritative calendar instead of observation presence.
    pub fn align_with_calendar(
        observations: &[Observation],
        start: NaiveDate,
        end: NaiveDate,
        calendar: &dyn CalendarPort,
    ) -> Result<Self, FundsimError> {
        Self::build(observations, start, end, Some(calendar))
    }

    fn build(
        observations: &[Observation],
        start: NaiveDate,
        end: NaiveDate,
        calendar: Option<&dyn CalendarPort>,
    ) -> Result<Self, FundsimError> {
        if observations.is_empty() {
            return Err(FundsimError::EmptyInput);
        }
        if start > end {
            return Err(FundsimError::invalid_parameter(
                "start_date",
                format!("{start} is after end date {end}"),
            ));
        }

        // Sort and deduplicate; the later feed entry wins for a repeated date.
        let mut observed: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for obs in observations {
            if !obs.value.is_finite() || obs.value <= 0.0 {
                return Err(FundsimError::invalid_parameter(
                    "observation",
                    format!("non-positive value {} on {}", obs.value, obs.date),
                ));
            }
            if obs.date >= start && obs.date <= end {
                observed.insert(obs.date, obs.value);
            }
        }

        let Some(&first_value) = observed.values().next() else {
            return Err(FundsimError::NoDataInRange { start, end });
        };

        let mut points = Vec::new();
        let mut carried: Option<f64> = None;
        let mut last_trading: Option<NaiveDate> = None;

        for date in start.iter_days().take_while(|d| *d <= end) {
            let observed_value = observed.get(&date).copied();

            if let Some(value) = observed_value {
                carried = Some(value);
                last_trading = Some(date);
            }

            let closing_value = carried.unwrap_or(first_value);
            let is_trading_day = match calendar {
                Some(cal) => cal.is_trading_day(date),
                None => observed_value.is_some(),
            };

            points.push(PricePoint {
                date,
                closing_value,
                is_trading_day,
                last_trading_date: last_trading,
            });
        }

        let date_index = points
            .iter()
            .enumerate()
            .map(|(i, p)| (p.date, i))
            .collect();
        let trading_offsets = points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_trading_day)
            .map(|(i, _)| i)
            .collect();

        Ok(AlignedSeries {
            points,
            date_index,
            trading_offsets,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn get(&self, offset: usize) -> Option<&PricePoint> {
        self.points.get(offset)
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.date_index.get(&date).copied()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }

    pub fn trading_day_count(&self) -> usize {
        self.trading_offsets.len()
    }

    /// Trading days in date order, each carrying its offset into the grid.
    pub fn trading_days(&self) -> Vec<TradingDay> {
        self.trading_offsets
            .iter()
            .map(|&offset| {
                let p = &self.points[offset];
                TradingDay {
                    offset,
                    date: p.date,
                    close: p.closing_value,
                }
            })
            .collect()
    }

    /// Offset of the trading day exactly `n` trading days before `offset`.
    ///
    /// The anchor is the last trading day at or before `offset`; the walk
    /// counts trading days only. `None` when history is insufficient.
    pub fn lookback_offset(&self, offset: usize, n: usize) -> Option<usize> {
        let anchor = self.trading_offsets.partition_point(|&t| t <= offset);
        if anchor == 0 {
            return None;
        }
        let pos = anchor - 1;
        if pos < n {
            return None;
        }
        Some(self.trading_offsets[pos - n])
    }
}
