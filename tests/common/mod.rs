#![allow(dead_code)]

use chrono::{Datelike, NaiveDate, Weekday};
use fundsim::domain::error::FundsimError;
use fundsim::domain::series::{AlignedSeries, Observation};
use fundsim::ports::quote_port::QuotePort;
use std::collections::HashMap;

pub struct MockQuotePort {
    pub data: HashMap<String, Vec<Observation>>,
    pub errors: HashMap<String, String>,
}

impl MockQuotePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_observations(mut self, code: &str, observations: Vec<Observation>) -> Self {
        self.data.insert(code.to_string(), observations);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl QuotePort for MockQuotePort {
    fn fetch_history(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Observation>, FundsimError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(FundsimError::Quote {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(code)
            .map(|observations| {
                observations
                    .iter()
                    .filter(|o| o.date >= start_date && o.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, FundsimError> {
        let observations = match self.data.get(code) {
            Some(o) => o,
            None => return Ok(None),
        };
        let min = observations.iter().map(|o| o.date).min();
        let max = observations.iter().map(|o| o.date).max();
        match (min, max) {
            (Some(min), Some(max)) => Ok(Some((min, max, observations.len()))),
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn obs(date: NaiveDate, value: f64) -> Observation {
    Observation { date, value }
}

/// One observation per consecutive calendar day starting at `start`.
pub fn daily_observations(start: NaiveDate, values: &[f64]) -> Vec<Observation> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| Observation {
            date: start.checked_add_days(chrono::Days::new(i as u64)).unwrap(),
            value,
        })
        .collect()
}

/// Align consecutive daily observations over their own full range.
pub fn daily_series(start: NaiveDate, values: &[f64]) -> AlignedSeries {
    let end = start
        .checked_add_days(chrono::Days::new(values.len() as u64 - 1))
        .unwrap();
    AlignedSeries::align(&daily_observations(start, values), start, end).unwrap()
}

/// Weekday-only observations over `[start, end]`, one value per trading day.
pub fn weekday_observations(start: NaiveDate, end: NaiveDate, mut value: impl FnMut(usize) -> f64) -> Vec<Observation> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .enumerate()
        .map(|(i, date)| Observation {
            date,
            value: value(i),
        })
        .collect()
}
