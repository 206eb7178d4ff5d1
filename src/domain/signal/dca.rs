//! Periodic investment (dollar-cost-averaging) signals.
//!
//! Investment dates are always genuine trading days: the first trading day
//! on/after the scheduled day. A month whose scheduled day has no trading day
//! left inside it is skipped; weeks are Monday-anchored.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::domain::series::{AlignedSeries, TradingDay};
use crate::domain::signal::{Signal, SignalPoint};
use crate::domain::strategy::DcaSchedule;

pub fn dca_signals(series: &AlignedSeries, amount: f64, schedule: DcaSchedule) -> Vec<SignalPoint> {
    let days = series.trading_days();
    let offsets = match schedule {
        DcaSchedule::Monthly { day } => monthly_offsets(&days, day),
        DcaSchedule::Weekly { weekday } => weekly_offsets(&days, weekday),
        DcaSchedule::EveryDays { interval } => every_days_offsets(&days, interval),
    };

    let mut signals: Vec<SignalPoint> = series
        .points()
        .iter()
        .map(|p| SignalPoint::hold(p.date))
        .collect();
    for offset in offsets {
        signals[offset].signal = Signal::Invest(amount);
    }
    signals
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

fn monthly_offsets(days: &[TradingDay], day: u32) -> Vec<usize> {
    let Some(first) = days.first() else {
        return Vec::new();
    };
    let Some(last) = days.last() else {
        return Vec::new();
    };

    let mut offsets = Vec::new();
    let mut year = first.date.year();
    let mut month = first.date.month();

    while (year, month) <= (last.date.year(), last.date.month()) {
        let clamped = day.min(days_in_month(year, month));
        if let Some(target) = NaiveDate::from_ymd_opt(year, month, clamped) {
            // First trading day on/after the target, if it stays in the month.
            if let Some(td) = days.iter().find(|td| td.date >= target) {
                if td.date.year() == year && td.date.month() == month {
                    offsets.push(td.offset);
                }
            }
        }

        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    offsets
}

fn weekly_offsets(days: &[TradingDay], weekday: Weekday) -> Vec<usize> {
    let target = weekday.num_days_from_monday();
    let mut offsets = Vec::new();
    let mut current_week: Option<NaiveDate> = None;
    let mut invested = false;

    for td in days {
        let week_start = td
            .date
            .checked_sub_days(Days::new(td.date.weekday().num_days_from_monday() as u64))
            .unwrap_or(td.date);

        if current_week != Some(week_start) {
            current_week = Some(week_start);
            invested = false;
        }

        if !invested && td.date.weekday().num_days_from_monday() >= target {
            offsets.push(td.offset);
            invested = true;
        }
    }

    offsets
}

fn every_days_offsets(days: &[TradingDay], interval: usize) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut since_last = interval;

    for td in days {
        if since_last >= interval {
            offsets.push(td.offset);
            since_last = 0;
        }
        since_last += 1;
    }

    offsets
}
