//! Trading-day calendar port trait.

use chrono::{Datelike, NaiveDate, Weekday};

/// Authoritative source of exchange trading days.
pub trait CalendarPort {
    fn is_trading_day(&self, date: NaiveDate) -> bool;
}

/// Fallback heuristic when no authoritative calendar is available:
/// Monday through Friday are trading days.
pub struct WeekdayCalendar;

impl CalendarPort for WeekdayCalendar {
    fn is_trading_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}
