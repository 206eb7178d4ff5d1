//! Price observation feed port trait.
//!
//! The feed supplies raw (date, value) observations for one fund. No ordering
//! or density is required of the implementation; the calendar aligner
//! normalizes whatever arrives.

use crate::domain::error::FundsimError;
use crate::domain::series::Observation;
use chrono::NaiveDate;

pub trait QuotePort {
    fn fetch_history(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Observation>, FundsimError>;

    fn data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, FundsimError>;
}
