//! CSV file quote feed adapter.
//!
//! Reads `date,value` rows with a header line. Constructed either over a
//! directory of `<code>.csv` files or over a single file used for every code.

use crate::domain::error::FundsimError;
use crate::domain::series::Observation;
use crate::ports::quote_port::QuotePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvQuoteAdapter {
    base_path: PathBuf,
}

impl CsvQuoteAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        if self.base_path.is_dir() {
            self.base_path.join(format!("{}.csv", code))
        } else {
            self.base_path.clone()
        }
    }

    fn read_all(&self, code: &str) -> Result<Vec<Observation>, FundsimError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| FundsimError::Quote {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut observations = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| FundsimError::Quote {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| FundsimError::Quote {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                FundsimError::Quote {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            let value_str = record.get(1).ok_or_else(|| FundsimError::Quote {
                reason: "missing value column".into(),
            })?;
            let value: f64 = value_str.trim().parse().map_err(|e| FundsimError::Quote {
                reason: format!("invalid value '{}': {}", value_str, e),
            })?;

            observations.push(Observation { date, value });
        }

        Ok(observations)
    }
}

impl QuotePort for CsvQuoteAdapter {
    fn fetch_history(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Observation>, FundsimError> {
        let observations = self
            .read_all(code)?
            .into_iter()
            .filter(|o| o.date >= start_date && o.date <= end_date)
            .collect();
        Ok(observations)
    }

    fn data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, FundsimError> {
        let observations = self.read_all(code)?;
        let min = observations.iter().map(|o| o.date).min();
        let max = observations.iter().map(|o| o.date).max();
        match (min, max) {
            (Some(min), Some(max)) => Ok(Some((min, max, observations.len()))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write_csv(dir: &TempDir, name: &str, content: &str) {
        let mut file = fs::File::create(dir.path().join(name)).unwrap();
        write!(file, "{}", content).unwrap();
    }

    #[test]
    fn fetch_history_reads_rows_in_range() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "161725.csv",
            "date,value\n2024-01-02,1.0\n2024-01-03,1.1\n2024-02-01,1.2\n",
        );
        let adapter = CsvQuoteAdapter::new(dir.path().to_path_buf());

        let observations = adapter
            .fetch_history("161725", date(2024, 1, 1), date(2024, 1, 31))
            .unwrap();

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].date, date(2024, 1, 2));
        assert_eq!(observations[1].value, 1.1);
    }

    #[test]
    fn single_file_mode_serves_any_code() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "nav.csv", "date,value\n2024-01-02,1.0\n");
        let adapter = CsvQuoteAdapter::new(dir.path().join("nav.csv"));

        let observations = adapter
            .fetch_history("whatever", date(2024, 1, 1), date(2024, 1, 31))
            .unwrap();
        assert_eq!(observations.len(), 1);
    }

    #[test]
    fn missing_file_is_a_quote_error() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvQuoteAdapter::new(dir.path().to_path_buf());
        let result = adapter.fetch_history("nope", date(2024, 1, 1), date(2024, 1, 31));
        assert!(matches!(result, Err(FundsimError::Quote { .. })));
    }

    #[test]
    fn malformed_date_is_a_quote_error() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "x.csv", "date,value\n02/01/2024,1.0\n");
        let adapter = CsvQuoteAdapter::new(dir.path().to_path_buf());
        let result = adapter.fetch_history("x", date(2024, 1, 1), date(2024, 1, 31));
        assert!(matches!(result, Err(FundsimError::Quote { .. })));
    }

    #[test]
    fn malformed_value_is_a_quote_error() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "x.csv", "date,value\n2024-01-02,abc\n");
        let adapter = CsvQuoteAdapter::new(dir.path().to_path_buf());
        let result = adapter.fetch_history("x", date(2024, 1, 1), date(2024, 1, 31));
        assert!(matches!(result, Err(FundsimError::Quote { .. })));
    }

    #[test]
    fn data_range_reports_bounds_and_count() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "f.csv",
            "date,value\n2024-01-05,1.0\n2024-01-02,0.9\n2024-03-01,1.2\n",
        );
        let adapter = CsvQuoteAdapter::new(dir.path().to_path_buf());

        let range = adapter.data_range("f").unwrap();
        assert_eq!(range, Some((date(2024, 1, 2), date(2024, 3, 1), 3)));
    }

    #[test]
    fn data_range_empty_file_is_none() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "empty.csv", "date,value\n");
        let adapter = CsvQuoteAdapter::new(dir.path().to_path_buf());
        assert_eq!(adapter.data_range("empty").unwrap(), None);
    }
}
