//! CSV transaction-log report adapter.
//!
//! Exports the transaction table of a completed run for display or further
//! analysis elsewhere. One row per executed trade.

use crate::domain::error::FundsimError;
use crate::domain::simulation::SimulationResult;
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter;

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &SimulationResult,
        strategy_name: &str,
        output_path: &str,
    ) -> Result<(), FundsimError> {
        let mut writer = csv::Writer::from_path(output_path).map_err(|e| FundsimError::Io {
            reason: format!("failed to open {}: {}", output_path, e),
        })?;

        writer
            .write_record([
                "strategy",
                "date",
                "side",
                "price",
                "shares",
                "amount",
                "reference_value",
                "reference_date",
                "reason",
            ])
            .map_err(|e| FundsimError::Io {
                reason: e.to_string(),
            })?;

        for tx in &result.transactions {
            writer
                .write_record([
                    strategy_name.to_string(),
                    tx.date.to_string(),
                    tx.side.to_string(),
                    format!("{:.4}", tx.price),
                    format!("{:.4}", tx.shares),
                    format!("{:.2}", tx.amount),
                    tx.reference_value
                        .map(|v| format!("{:.4}", v))
                        .unwrap_or_default(),
                    tx.reference_date.map(|d| d.to_string()).unwrap_or_default(),
                    tx.reason.clone(),
                ])
                .map_err(|e| FundsimError::Io {
                    reason: e.to_string(),
                })?;
        }

        writer.flush().map_err(|e| FundsimError::Io {
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
