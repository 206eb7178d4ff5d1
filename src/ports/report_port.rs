//! Report export port trait.

use crate::domain::error::FundsimError;
use crate::domain::simulation::SimulationResult;

/// Port for exporting a completed simulation for display elsewhere.
pub trait ReportPort {
    fn write(
        &self,
        result: &SimulationResult,
        strategy_name: &str,
        output_path: &str,
    ) -> Result<(), FundsimError>;
}
