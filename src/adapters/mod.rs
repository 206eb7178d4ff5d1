//! Concrete adapter implementations of the port traits.

pub mod file_config_adapter;
pub mod csv_quote_adapter;
pub mod csv_report_adapter;
