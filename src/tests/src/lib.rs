//! Integration tests for the Ripple wallet tools.

pub mod config_tests;
pub mod core_tests;
pub mod input_tests;
pub mod network_tests;
pub mod report_tests;
