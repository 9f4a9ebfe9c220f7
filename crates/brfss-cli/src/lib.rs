//! Library components of the BRFSS diabetes indicator pipeline CLI.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod run_log;
pub mod walk;
