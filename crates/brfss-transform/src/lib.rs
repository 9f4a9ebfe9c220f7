//! Statistical conditioning of canonical BRFSS tables.
//!
//! Stages run in the order recode, balance, clip, correct, scale; each takes
//! a table and returns a new one alongside what it did.

pub mod balance;
pub mod distribution;
pub mod error;
pub mod frame;
pub mod outlier;
pub mod recode;
pub mod scale;
pub mod stats;

pub use balance::{TargetCounts, binary_targets, class_counts, undersample};
pub use distribution::{CorrectionRecord, DEFAULT_SKEW_THRESHOLD, PowerMethod, correct};
pub use error::{Result, TransformError};
pub use frame::drop_duplicate_rows;
pub use outlier::{Bounds, clip, clip_iqr, iqr_bounds};
pub use recode::{RecodeStats, recode};
pub use scale::{ScaleMethod, ScaleParams, scale};
