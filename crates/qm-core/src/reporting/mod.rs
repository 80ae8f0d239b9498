//! Batch aggregation over historical scored submissions.
//!
//! Every operation here takes an already-filtered slice, tolerates empty
//! input, and recovers locally from per-item conditions (missing
//! catalogs, broken timestamps, unresolvable answers); a single bad
//! submission never aborts a report. The caller-facing failure mode is a
//! partial report, not an error.

mod action;
pub mod dimensions;
mod filter;
mod grouping;
mod histogram;
pub mod identity;
mod radar;
mod trend;

pub use action::{action_required_ratio, ActionRequiredRatio};
pub use dimensions::{Dimension, DimensionMap, OTHER_DIMENSION};
pub use filter::SubmissionFilter;
pub use grouping::{grouped_stats, GroupBy, GroupStats};
pub use histogram::{histogram, HistogramBucket};
pub use identity::is_anonymized;
pub use radar::{ProfileContext, RadarEntry, RadarGrouping};
pub use trend::{daily_trend, TrendPoint};
