//! Pure reporting core. Everything here is a function of the workout
//! collection handed in by the caller; nothing touches the database or any
//! other ambient state.

pub mod exercises;
pub mod filter;
pub mod metrics;
pub mod view;

pub use exercises::distinct_exercises;
pub use filter::{filter_workouts, workouts_containing};
pub use metrics::{one_rm_report, volume_report};
pub use view::{ReportStatus, ReportView};
