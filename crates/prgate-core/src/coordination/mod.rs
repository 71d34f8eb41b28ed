//! Flows that combine several API calls

pub mod apply_gate;
pub mod results;

pub use apply_gate::{validate_apply, GateDecision, GateFailure, GateOptions};
pub use results::{collect_steps, comment_results, job_link, render_results, ReportedStep};
