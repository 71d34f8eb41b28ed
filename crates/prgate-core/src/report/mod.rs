//! Human-readable status reports for pipeline steps

pub mod plan;
pub mod step;

pub use plan::PlanSummary;
pub use step::{render_step, ReportStyle, StepOutcome, StepResult, StepSpec};
