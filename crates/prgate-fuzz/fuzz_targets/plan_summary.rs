#![no_main]
use libfuzzer_sys::fuzz_target;
use prgate_core::report::{render_step, PlanSummary, ReportStyle, StepOutcome, StepResult};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let summary = PlanSummary::parse(s);
        if summary.destroy == Some(0) {
            assert!(!summary.destroys_resources());
        }

        let result = StepResult {
            name: "plan".to_string(),
            outcome: StepOutcome::Success,
            stdout: s.to_string(),
            stderr: String::new(),
        };
        let _ = render_step(&result, true, &ReportStyle::default());
    }
});
