#![no_main]
use libfuzzer_sys::fuzz_target;
use prgate_core::output::json_format::{format_json_array, format_matrix, safe_output_escape};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let escaped = safe_output_escape(s);
        assert!(!escaped.contains('\n'));
        assert!(!escaped.contains('\r'));

        // Both formats must stay valid JSON for any value
        let values = s.split(',').collect::<Vec<_>>();
        let array = format_json_array(&values);
        assert!(serde_json::from_str::<serde_json::Value>(&array).is_ok());
        let matrix = format_matrix(&values, "module");
        assert!(serde_json::from_str::<serde_json::Value>(&matrix).is_ok());
    }
});
