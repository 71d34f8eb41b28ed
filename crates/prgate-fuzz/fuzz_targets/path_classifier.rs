#![no_main]
use libfuzzer_sys::fuzz_target;
use prgate_core::classifier::{BaseMatch, DepthRange, PathClassifier};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First two bytes pick the depth window, the rest is "base\npath\npath..."
    let min = i64::from(data[0] as i8);
    let max = i64::from(data[1] as i8);
    if let Ok(s) = std::str::from_utf8(&data[2..]) {
        let mut lines = s.split('\n');
        let base = lines.next().unwrap_or("");
        let paths: Vec<&str> = lines.collect();
        let depth = DepthRange::new(Some(min), Some(max));

        for mode in [BaseMatch::Segment, BaseMatch::Raw] {
            let dirs = PathClassifier::new(base, depth).with_mode(mode).classify(&paths);
            for dir in &dirs {
                assert!(dir.split('/').count() > depth.min());
            }
        }
    }
});
