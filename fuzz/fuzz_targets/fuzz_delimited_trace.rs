#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use stepclamp::analysis::{AnalysisConfig, ControlBranch, StepResponseExtractor};
use stepclamp::recording::read_trace_delimited;

fuzz_target!(|data: &[u8]| {
    // Malformed text must surface as an error, never a panic
    let Ok(trace) = read_trace_delimited(Cursor::new(data), b',', None) else {
        return;
    };

    let config = AnalysisConfig {
        baseline_window_samples: 16,
        ..Default::default()
    };
    for branch in [ControlBranch::NegativeControl, ControlBranch::Experimental] {
        if let Ok(extractor) = StepResponseExtractor::new(branch, config.clone()) {
            if let Ok(m) = extractor.extract(&trace) {
                assert!(m.window().start < m.window().end);
                assert!(m.window().end <= trace.len());
            }
        }
    }
});
