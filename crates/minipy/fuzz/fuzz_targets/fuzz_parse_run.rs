//! Fuzz target: parse and execute arbitrary Python source.
//!
//! Resource limits keep legitimate exhaustion (a `MemoryError` from a huge
//! `list(range(...))`) off the findings list. Findings indicate panics, stack
//! overflows or limits that fail to stop execution.

#![no_main]

use libfuzzer_sys::fuzz_target;

use minipy::{LimitedTracker, NoPrint, ResourceLimits, Runner};

fuzz_target!(|data: &[u8]| {
    // Python source is always text.
    let Ok(code) = std::str::from_utf8(data) else {
        return;
    };

    // Most parser/runtime bugs reproduce with small inputs.
    if code.len() > 4096 {
        return;
    }

    // Parse failures are expected and not bugs.
    let Ok(runner) = Runner::new(code.to_owned(), "fuzz.py") else {
        return;
    };

    let limits = ResourceLimits::new()
        .max_allocations(10_000)
        .max_memory(10 * 1024 * 1024);
    let tracker = LimitedTracker::new(limits);

    // only panics and crashes matter
    let _ = runner.run(tracker, &mut NoPrint);
});
