// demanda-core/src/infrastructure/memory.rs

use crate::ports::MemoryProbe;

/// Reads the resident set size from `/proc/self/statm`. On platforms (or
/// containers) where that file is unavailable, reports 0 and the dashboard
/// shows "0.0MB" instead of failing.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcfsMemoryProbe;

const PAGE_SIZE: u64 = 4096;

impl MemoryProbe for ProcfsMemoryProbe {
    fn resident_bytes(&self) -> u64 {
        let Ok(statm) = std::fs::read_to_string("/proc/self/statm") else {
            return 0;
        };
        statm
            .split_whitespace()
            .nth(1)
            .and_then(|pages| pages.parse::<u64>().ok())
            .map_or(0, |pages| pages * PAGE_SIZE)
    }
}
