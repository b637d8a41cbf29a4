/// Hit/miss/fault counters accumulated over a replay.
///
/// Counters only ever grow; they are zeroed by `MemorySystem::init`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub tlb_hits: u64,
    pub tlb_misses: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Every page load, first touches included
    pub page_faults: u64,
    /// Dirty pages copied back to the backing store
    pub disk_writes: u64,
}

impl Stats {
    pub fn tlb_lookups(&self) -> u64 {
        self.tlb_hits + self.tlb_misses
    }

    pub fn cache_lookups(&self) -> u64 {
        self.cache_hits + self.cache_misses
    }
}
