// Default geometry of the simulated hierarchy. Everything here can be
// overridden through `SimConfig`.
pub const PAGE_SIZE: usize = 8;
pub const NUM_PAGES: usize = 16;
pub const NUM_FRAMES: usize = 4;

pub const TLB_SIZE: usize = 2;
pub const CACHE_SIZE: usize = 4;

/// Content the backing store holds for `(page, word)` before any write-back.
pub fn seeded_word(page: usize, word: usize) -> String {
    format!("DiskData(VP{},W{})", page, word)
}
