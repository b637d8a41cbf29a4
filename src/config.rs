use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Result, SimError};

/// Geometry and coherence policy of a `MemorySystem`.
///
/// Loaded from TOML; every key is optional and falls back to the defaults
/// in `constants`:
///
/// ```toml
/// page_size = 8
/// num_pages = 16
/// num_frames = 4
/// tlb_size = 2
/// cache_size = 4
/// coherent = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub page_size: usize,
    pub num_pages: usize,
    pub num_frames: usize,
    pub tlb_size: usize,
    pub cache_size: usize,
    /// When set, re-inserting a cached address overwrites the line in place and
    /// evicting a page drops its TLB entries and the cache lines of its frame.
    /// When clear, both structures keep stale entries exactly as the plain
    /// shift-FIFO arrays would.
    pub coherent: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            page_size: PAGE_SIZE,
            num_pages: NUM_PAGES,
            num_frames: NUM_FRAMES,
            tlb_size: TLB_SIZE,
            cache_size: CACHE_SIZE,
            coherent: true,
        }
    }
}

impl SimConfig {
    /// Default geometry with stale TLB/cache entries left in place
    pub fn literal() -> Self {
        SimConfig {
            coherent: false,
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Reject geometries the simulator cannot run with
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("page_size", self.page_size),
            ("num_pages", self.num_pages),
            ("num_frames", self.num_frames),
            ("tlb_size", self.tlb_size),
            ("cache_size", self.cache_size),
        ];
        for (name, value) in sizes {
            if value == 0 {
                return Err(SimError::InvalidConfig(format!("{} must be non-zero", name)));
            }
        }

        // Virtual and physical addresses are both carried as u32
        let largest = self.num_pages.max(self.num_frames);
        match largest.checked_mul(self.page_size) {
            Some(total) if total <= u32::MAX as usize => Ok(()),
            _ => Err(SimError::InvalidConfig(format!(
                "{} pages of {} words overflow a 32-bit address",
                largest, self.page_size
            ))),
        }
    }

    /// Number of addressable words in the virtual address space
    #[inline]
    pub fn total_addresses(&self) -> usize {
        self.num_pages * self.page_size
    }
}
