use log::{debug, trace};

use crate::cache::DataCache;
use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::event::Event;
use crate::memory::{BackingStore, FrameStore, LoadedPages, PageTable};
use crate::stats::Stats;
use crate::tlb::Tlb;

/// Represents the decomposed components of a Virtual Address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub va: u32,
    pub page: usize,
    pub offset: usize,
}

impl VirtualAddress {
    /// Split a raw VA into logical page and word offset
    pub fn from_raw(va: u32, page_size: usize) -> Self {
        let raw = va as usize;
        VirtualAddress {
            va,
            page: raw / page_size,
            offset: raw % page_size,
        }
    }
}

impl std::fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VA({}) = (page={}, offset={})", self.va, self.page, self.offset)
    }
}

/// The whole hierarchy: page table, TLB, data cache, main memory and paging
/// store, plus the counters that describe how a replay went.
///
/// All accesses go through `read` and `write`, which translate the virtual
/// address (TLB, then page table, then a page load) and then consult the
/// data cache for the resulting physical address.
pub struct MemorySystem {
    config: SimConfig,
    page_table: PageTable,
    tlb: Tlb,
    cache: DataCache,
    frames: FrameStore,
    disk: BackingStore,
    loaded: LoadedPages,
    stats: Stats,
    journal: Option<Vec<Event>>,
}

impl MemorySystem {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        Ok(MemorySystem {
            page_table: PageTable::new(config.num_pages),
            tlb: Tlb::new(config.tlb_size),
            cache: DataCache::new(config.cache_size, config.coherent),
            frames: FrameStore::new(config.num_frames, config.page_size),
            disk: BackingStore::new(config.num_pages, config.page_size),
            loaded: LoadedPages::new(config.num_frames),
            stats: Stats::default(),
            journal: None,
            config,
        })
    }

    /// Return every structure and counter to its freshly constructed state
    pub fn init(&mut self) {
        self.page_table.reset();
        self.tlb.clear();
        self.cache.clear();
        self.frames.clear();
        self.disk.reseed();
        self.loaded.clear();
        self.stats = Stats::default();
        if let Some(journal) = self.journal.as_mut() {
            journal.clear();
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn tlb(&self) -> &Tlb {
        &self.tlb
    }

    pub fn cache(&self) -> &DataCache {
        &self.cache
    }

    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }

    pub fn backing_store(&self) -> &BackingStore {
        &self.disk
    }

    pub fn loaded_pages(&self) -> &LoadedPages {
        &self.loaded
    }

    /// Start or stop keeping an in-memory journal of events
    pub fn record_events(&mut self, enabled: bool) {
        self.journal = if enabled { Some(Vec::new()) } else { None };
    }

    /// Drain the events recorded so far
    pub fn take_events(&mut self) -> Vec<Event> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn emit(&mut self, event: Event) {
        debug!("{}", event);
        if let Some(journal) = self.journal.as_mut() {
            journal.push(event);
        }
    }

    /// Decompose a VA, rejecting anything outside the address space
    pub fn decompose(&self, va: u32) -> Result<VirtualAddress> {
        let addr = VirtualAddress::from_raw(va, self.config.page_size);
        if addr.page >= self.config.num_pages {
            return Err(SimError::InvalidAddress {
                va,
                page: addr.page,
                offset: addr.offset,
                num_pages: self.config.num_pages,
            });
        }
        Ok(addr)
    }

    /// Resolve a virtual address to a physical one.
    ///
    /// A TLB miss falls back to the page table, loading the page if it is not
    /// resident, and refills the TLB either way. Writes mark the page dirty.
    pub fn translate(&mut self, va: u32, is_write: bool) -> Result<usize> {
        let addr = self.decompose(va)?;

        let frame = match self.tlb.lookup(addr.page) {
            Some(frame) => {
                self.stats.tlb_hits += 1;
                self.emit(Event::TlbHit { page: addr.page, frame });
                frame
            }
            None => {
                self.stats.tlb_misses += 1;
                self.emit(Event::TlbMiss { page: addr.page });
                let frame = match self.page_table.resident_frame(addr.page) {
                    Some(frame) => frame,
                    None => self.fault_in(addr.page)?,
                };
                self.tlb.refill(addr.page, frame);
                frame
            }
        };

        if is_write {
            self.page_table.mark_dirty(addr.page);
        }

        let pa = self.frames.frame_to_address(frame) + addr.offset;
        trace!("{} -> PA {}", addr, pa);
        Ok(pa)
    }

    /// Bring a page into a frame, evicting the oldest resident page when no
    /// frame is free. Counted as a page fault even on first touch; a page
    /// that is already resident just reports its frame.
    pub fn load_page(&mut self, page: usize) -> Result<usize> {
        if page >= self.config.num_pages {
            return Err(SimError::InvalidAddress {
                va: page.saturating_mul(self.config.page_size).min(u32::MAX as usize) as u32,
                page,
                offset: 0,
                num_pages: self.config.num_pages,
            });
        }
        match self.page_table.resident_frame(page) {
            Some(frame) => Ok(frame),
            None => self.fault_in(page),
        }
    }

    fn fault_in(&mut self, page: usize) -> Result<usize> {
        self.stats.page_faults += 1;

        let frame = match self.page_table.lowest_free_frame(self.config.num_frames) {
            Some(frame) => frame,
            None => self
                .evict_oldest()
                .ok_or(SimError::NoEvictableFrame(self.config.num_frames))?,
        };

        self.page_table.map(page, frame);
        let start = self.frames.frame_to_address(frame);
        self.disk.read_block(page, &mut self.frames, start);
        self.loaded.push(page);
        self.emit(Event::PageLoad { page, frame });
        Ok(frame)
    }

    /// Unload the earliest-loaded page, writing it back first if dirty
    fn evict_oldest(&mut self) -> Option<usize> {
        // Queue is only popped once the victim is known to hold a frame
        let victim = self.loaded.oldest()?;
        let frame = self.page_table.resident_frame(victim)?;
        self.loaded.pop_oldest();
        let entry = self.page_table.unmap(victim);

        if entry.is_dirty() {
            self.disk.write_block(victim, &self.frames, frame);
            self.stats.disk_writes += 1;
            self.emit(Event::WriteBack { page: victim, frame });
        }

        if self.config.coherent {
            let start = self.frames.frame_to_address(frame);
            let tlb_dropped = self.tlb.invalidate_page(victim);
            let lines_dropped = self.cache.invalidate_range(start..start + self.config.page_size);
            debug!(
                "Invalidated {} TLB entries and {} cache lines for VP {}",
                tlb_dropped, lines_dropped, victim
            );
        }

        self.emit(Event::Eviction { page: victim, frame });
        Some(frame)
    }

    /// Read the word at a virtual address through the data cache
    pub fn read(&mut self, va: u32) -> Result<String> {
        let pa = self.translate(va, false)?;

        if let Some(data) = self.cache.lookup(pa).map(str::to_owned) {
            self.stats.cache_hits += 1;
            self.emit(Event::CacheHit { address: pa });
            return Ok(data);
        }

        self.stats.cache_misses += 1;
        self.emit(Event::CacheMiss { address: pa });
        let data = self.frames.read(pa).to_owned();
        self.cache.insert(pa, &data);
        debug!("Inserted into cache PA {} -> {}", pa, data);
        Ok(data)
    }

    /// Write a word at a virtual address, through to main memory and the cache
    pub fn write(&mut self, va: u32, data: &str) -> Result<()> {
        let pa = self.translate(va, true)?;
        self.frames.write(pa, data);
        self.cache.insert(pa, data);
        debug!("Updated cache line for PA {} -> {}", pa, data);
        Ok(())
    }
}
