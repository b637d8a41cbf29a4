use std::collections::VecDeque;

use crate::constants::seeded_word;

/// Main memory: `num_frames * page_size` word slots, addressed physically
pub struct FrameStore {
    data: Vec<String>,
    page_size: usize,
}

impl FrameStore {
    /// Create a frame store with every slot empty
    pub fn new(num_frames: usize, page_size: usize) -> Self {
        FrameStore {
            data: vec![String::new(); num_frames * page_size],
            page_size,
        }
    }

    /// Read a word from main memory
    #[inline]
    pub fn read(&self, address: usize) -> &str {
        &self.data[address]
    }

    /// Write a word to main memory
    #[inline]
    pub fn write(&mut self, address: usize, value: &str) {
        value.clone_into(&mut self.data[address]);
    }

    /// Calculate the starting address of a frame
    #[inline]
    pub fn frame_to_address(&self, frame: usize) -> usize {
        frame * self.page_size
    }

    /// Slots belonging to one frame
    pub fn frame(&self, frame: usize) -> &[String] {
        let start = self.frame_to_address(frame);
        &self.data[start..start + self.page_size]
    }

    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(String::clear);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Paging store - one block of `page_size` words per logical page
pub struct BackingStore {
    /// D[page][offset]
    data: Vec<Vec<String>>,
}

impl BackingStore {
    /// Create a backing store seeded with `seeded_word(page, offset)`
    pub fn new(num_pages: usize, page_size: usize) -> Self {
        let data = (0..num_pages)
            .map(|page| (0..page_size).map(|word| seeded_word(page, word)).collect())
            .collect();
        BackingStore { data }
    }

    /// Reset every slot to its seeded content
    pub fn reseed(&mut self) {
        for (page, block) in self.data.iter_mut().enumerate() {
            for (word, slot) in block.iter_mut().enumerate() {
                *slot = seeded_word(page, word);
            }
        }
    }

    #[inline]
    pub fn read(&self, page: usize, offset: usize) -> &str {
        &self.data[page][offset]
    }

    /// Copy an entire page into the frame store starting at `frame_start`
    pub fn read_block(&self, page: usize, frames: &mut FrameStore, frame_start: usize) {
        for (i, word) in self.data[page].iter().enumerate() {
            frames.write(frame_start + i, word);
        }
    }

    /// Copy a frame's content back over a page's block
    pub fn write_block(&mut self, page: usize, frames: &FrameStore, frame: usize) {
        self.data[page].clone_from_slice(frames.frame(frame));
    }

    pub fn block(&self, page: usize) -> &[String] {
        &self.data[page]
    }
}

/// One page table slot. An invalid entry never carries a frame or a dirty bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageTableEntry {
    frame: Option<usize>,
    valid: bool,
    dirty: bool,
}

impl PageTableEntry {
    #[inline]
    pub fn frame(&self) -> Option<usize> {
        self.frame
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Logical page -> frame mapping for the whole address space
pub struct PageTable {
    entries: Vec<PageTableEntry>,
}

impl PageTable {
    /// All entries start invalid, clean and unassigned
    pub fn new(num_pages: usize) -> Self {
        PageTable {
            entries: vec![PageTableEntry::default(); num_pages],
        }
    }

    pub fn reset(&mut self) {
        self.entries.fill(PageTableEntry::default());
    }

    #[inline]
    pub fn entry(&self, page: usize) -> &PageTableEntry {
        &self.entries[page]
    }

    /// Frame of a resident page
    #[inline]
    pub fn resident_frame(&self, page: usize) -> Option<usize> {
        let entry = &self.entries[page];
        if entry.valid { entry.frame } else { None }
    }

    /// Map a page to a frame as freshly loaded (valid, clean)
    pub fn map(&mut self, page: usize, frame: usize) {
        self.entries[page] = PageTableEntry {
            frame: Some(frame),
            valid: true,
            dirty: false,
        };
    }

    /// Clear a page's mapping, returning what it held
    pub fn unmap(&mut self, page: usize) -> PageTableEntry {
        std::mem::take(&mut self.entries[page])
    }

    /// Set the dirty bit of a resident page. No effect on invalid entries.
    pub fn mark_dirty(&mut self, page: usize) {
        let entry = &mut self.entries[page];
        if entry.valid {
            entry.dirty = true;
        }
    }

    /// Lowest frame index no valid entry points at
    pub fn lowest_free_frame(&self, num_frames: usize) -> Option<usize> {
        let mut used = vec![false; num_frames];
        for entry in self.entries.iter().filter(|e| e.valid) {
            if let Some(frame) = entry.frame {
                used[frame] = true;
            }
        }
        used.iter().position(|&in_use| !in_use)
    }

    /// Valid pages mapped to `frame`
    pub fn pages_in_frame(&self, frame: usize) -> impl Iterator<Item = usize> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.valid && e.frame == Some(frame))
            .map(|(page, _)| page)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resident pages in load order, oldest first
pub struct LoadedPages {
    queue: VecDeque<usize>,
}

impl LoadedPages {
    pub fn new(num_frames: usize) -> Self {
        LoadedPages {
            queue: VecDeque::with_capacity(num_frames),
        }
    }

    pub fn push(&mut self, page: usize) {
        debug_assert!(!self.queue.contains(&page), "page {} loaded twice", page);
        self.queue.push_back(page);
    }

    /// Earliest-loaded page, left in place
    pub fn oldest(&self) -> Option<usize> {
        self.queue.front().copied()
    }

    /// Remove and return the earliest-loaded page
    pub fn pop_oldest(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &usize> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
