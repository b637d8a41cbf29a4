use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlbEntry {
    pub page: usize,
    pub frame: usize,
}

/// Fully associative translation buffer refilled in FIFO order.
///
/// Lookups scan from the oldest entry; when full, a refill drops exactly the
/// oldest entry and keeps the relative order of the rest.
pub struct Tlb {
    entries: VecDeque<TlbEntry>,
    capacity: usize,
}

impl Tlb {
    pub fn new(capacity: usize) -> Self {
        Tlb {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Frame cached for `page`, earliest matching entry first
    pub fn lookup(&self, page: usize) -> Option<usize> {
        self.entries.iter().find(|e| e.page == page).map(|e| e.frame)
    }

    /// Append a mapping, returning the entry pushed out if the buffer was full
    pub fn refill(&mut self, page: usize, frame: usize) -> Option<TlbEntry> {
        let dropped = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(TlbEntry { page, frame });
        dropped
    }

    /// Drop every entry for `page`, returning how many were removed
    pub fn invalidate_page(&mut self, page: usize) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.page != page);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> impl Iterator<Item = &TlbEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
