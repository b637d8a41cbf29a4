use std::collections::VecDeque;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLine {
    pub address: usize,
    pub data: String,
}

/// Data cache keyed by physical address, evicting in insertion order
pub struct DataCache {
    lines: VecDeque<CacheLine>,
    capacity: usize,
    dedupe: bool,
}

impl DataCache {
    /// With `dedupe` set, inserting an address already held overwrites that
    /// line where it sits instead of appending a second line.
    pub fn new(capacity: usize, dedupe: bool) -> Self {
        DataCache {
            lines: VecDeque::with_capacity(capacity),
            capacity,
            dedupe,
        }
    }

    /// Word cached at `address`, earliest inserted line first
    pub fn lookup(&self, address: usize) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.address == address)
            .map(|line| line.data.as_str())
    }

    /// Store a word, returning the line pushed out if the cache was full
    pub fn insert(&mut self, address: usize, data: &str) -> Option<CacheLine> {
        if self.dedupe {
            if let Some(line) = self.lines.iter_mut().find(|l| l.address == address) {
                data.clone_into(&mut line.data);
                return None;
            }
        }

        let dropped = if self.lines.len() >= self.capacity {
            self.lines.pop_front()
        } else {
            None
        };
        self.lines.push_back(CacheLine {
            address,
            data: data.to_owned(),
        });
        dropped
    }

    /// Drop every line whose address falls in `range`
    pub fn invalidate_range(&mut self, range: Range<usize>) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| !range.contains(&line.address));
        before - self.lines.len()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &CacheLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn addresses(cache: &DataCache) -> Vec<usize> {
        cache.lines().map(|l| l.address).collect()
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut cache = DataCache::new(4, true);
        assert_eq!(cache.lookup(3), None);

        cache.insert(3, "three");
        assert_eq!(cache.lookup(3), Some("three"));
    }

    #[test]
    fn test_full_cache_drops_oldest() {
        let mut cache = DataCache::new(2, true);
        cache.insert(0, "a");
        cache.insert(8, "b");

        let dropped = cache.insert(16, "c").unwrap();
        assert_eq!(dropped.address, 0);
        assert_eq!(dropped.data, "a");
        assert_eq!(addresses(&cache), vec![8, 16]);
    }

    #[test]
    fn test_dedupe_overwrites_in_place() {
        let mut cache = DataCache::new(3, true);
        cache.insert(1, "old");
        cache.insert(2, "other");

        assert_eq!(cache.insert(1, "new"), None);
        assert_eq!(addresses(&cache), vec![1, 2]);
        assert_eq!(cache.lookup(1), Some("new"));

        // Position is kept, so address 1 is still the next to go
        cache.insert(3, "x");
        let dropped = cache.insert(4, "y").unwrap();
        assert_eq!(dropped.address, 1);
    }

    #[test]
    fn test_literal_mode_keeps_shadowed_duplicate() {
        let mut cache = DataCache::new(4, false);
        cache.insert(1, "old");
        cache.insert(1, "new");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.lookup(1), Some("old"));
    }

    #[test]
    fn test_invalidate_range() {
        let mut cache = DataCache::new(4, true);
        for addr in [0, 7, 8, 15] {
            cache.insert(addr, "w");
        }
        assert_eq!(cache.invalidate_range(0..8), 2);
        assert_eq!(addresses(&cache), vec![8, 15]);
    }

    proptest! {
        #[test]
        fn prop_capacity_and_oldest_first(
            capacity in 1usize..6,
            dedupe in any::<bool>(),
            inserts in proptest::collection::vec(0usize..12, 0..40),
        ) {
            let mut cache = DataCache::new(capacity, dedupe);
            let mut model: Vec<usize> = Vec::new();

            for &addr in &inserts {
                let dropped = cache.insert(addr, "w");
                if dedupe && model.contains(&addr) {
                    prop_assert!(dropped.is_none());
                } else {
                    if model.len() == capacity {
                        let oldest = model.remove(0);
                        prop_assert_eq!(dropped.map(|l| l.address), Some(oldest));
                    }
                    model.push(addr);
                }
                prop_assert!(cache.len() <= capacity);
            }

            prop_assert_eq!(addresses(&cache), model);
        }
    }
}
