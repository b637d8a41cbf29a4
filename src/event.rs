use std::fmt;

/// Side-channel record of one step inside the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    TlbHit { page: usize, frame: usize },
    TlbMiss { page: usize },
    CacheHit { address: usize },
    CacheMiss { address: usize },
    PageLoad { page: usize, frame: usize },
    Eviction { page: usize, frame: usize },
    WriteBack { page: usize, frame: usize },
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TlbHit { .. } => "tlb-hit",
            Event::TlbMiss { .. } => "tlb-miss",
            Event::CacheHit { .. } => "cache-hit",
            Event::CacheMiss { .. } => "cache-miss",
            Event::PageLoad { .. } => "page-load",
            Event::Eviction { .. } => "eviction",
            Event::WriteBack { .. } => "write-back",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Event::TlbHit { page, frame } => write!(f, "TLB HIT: VP {} -> PF {}", page, frame),
            Event::TlbMiss { page } => write!(f, "TLB MISS for VP {}", page),
            Event::CacheHit { address } => write!(f, "CACHE HIT at PA {}", address),
            Event::CacheMiss { address } => write!(f, "CACHE MISS at PA {}", address),
            Event::PageLoad { page, frame } => write!(f, "Loaded VP {} -> PF {}", page, frame),
            Event::Eviction { page, frame } => write!(f, "Evicted VP {} from PF {}", page, frame),
            Event::WriteBack { page, frame } => {
                write!(f, "Wrote back dirty VP {} from PF {} to disk", page, frame)
            }
        }
    }
}
