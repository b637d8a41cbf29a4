use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::info;

use crate::error::{Result, SimError};
use crate::stats::Stats;
use crate::translation::MemorySystem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Read,
    Write(String),
}

/// One line of a trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub va: u32,
    pub access: Access,
}

impl TraceEntry {
    pub fn read(va: u32) -> Self {
        TraceEntry { va, access: Access::Read }
    }

    pub fn write(va: u32, data: &str) -> Self {
        TraceEntry {
            va,
            access: Access::Write(data.to_owned()),
        }
    }
}

/// What a replayed access produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Read { va: u32, data: String },
    Wrote { va: u32 },
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Read { data, .. } => write!(f, "-> Read result: {}", data),
            Outcome::Wrote { va } => write!(f, "-> Wrote data to VA {}", va),
        }
    }
}

/// The 17-access trace the simulator replays when given no trace file
pub fn sample_trace() -> Vec<TraceEntry> {
    vec![
        TraceEntry::read(0),
        TraceEntry::read(1),
        TraceEntry::read(2),
        TraceEntry::read(15),
        TraceEntry::write(16, "Modified(VP2,W0)"),
        TraceEntry::read(31),
        TraceEntry::read(32),
        TraceEntry::read(33),
        TraceEntry::read(64),
        TraceEntry::read(65),
        TraceEntry::read(95),
        TraceEntry::write(96, "Modified(VP12,W0)"),
        TraceEntry::read(120),
        TraceEntry::read(0),
        TraceEntry::read(16),
        TraceEntry::read(96),
        TraceEntry::read(2),
    ]
}

/// Parse a trace in the `R <va>` / `W <va> <data>` line format.
///
/// Blank lines and lines starting with `#` are skipped. Addresses may be
/// decimal or `0x`-prefixed hex; write data is the rest of the line.
pub fn parse_trace(content: &str) -> Result<Vec<TraceEntry>> {
    let mut entries = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = idx + 1;
        let err = |message: String| SimError::TraceParse { line: line_no, message };

        let (op, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim_start();
        let (va_token, data) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if va_token.is_empty() {
            return Err(err("missing virtual address".to_string()));
        }
        let va = parse_address(va_token).ok_or_else(|| err(format!("invalid virtual address: {}", va_token)))?;
        let data = data.trim();

        let entry = match op {
            "R" | "r" => {
                if !data.is_empty() {
                    return Err(err(format!("unexpected data after read: {}", data)));
                }
                TraceEntry::read(va)
            }
            "W" | "w" => {
                if data.is_empty() {
                    return Err(err("write is missing its data".to_string()));
                }
                TraceEntry::write(va, data)
            }
            _ => return Err(err(format!("unknown operation: {}", op))),
        };
        entries.push(entry);
    }

    Ok(entries)
}

fn parse_address(token: &str) -> Option<u32> {
    match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => token.parse().ok(),
    }
}

pub fn read_trace<P: AsRef<Path>>(path: P) -> Result<Vec<TraceEntry>> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_trace(&content)
}

/// Feed every entry through the system in order, stopping at the first error
pub fn replay(system: &mut MemorySystem, trace: &[TraceEntry]) -> Result<Vec<Outcome>> {
    info!("Replaying {} accesses", trace.len());

    let mut outcomes = Vec::with_capacity(trace.len());
    for entry in trace {
        let outcome = match &entry.access {
            Access::Read => Outcome::Read {
                va: entry.va,
                data: system.read(entry.va)?,
            },
            Access::Write(data) => {
                system.write(entry.va, data)?;
                Outcome::Wrote { va: entry.va }
            }
        };
        outcomes.push(outcome);
    }

    let stats = system.stats();
    info!(
        "Replay done: {} page faults, {} write-backs",
        stats.page_faults, stats.disk_writes
    );
    Ok(outcomes)
}

/// Final statistics block printed after a replay
pub fn render_report(stats: &Stats) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "=== FINAL STATS ===");
    let _ = writeln!(out, "TLB Hits: {} | TLB Misses: {}", stats.tlb_hits, stats.tlb_misses);
    let _ = writeln!(out, "Cache Hits: {} | Cache Misses: {}", stats.cache_hits, stats.cache_misses);
    let _ = writeln!(
        out,
        "Page Faults: {} | Disk Writes (write-backs): {}",
        stats.page_faults, stats.disk_writes
    );
    let _ = writeln!(out, "====================");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use std::io::Write;

    #[test]
    fn test_parse_trace() {
        let content = "# warm up\nR 0\nr 0x10\n\nW 16 Modified(VP2,W0)\nw 3   two words\n";
        let trace = parse_trace(content).unwrap();
        assert_eq!(
            trace,
            vec![
                TraceEntry::read(0),
                TraceEntry::read(16),
                TraceEntry::write(16, "Modified(VP2,W0)"),
                TraceEntry::write(3, "two words"),
            ]
        );
    }

    #[test]
    fn test_parse_trace_errors_carry_line_numbers() {
        let err = parse_trace("R 1\nX 2").unwrap_err();
        assert!(matches!(err, SimError::TraceParse { line: 2, .. }));

        assert!(matches!(parse_trace("W 4"), Err(SimError::TraceParse { line: 1, .. })));
        assert!(matches!(parse_trace("R"), Err(SimError::TraceParse { line: 1, .. })));
        assert!(matches!(parse_trace("R -3"), Err(SimError::TraceParse { .. })));
        assert!(matches!(parse_trace("R 0xZZ"), Err(SimError::TraceParse { .. })));
        assert!(matches!(parse_trace("R 5 extra"), Err(SimError::TraceParse { .. })));
    }

    #[test]
    fn test_parse_trace_empty() {
        assert!(parse_trace("").unwrap().is_empty());
        assert!(parse_trace("# nothing\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_read_trace_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "R 0").unwrap();
        writeln!(file, "W 8 hello").unwrap();

        let trace = read_trace(file.path()).unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[1], TraceEntry::write(8, "hello"));
    }

    #[test]
    fn test_sample_trace_shape() {
        let trace = sample_trace();
        assert_eq!(trace.len(), 17);
        assert_eq!(trace[4], TraceEntry::write(16, "Modified(VP2,W0)"));
        assert_eq!(trace[11], TraceEntry::write(96, "Modified(VP12,W0)"));
        let writes = trace.iter().filter(|e| e.access != Access::Read).count();
        assert_eq!(writes, 2);
    }

    #[test]
    fn test_sample_trace_replay_totals() {
        for config in [SimConfig::default(), SimConfig::literal()] {
            let mut sys = MemorySystem::new(config).unwrap();
            let outcomes = replay(&mut sys, &sample_trace()).unwrap();

            let stats = sys.stats();
            assert_eq!(stats.tlb_hits, 4);
            assert_eq!(stats.tlb_misses, 13);
            assert_eq!(stats.cache_hits, 1);
            assert_eq!(stats.cache_misses, 14);
            assert_eq!(stats.page_faults, 11);
            assert_eq!(stats.disk_writes, 1);

            assert_eq!(outcomes.len(), 17);
            assert_eq!(outcomes[3], Outcome::Read { va: 15, data: "DiskData(VP1,W7)".into() });
            assert_eq!(outcomes[4], Outcome::Wrote { va: 16 });
            assert_eq!(outcomes[14], Outcome::Read { va: 16, data: "Modified(VP2,W0)".into() });
            assert_eq!(outcomes[15], Outcome::Read { va: 96, data: "Modified(VP12,W0)".into() });
            assert_eq!(outcomes[16], Outcome::Read { va: 2, data: "DiskData(VP0,W2)".into() });

            // Page 2 was written, evicted and written back; page 12 is still resident
            assert_eq!(sys.backing_store().read(2, 0), "Modified(VP2,W0)");
            assert_eq!(sys.backing_store().read(12, 0), "DiskData(VP12,W0)");
        }
    }

    #[test]
    fn test_replay_stops_at_invalid_address() {
        let mut sys = MemorySystem::new(SimConfig::default()).unwrap();
        let trace = vec![TraceEntry::read(0), TraceEntry::read(500), TraceEntry::read(1)];
        let err = replay(&mut sys, &trace).unwrap_err();
        assert!(matches!(err, SimError::InvalidAddress { va: 500, .. }));
        assert_eq!(sys.stats().tlb_lookups(), 1);
    }

    #[test]
    fn test_outcome_display() {
        let read = Outcome::Read { va: 0, data: "DiskData(VP0,W0)".into() };
        assert_eq!(read.to_string(), "-> Read result: DiskData(VP0,W0)");
        assert_eq!(Outcome::Wrote { va: 16 }.to_string(), "-> Wrote data to VA 16");
    }

    #[test]
    fn test_render_report() {
        let stats = Stats {
            tlb_hits: 4,
            tlb_misses: 13,
            cache_hits: 1,
            cache_misses: 14,
            page_faults: 11,
            disk_writes: 1,
        };
        let report = render_report(&stats);
        assert!(report.starts_with("=== FINAL STATS ===\n"));
        assert!(report.contains("TLB Hits: 4 | TLB Misses: 13\n"));
        assert!(report.contains("Cache Hits: 1 | Cache Misses: 14\n"));
        assert!(report.contains("Page Faults: 11 | Disk Writes (write-backs): 1\n"));
        assert!(report.ends_with("====================\n"));
    }
}
