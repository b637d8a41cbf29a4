pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod io;
pub mod memory;
pub mod stats;
pub mod tlb;
pub mod translation;

// Re-export commonly used items for convenience
pub use config::SimConfig;
pub use error::{Result, SimError};
pub use event::Event;
pub use stats::Stats;
pub use translation::{MemorySystem, VirtualAddress};
