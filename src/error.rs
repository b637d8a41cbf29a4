use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    /// Virtual address falls outside the simulated address space
    #[error("invalid address {va}: page {page} offset {offset} (address space has {num_pages} pages)")]
    InvalidAddress {
        va: u32,
        page: usize,
        offset: usize,
        num_pages: usize,
    },

    /// Every frame is in use yet no resident page is queued for eviction
    #[error("no evictable frame: all {0} frames in use with an empty load queue")]
    NoEvictableFrame(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("trace line {line}: {message}")]
    TraceParse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
