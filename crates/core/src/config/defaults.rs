//! Default values and functions for configuration

/// Size of each chunk window in bytes (10 MiB)
pub const DEFAULT_CHUNK_SIZE: usize = 10 * 1024 * 1024;

pub(crate) fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

pub(crate) fn default_report_interval_ms() -> u64 {
    15_000
}

pub(crate) fn default_debounce_ms() -> u64 {
    5_000
}

pub(crate) fn default_max_queue_size() -> usize {
    1024
}

pub(crate) fn default_poll_interval_ms() -> u64 {
    2_000
}
