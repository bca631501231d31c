use serde::{Deserialize, Serialize};

/// Operating system identification and uptime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    pub system: String,
    pub release: String,
    pub version: String,
    pub machine: String,
    pub processor: String,
    pub uptime_secs: u64,
}

/// CPU usage sampled at report time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuStats {
    pub frequency_mhz: u64,
    pub usage_percent: f32,
    pub physical_cores: Option<usize>,
    pub logical_cores: usize,
    pub process_count: usize,
}

/// Physical memory and swap, in bytes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub usage_percent: f64,
    pub swap_total_bytes: u64,
    pub swap_used_bytes: u64,
    pub swap_free_bytes: u64,
}

impl MemoryStats {
    /// Memory the kernel can reclaim on demand (available minus free).
    #[must_use]
    pub const fn cached_bytes(&self) -> u64 {
        self.available_bytes.saturating_sub(self.free_bytes)
    }
}
