use serde::{Deserialize, Serialize};

/// A GPU with its live load, memory and temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuInfo {
    pub name: String,
    pub uuid: String,
    /// Utilisation in [0, 100].
    pub load_percent: f64,
    pub memory_total_bytes: u64,
    pub memory_used_bytes: u64,
    pub memory_free_bytes: u64,
    pub temperature_celsius: Option<f64>,
}
