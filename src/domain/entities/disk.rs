use serde::{Deserialize, Serialize};

/// A mounted partition as reported by the operating system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionInfo {
    pub device: String,
    pub mountpoint: String,
    pub filesystem_type: String,
}

impl PartitionInfo {
    #[must_use]
    pub fn new(
        device: impl Into<String>,
        mountpoint: impl Into<String>,
        filesystem_type: impl Into<String>,
    ) -> Self {
        Self {
            device: device.into(),
            mountpoint: mountpoint.into(),
            filesystem_type: filesystem_type.into(),
        }
    }
}

/// Space usage of one partition, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    /// Rounded to one decimal. Zero when `total_bytes` is zero.
    pub percent_used: f64,
}

impl UsageStats {
    /// Builds usage figures from raw byte counts.
    ///
    /// `used` is derived as `total - free` (saturating).
    #[must_use]
    pub fn from_bytes(total_bytes: u64, free_bytes: u64) -> Self {
        Self::from_space(total_bytes, free_bytes, free_bytes)
    }

    /// Builds usage figures the way `df` does.
    ///
    /// `free` counts every unallocated byte, `available` only those an
    /// unprivileged user may claim. Used space is `total - free`, the
    /// reported free space is `available`, and the percentage is taken over
    /// `used + available` so root-reserved blocks count as neither.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_space(total_bytes: u64, free_bytes: u64, available_bytes: u64) -> Self {
        let used_bytes = total_bytes.saturating_sub(free_bytes);
        let usable = used_bytes.saturating_add(available_bytes);
        let percent_used = if usable > 0 {
            let raw = (used_bytes as f64 / usable as f64) * 100.0;
            (raw.clamp(0.0, 100.0) * 10.0).round() / 10.0
        } else {
            0.0
        };
        Self {
            total_bytes,
            used_bytes,
            free_bytes: available_bytes,
            percent_used,
        }
    }

    #[must_use]
    pub fn percent_free(&self) -> f64 {
        100.0 - self.percent_used
    }
}
