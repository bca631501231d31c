use thiserror::Error;

use crate::domain::entities::{
    CpuStats, GpuInfo, MemoryStats, NetConnection, NetworkInfo, OsInfo, PartitionInfo,
    UsageStats, UserSession,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error("failed to collect system metrics: {0}")]
    MetricsUnavailable(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("not supported on this platform: {0}")]
    Unsupported(String),
}

/// Read access to the host's live metrics, one call per report domain.
///
/// Implementations block until the operating system answers; a call may
/// sample over a short interval (CPU usage).
pub trait MetricSource {
    /// # Errors
    ///
    /// Returns `CollectionError` if the OS identification cannot be read.
    fn os_info(&self) -> Result<OsInfo, CollectionError>;

    /// # Errors
    ///
    /// Returns `CollectionError` if CPU counters are unavailable.
    fn cpu_stats(&self) -> Result<CpuStats, CollectionError>;

    /// # Errors
    ///
    /// Returns `CollectionError` if memory counters are unavailable.
    fn memory_stats(&self) -> Result<MemoryStats, CollectionError>;

    /// All mounted partitions in enumeration scope, unfiltered.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError` if the mount table cannot be read.
    fn partitions(&self) -> Result<Vec<PartitionInfo>, CollectionError>;

    /// Space usage of the filesystem mounted at `partition.mountpoint`.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError` if the mountpoint is gone or unreadable.
    fn disk_usage(&self, partition: &PartitionInfo) -> Result<UsageStats, CollectionError>;

    /// # Errors
    ///
    /// Returns `CollectionError` if interfaces cannot be enumerated.
    fn network_info(&self) -> Result<NetworkInfo, CollectionError>;

    /// # Errors
    ///
    /// Returns `CollectionError` if the GPU driver cannot be queried.
    fn gpus(&self) -> Result<Vec<GpuInfo>, CollectionError>;

    /// # Errors
    ///
    /// Returns `CollectionError` if the session table cannot be read.
    fn user_sessions(&self) -> Result<Vec<UserSession>, CollectionError>;

    /// # Errors
    ///
    /// Returns `CollectionError` if socket tables cannot be read.
    fn connections(&self) -> Result<Vec<NetConnection>, CollectionError>;
}
