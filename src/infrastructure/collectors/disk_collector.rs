use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use sysinfo::{Disk, Disks};

use crate::domain::entities::disk::{PartitionInfo, UsageStats};
use crate::domain::ports::metric_source::CollectionError;

/// Filesystem types skipped unless every mount is requested.
const PSEUDO_FILESYSTEMS: &[&str] = &[
    "tmpfs",
    "devtmpfs",
    "sysfs",
    "proc",
    "cgroup2",
    "overlay",
    "squashfs",
    "efivarfs",
    "bpf",
    "hugetlbfs",
    "mqueue",
    "pstore",
    "securityfs",
    "debugfs",
    "tracefs",
    "fusectl",
    "rpc_pipefs",
    "autofs",
    "devpts",
    "configfs",
];

fn is_physical(fs: &str, total_space: u64) -> bool {
    !PSEUDO_FILESYSTEMS.iter().any(|&pseudo| fs == pseudo) && total_space > 0
}

fn partition_of(disk: &Disk) -> PartitionInfo {
    PartitionInfo::new(
        disk.name().to_string_lossy(),
        disk.mount_point().to_string_lossy(),
        disk.file_system().to_string_lossy(),
    )
}

/// Reads block counts straight from `statvfs(3)` so reserved blocks can be
/// told apart from free ones.
#[cfg(unix)]
fn statvfs_usage(mountpoint: &Path) -> Option<UsageStats> {
    let stat = nix::sys::statvfs::statvfs(mountpoint).ok()?;
    let block = u64::from(stat.fragment_size());
    let bytes = |blocks: u64| blocks.saturating_mul(block);
    Some(UsageStats::from_space(
        bytes(u64::from(stat.blocks())),
        bytes(u64::from(stat.blocks_free())),
        bytes(u64::from(stat.blocks_available())),
    ))
}

#[cfg(not(unix))]
fn statvfs_usage(_mountpoint: &Path) -> Option<UsageStats> {
    None
}

/// Enumerates mounted partitions and their space usage using the `sysinfo` crate.
///
/// By default only physical partitions are listed; with `include_all` the
/// pseudo and zero-size mounts are kept as well.
pub struct DiskCollector {
    disks: Mutex<Disks>,
    include_all: bool,
}

impl DiskCollector {
    /// Creates a new collector with a pre-refreshed disk list.
    #[must_use]
    pub fn new(include_all: bool) -> Self {
        Self {
            disks: Mutex::new(Disks::new_with_refreshed_list()),
            include_all,
        }
    }

    fn refreshed(&self) -> Result<MutexGuard<'_, Disks>, CollectionError> {
        let mut disks = self
            .disks
            .lock()
            .map_err(|e| CollectionError::MetricsUnavailable(format!("disk lock poisoned: {e}")))?;
        disks.refresh(true);
        Ok(disks)
    }

    /// Lists partitions in enumeration scope, in mount-table order.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::MetricsUnavailable` if the internal mutex is poisoned.
    pub fn partitions(&self) -> Result<Vec<PartitionInfo>, CollectionError> {
        let disks = self.refreshed()?;

        Ok(disks
            .iter()
            .filter(|d| {
                self.include_all
                    || is_physical(&d.file_system().to_string_lossy(), d.total_space())
            })
            .map(partition_of)
            .collect())
    }

    /// Space usage of the filesystem mounted at `mountpoint`.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::MetricsUnavailable` if nothing is mounted there
    /// any more or the mutex is poisoned.
    pub fn usage(&self, mountpoint: &str) -> Result<UsageStats, CollectionError> {
        let disks = self.refreshed()?;
        let target = Path::new(mountpoint);

        let disk = disks
            .iter()
            .find(|d| d.mount_point() == target)
            .ok_or_else(|| {
                CollectionError::MetricsUnavailable(format!("no filesystem mounted at {mountpoint}"))
            })?;

        // sysinfo only knows available space, which folds reserved blocks into "used".
        Ok(statvfs_usage(target)
            .unwrap_or_else(|| UsageStats::from_bytes(disk.total_space(), disk.available_space())))
    }
}
