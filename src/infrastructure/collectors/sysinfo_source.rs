use std::net::{IpAddr, ToSocketAddrs};
use std::sync::{Mutex, MutexGuard};

use sysinfo::{MemoryRefreshKind, Networks, ProcessesToUpdate, RefreshKind, System};
use tracing::debug;

use super::connection_collector::ConnectionCollector;
use super::disk_collector::DiskCollector;
use super::gpu_collector::GpuCollector;
use super::session_collector::SessionCollector;
use crate::domain::entities::{
    CpuStats, GpuInfo, InterfaceAddress, MemoryStats, NetConnection, NetworkInfo,
    NetworkInterface, OsInfo, PartitionInfo, UsageStats, UserSession,
};
use crate::domain::ports::metric_source::{CollectionError, MetricSource};

const UNKNOWN: &str = "unknown";

/// Returns `(numerator / denominator) * 100.0`, or `0.0` when `denominator` is zero.
#[allow(clippy::cast_precision_loss)]
fn safe_percent(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        (numerator as f64 / denominator as f64) * 100.0
    } else {
        0.0
    }
}

/// Live metrics of the local host.
///
/// Uses `Mutex<System>` for interior mutability since `MetricSource`
/// takes `&self` but `sysinfo::System` needs `&mut self` for refresh.
/// Nothing is sampled until a method is called.
pub struct SysinfoSource {
    sys: Mutex<System>,
    disks: DiskCollector,
    sessions: SessionCollector,
    connections: ConnectionCollector,
    gpus: GpuCollector,
}

impl SysinfoSource {
    /// `include_all_partitions` widens partition enumeration to pseudo and
    /// zero-size mounts.
    #[must_use]
    pub fn new(include_all_partitions: bool) -> Self {
        Self {
            sys: Mutex::new(System::new()),
            disks: DiskCollector::new(include_all_partitions),
            sessions: SessionCollector::new(),
            connections: ConnectionCollector::new(),
            gpus: GpuCollector::new(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, System>, CollectionError> {
        self.sys
            .lock()
            .map_err(|e| CollectionError::MetricsUnavailable(format!("system lock poisoned: {e}")))
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new(false)
    }
}

/// First IPv4 address the hostname resolves to.
fn resolve_hostname(hostname: &str) -> Option<IpAddr> {
    match (hostname, 0).to_socket_addrs() {
        Ok(addrs) => {
            let addrs: Vec<_> = addrs.map(|a| a.ip()).collect();
            addrs
                .iter()
                .find(|ip| ip.is_ipv4())
                .or_else(|| addrs.first())
                .copied()
        }
        Err(e) => {
            debug!("could not resolve {hostname}: {e}");
            None
        }
    }
}

fn collect_interfaces(networks: &Networks) -> Vec<NetworkInterface> {
    let mut interfaces: Vec<NetworkInterface> = networks
        .iter()
        .map(|(name, data)| {
            let mac = data.mac_address();
            NetworkInterface {
                name: name.clone(),
                mac_address: (!mac.is_unspecified()).then(|| mac.to_string()),
                addresses: data
                    .ip_networks()
                    .iter()
                    .map(|net| InterfaceAddress {
                        address: net.addr,
                        prefix: net.prefix,
                    })
                    .collect(),
            }
        })
        .collect();
    interfaces.sort_by(|a, b| a.name.cmp(&b.name));
    interfaces
}

impl MetricSource for SysinfoSource {
    fn os_info(&self) -> Result<OsInfo, CollectionError> {
        let processor = {
            let mut sys = self.lock()?;
            sys.refresh_cpu_list(sysinfo::CpuRefreshKind::nothing());
            sys.cpus()
                .first()
                .map(|c| c.brand().trim().to_string())
                .filter(|b| !b.is_empty())
        };

        Ok(OsInfo {
            system: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
            release: System::kernel_version().unwrap_or_else(|| UNKNOWN.into()),
            version: System::long_os_version()
                .or_else(System::os_version)
                .unwrap_or_else(|| UNKNOWN.into()),
            machine: System::cpu_arch(),
            processor: processor.unwrap_or_else(System::cpu_arch),
            uptime_secs: System::uptime(),
        })
    }

    fn cpu_stats(&self) -> Result<CpuStats, CollectionError> {
        let mut sys = self.lock()?;
        // Usage is a delta between two refreshes.
        sys.refresh_cpu_usage();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_cpu_usage();
        sys.refresh_cpu_frequency();
        let process_count = sys.refresh_processes(ProcessesToUpdate::All, true);

        let cpus = sys.cpus();
        if cpus.is_empty() {
            return Err(CollectionError::MetricsUnavailable(
                "no CPU reported by the OS".into(),
            ));
        }

        Ok(CpuStats {
            frequency_mhz: cpus.iter().map(sysinfo::Cpu::frequency).max().unwrap_or(0),
            usage_percent: sys.global_cpu_usage(),
            physical_cores: System::physical_core_count(),
            logical_cores: cpus.len(),
            process_count: process_count.max(sys.processes().len()),
        })
    }

    fn memory_stats(&self) -> Result<MemoryStats, CollectionError> {
        let sys = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
        );
        let total = sys.total_memory();
        if total == 0 {
            return Err(CollectionError::MetricsUnavailable(
                "total memory reported as zero".into(),
            ));
        }
        let available = sys.available_memory();

        Ok(MemoryStats {
            total_bytes: total,
            available_bytes: available,
            used_bytes: sys.used_memory(),
            free_bytes: sys.free_memory(),
            usage_percent: safe_percent(total.saturating_sub(available), total),
            swap_total_bytes: sys.total_swap(),
            swap_used_bytes: sys.used_swap(),
            swap_free_bytes: sys.free_swap(),
        })
    }

    fn partitions(&self) -> Result<Vec<PartitionInfo>, CollectionError> {
        self.disks.partitions()
    }

    fn disk_usage(&self, partition: &PartitionInfo) -> Result<UsageStats, CollectionError> {
        self.disks.usage(&partition.mountpoint)
    }

    fn network_info(&self) -> Result<NetworkInfo, CollectionError> {
        let hostname = System::host_name().ok_or_else(|| {
            CollectionError::MetricsUnavailable("hostname not available".into())
        })?;
        let networks = Networks::new_with_refreshed_list();

        Ok(NetworkInfo {
            ip_address: resolve_hostname(&hostname),
            hostname,
            interfaces: collect_interfaces(&networks),
        })
    }

    fn gpus(&self) -> Result<Vec<GpuInfo>, CollectionError> {
        self.gpus.collect()
    }

    fn user_sessions(&self) -> Result<Vec<UserSession>, CollectionError> {
        self.sessions.collect()
    }

    fn connections(&self) -> Result<Vec<NetConnection>, CollectionError> {
        self.connections.collect()
    }
}
