//! Plain-text rendering of each report section.
//!
//! Every renderer returns a header line followed by `Key: value` lines
//! indented in steps of four spaces. Output ends with exactly one newline.

use std::fmt::Display;

use chrono::NaiveDateTime;

use crate::domain::entities::{
    CpuStats, GpuInfo, MemoryStats, NetConnection, NetworkInfo, OsInfo, PartitionInfo,
    UsageStats, UserSession,
};
use crate::domain::ports::metric_source::CollectionError;
use crate::domain::value_objects::section::SectionId;
use crate::domain::value_objects::selection::SecuritySelection;

const INDENT: &str = "    ";
const BYTES_PER_GB: f64 = 1_073_741_824.0;
const NETWORK_INTERFACES_TITLE: &str = "NETWORK INTERFACES";

struct SectionWriter {
    buf: String,
}

impl SectionWriter {
    fn new(title: &str) -> Self {
        let mut buf = String::with_capacity(256);
        buf.push_str(title);
        buf.push('\n');
        Self { buf }
    }

    fn field(&mut self, depth: usize, key: &str, value: impl Display) {
        self.buf
            .push_str(&format!("{}{key}: {value}\n", INDENT.repeat(depth)));
    }

    fn line(&mut self, depth: usize, text: &str) {
        self.buf.push_str(&format!("{}{text}\n", INDENT.repeat(depth)));
    }

    /// Adds a separating blank line, never two in a row.
    fn blank(&mut self) {
        if !self.buf.ends_with("\n\n") {
            self.buf.push('\n');
        }
    }

    fn finish(mut self) -> String {
        while self.buf.ends_with("\n\n") {
            self.buf.pop();
        }
        self.buf
    }
}

#[allow(clippy::cast_precision_loss)]
fn gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// Formats a duration as `"<days> days, HH:MM"`.
#[must_use]
pub fn format_duration(total_secs: u64) -> String {
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    format!("{days} days, {hours:02}:{minutes:02}")
}

/// Section body used when its metric source failed.
#[must_use]
pub fn unavailable(id: SectionId, err: &CollectionError) -> String {
    let mut w = SectionWriter::new(id.title());
    w.field(1, "Not available", err);
    w.finish()
}

#[must_use]
pub fn os(info: &OsInfo) -> String {
    let mut w = SectionWriter::new(SectionId::Os.title());
    w.field(1, "System", &info.system);
    w.field(1, "Release", &info.release);
    w.field(1, "Version", &info.version);
    w.field(1, "Machine", &info.machine);
    w.field(1, "Processor", &info.processor);
    w.field(1, "Uptime", format_duration(info.uptime_secs));
    w.finish()
}

#[must_use]
pub fn cpu(stats: &CpuStats) -> String {
    let mut w = SectionWriter::new(SectionId::Cpu.title());
    #[allow(clippy::cast_precision_loss)]
    let freq = stats.frequency_mhz as f64;
    w.field(1, "Frequency", format!("{freq:.2} MHz"));
    w.field(
        1,
        "CPU Usage (at runtime)",
        format!("{:.1}%", stats.usage_percent),
    );
    match stats.physical_cores {
        Some(n) => w.field(1, "Number of CPUs (physical)", n),
        None => w.field(1, "Number of CPUs (physical)", "unknown"),
    }
    w.field(1, "Number of CPUs (logical)", stats.logical_cores);
    w.field(1, "Number of Running Processes", stats.process_count);
    w.finish()
}

#[must_use]
pub fn memory(stats: &MemoryStats) -> String {
    let mut w = SectionWriter::new(SectionId::Memory.title());
    w.field(1, "Total Memory", format!("{:.2} GB", gb(stats.total_bytes)));
    w.field(
        1,
        "Available Memory",
        format!("{:.2} GB", gb(stats.available_bytes)),
    );
    w.field(1, "Used Memory", format!("{:.2} GB", gb(stats.used_bytes)));
    w.field(1, "Free Memory", format!("{:.2} GB", gb(stats.free_bytes)));
    w.field(
        1,
        "Cached Memory",
        format!("{:.2} GB", gb(stats.cached_bytes())),
    );
    w.field(1, "Memory Usage", format!("{:.1}%", stats.usage_percent));
    w.line(1, "Swap Space:");
    w.field(2, "Total", format!("{:.2} GB", gb(stats.swap_total_bytes)));
    w.field(2, "Used", format!("{:.2} GB", gb(stats.swap_used_bytes)));
    w.field(2, "Free", format!("{:.2} GB", gb(stats.swap_free_bytes)));
    w.finish()
}

/// Renders one block per partition, in the order given.
#[must_use]
pub fn disk(entries: &[(PartitionInfo, Result<UsageStats, CollectionError>)]) -> String {
    let mut w = SectionWriter::new(SectionId::Disk.title());
    if entries.is_empty() {
        w.line(1, "No matching partitions");
    }
    for (partition, usage) in entries {
        w.field(1, "Partition", &partition.device);
        w.field(2, "Mountpoint", &partition.mountpoint);
        w.field(2, "File System", &partition.filesystem_type);
        match usage {
            Ok(usage) => {
                w.field(2, "Total", format!("{:.2} GB", gb(usage.total_bytes)));
                w.field(2, "Used", format!("{:.2} GB", gb(usage.used_bytes)));
                w.field(2, "Free", format!("{:.2} GB", gb(usage.free_bytes)));
                w.field(2, "Percent Used", format!("{:.2}%", usage.percent_used));
                w.field(2, "Percent Free", format!("{:.2}%", usage.percent_free()));
            }
            Err(e) => w.field(2, "Not available", e),
        }
        w.blank();
    }
    w.finish()
}

#[must_use]
pub fn network(info: &NetworkInfo) -> String {
    let mut w = SectionWriter::new(SectionId::Network.title());
    w.field(1, "Hostname", &info.hostname);
    match info.ip_address {
        Some(ip) => w.field(1, "IP Address", ip),
        None => w.field(1, "IP Address", "unknown"),
    }
    w.blank();
    w.line(0, NETWORK_INTERFACES_TITLE);
    for iface in &info.interfaces {
        w.field(1, "Interface", &iface.name);
        for addr in &iface.addresses {
            if addr.address.is_ipv4() {
                w.field(2, "IP Address", addr.address);
                w.field(2, "Netmask", addr.netmask());
                if let Some(broadcast) = addr.broadcast() {
                    w.field(2, "Broadcast IP", broadcast);
                }
            } else {
                w.field(2, "IP Address (IPv6)", addr.address);
                w.field(2, "Netmask (IPv6)", addr.netmask());
            }
        }
        if let Some(ref mac) = iface.mac_address {
            w.field(2, "MAC Address", mac);
        }
        w.blank();
    }
    w.finish()
}

#[must_use]
pub fn gpu(gpus: &[GpuInfo]) -> String {
    let mut w = SectionWriter::new(SectionId::Gpu.title());
    if gpus.is_empty() {
        w.line(1, "No GPUs found");
    }
    for (idx, gpu) in gpus.iter().enumerate() {
        w.line(1, &format!("GPU {}:", idx + 1));
        w.field(2, "Name", &gpu.name);
        w.field(2, "UUID", &gpu.uuid);
        w.field(2, "Load", format!("{:.2}%", gpu.load_percent));
        w.line(2, "Memory Usage:");
        w.field(3, "Total", format!("{:.2} GB", gb(gpu.memory_total_bytes)));
        w.field(3, "Used", format!("{:.2} GB", gb(gpu.memory_used_bytes)));
        w.field(3, "Free", format!("{:.2} GB", gb(gpu.memory_free_bytes)));
        match gpu.temperature_celsius {
            Some(t) => w.field(2, "Temperature", format!("{t:.2} °C")),
            None => w.field(2, "Temperature", "unknown"),
        }
        w.blank();
    }
    w.finish()
}

/// Renders the security section.
///
/// `sessions` and `connections` are `None` when their block is not selected;
/// `now` is the reference time for session durations.
#[must_use]
pub fn security(
    selection: SecuritySelection,
    sessions: Option<&Result<Vec<UserSession>, CollectionError>>,
    connections: Option<&Result<Vec<NetConnection>, CollectionError>>,
    now: NaiveDateTime,
) -> String {
    let mut w = SectionWriter::new(SectionId::Security.title());

    if selection.user_accounts {
        w.line(1, "Connected User Accounts:");
        match sessions {
            Some(Ok(sessions)) if sessions.is_empty() => w.line(2, "None"),
            Some(Ok(sessions)) => {
                for session in sessions {
                    write_session(&mut w, session, now);
                    w.blank();
                }
            }
            Some(Err(e)) => w.field(2, "Not available", e),
            None => {}
        }
        w.blank();
    }

    if selection.connections {
        w.line(1, "Active Network Connections:");
        match connections {
            Some(Ok(conns)) if conns.is_empty() => w.line(2, "None"),
            Some(Ok(conns)) => {
                for conn in conns {
                    write_connection(&mut w, conn);
                    w.blank();
                }
            }
            Some(Err(e)) => w.field(2, "Not available", e),
            None => {}
        }
    }

    w.finish()
}

fn write_session(w: &mut SectionWriter, session: &UserSession, now: NaiveDateTime) {
    w.field(2, "Username", &session.name);
    w.field(2, "Terminal", &session.terminal);
    w.field(2, "Hostname", session.host.as_deref().unwrap_or("local"));
    match session.started {
        Some(started) => {
            let secs = u64::try_from((now - started).num_seconds()).unwrap_or(0);
            w.field(2, "Session Duration", format_duration(secs));
        }
        None => w.field(2, "Session Duration", "unknown"),
    }
}

fn write_connection(w: &mut SectionWriter, conn: &NetConnection) {
    w.field(2, "Protocol", conn.protocol);
    w.field(2, "Local Address", conn.local);
    match conn.remote {
        Some(remote) => w.field(2, "Remote Address", remote),
        None => w.field(2, "Remote Address", "-"),
    }
    w.field(2, "Status", &conn.status);
}
