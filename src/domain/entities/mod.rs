pub mod disk;
pub mod gpu;
pub mod network;
pub mod report;
pub mod security;
pub mod system;

pub use disk::{PartitionInfo, UsageStats};
pub use gpu::GpuInfo;
pub use network::{InterfaceAddress, NetworkInfo, NetworkInterface};
pub use report::{Report, ReportSection};
pub use security::{NetConnection, Protocol, UserSession};
pub use system::{CpuStats, MemoryStats, OsInfo};
