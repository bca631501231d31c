pub mod connection_collector;
pub mod disk_collector;
pub mod gpu_collector;
pub mod session_collector;
pub mod sysinfo_source;

pub use sysinfo_source::SysinfoSource;
