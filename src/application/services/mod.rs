pub mod assembler;
pub mod dispatch;
pub mod sections;

pub use assembler::{assemble, ReportAssembler};
pub use dispatch::{dispatch_report, DispatchSummary, Envelope};
