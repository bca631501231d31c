pub mod partition_filter;
pub mod section;
pub mod selection;

pub use partition_filter::{normalize_mountpoint, PartitionFilterSpec};
pub use section::SectionId;
pub use selection::{MetricSelection, SecuritySelection};
