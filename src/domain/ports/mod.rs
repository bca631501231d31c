pub mod mailer;
pub mod metric_source;

pub use mailer::{DispatchError, Mailer, OutgoingMail};
pub use metric_source::{CollectionError, MetricSource};
