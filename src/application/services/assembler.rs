use chrono::{Local, NaiveDateTime};
use tracing::{debug, warn};

use super::sections;
use crate::domain::entities::{PartitionInfo, Report, ReportSection, UsageStats};
use crate::domain::ports::metric_source::{CollectionError, MetricSource};
use crate::domain::value_objects::partition_filter::PartitionFilterSpec;
use crate::domain::value_objects::section::SectionId;
use crate::domain::value_objects::selection::MetricSelection;

/// Builds reports by pulling each selected section from a [`MetricSource`].
///
/// A failing source call degrades its own section to a "Not available"
/// placeholder; it never aborts the report.
pub struct ReportAssembler<'a> {
    source: &'a dyn MetricSource,
}

impl<'a> ReportAssembler<'a> {
    #[must_use]
    pub fn new(source: &'a dyn MetricSource) -> Self {
        Self { source }
    }

    /// Assembles the selected sections in canonical order.
    #[must_use]
    pub fn assemble(&self, selection: &MetricSelection, filter: &PartitionFilterSpec) -> Report {
        self.assemble_at(selection, filter, Local::now().naive_local())
    }

    /// Same as [`assemble`](Self::assemble) with an explicit reference time
    /// for session durations.
    #[must_use]
    pub fn assemble_at(
        &self,
        selection: &MetricSelection,
        filter: &PartitionFilterSpec,
        now: NaiveDateTime,
    ) -> Report {
        let sections = selection
            .iter()
            .map(|id| {
                debug!("Rendering section {id}");
                ReportSection {
                    id,
                    text: self.render(id, selection, filter, now),
                }
            })
            .collect();
        Report::new(sections)
    }

    fn render(
        &self,
        id: SectionId,
        selection: &MetricSelection,
        filter: &PartitionFilterSpec,
        now: NaiveDateTime,
    ) -> String {
        let rendered = match id {
            SectionId::Os => self.source.os_info().map(|info| sections::os(&info)),
            SectionId::Cpu => self.source.cpu_stats().map(|stats| sections::cpu(&stats)),
            SectionId::Security => Ok(self.render_security(selection, now)),
            SectionId::Memory => self
                .source
                .memory_stats()
                .map(|stats| sections::memory(&stats)),
            SectionId::Disk => self
                .disk_entries(filter)
                .map(|entries| sections::disk(&entries)),
            SectionId::Network => self.source.network_info().map(|info| sections::network(&info)),
            SectionId::Gpu => self.source.gpus().map(|gpus| sections::gpu(&gpus)),
        };

        rendered.unwrap_or_else(|e| {
            warn!("Section {id} unavailable: {e}");
            sections::unavailable(id, &e)
        })
    }

    fn render_security(&self, selection: &MetricSelection, now: NaiveDateTime) -> String {
        let wanted = selection.security();
        let sessions = wanted.user_accounts.then(|| self.source.user_sessions());
        let connections = wanted.connections.then(|| self.source.connections());

        if let Some(Err(ref e)) = sessions {
            warn!("User sessions unavailable: {e}");
        }
        if let Some(Err(ref e)) = connections {
            warn!("Network connections unavailable: {e}");
        }

        sections::security(wanted, sessions.as_ref(), connections.as_ref(), now)
    }

    fn disk_entries(
        &self,
        filter: &PartitionFilterSpec,
    ) -> Result<Vec<(PartitionInfo, Result<UsageStats, CollectionError>)>, CollectionError> {
        let partitions = self.source.partitions()?;
        let selected = filter.filter(&partitions);
        debug!(
            "{} of {} partitions match the filter",
            selected.len(),
            partitions.len()
        );

        Ok(selected
            .into_iter()
            .map(|partition| {
                let usage = self.source.disk_usage(&partition);
                if let Err(ref e) = usage {
                    warn!("Usage unavailable for {}: {e}", partition.mountpoint);
                }
                (partition, usage)
            })
            .collect())
    }
}

/// Convenience wrapper around [`ReportAssembler::assemble`].
#[must_use]
pub fn assemble(
    selection: &MetricSelection,
    filter: &PartitionFilterSpec,
    source: &dyn MetricSource,
) -> Report {
    ReportAssembler::new(source).assemble(selection, filter)
}
