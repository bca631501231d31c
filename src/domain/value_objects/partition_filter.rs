use crate::domain::entities::disk::PartitionInfo;

/// Device and mountpoint constraints for the disk section.
///
/// An empty list means "no constraint" for that dimension. Mountpoints are
/// stored normalized (see [`normalize_mountpoint`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionFilterSpec {
    devices: Vec<String>,
    mountpoints: Vec<String>,
}

impl PartitionFilterSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_devices<I, S>(mut self, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.devices = devices.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_mountpoints<I, S>(mut self, mountpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.mountpoints = mountpoints
            .into_iter()
            .map(|mp| normalize_mountpoint(mp.as_ref()))
            .collect();
        self
    }

    #[must_use]
    pub fn devices(&self) -> &[String] {
        &self.devices
    }

    #[must_use]
    pub fn mountpoints(&self) -> &[String] {
        &self.mountpoints
    }

    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.devices.is_empty() && self.mountpoints.is_empty()
    }

    /// Whether a single partition passes both constraints.
    #[must_use]
    pub fn matches(&self, partition: &PartitionInfo) -> bool {
        let device_ok = self.devices.is_empty() || self.devices.contains(&partition.device);
        let mount_ok = self.mountpoints.is_empty() || {
            let normalized = normalize_mountpoint(&partition.mountpoint);
            self.mountpoints.iter().any(|mp| *mp == normalized)
        };
        device_ok && mount_ok
    }

    /// Returns the matching partitions, preserving input order.
    #[must_use]
    pub fn filter(&self, partitions: &[PartitionInfo]) -> Vec<PartitionInfo> {
        partitions
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect()
    }
}

/// Lexically normalizes a mount path and case-folds it.
///
/// Both `/` and `\` separate components. Redundant separators and `.` are
/// dropped, `..` pops the previous component (and is discarded at the root
/// of an absolute path), a trailing separator is removed and an empty
/// relative result becomes `.`. The filesystem is never consulted.
#[must_use]
pub fn normalize_mountpoint(path: &str) -> String {
    let is_separator = |c: char| c == '/' || c == '\\';
    let absolute = path.starts_with(is_separator);

    let mut parts: Vec<&str> = Vec::new();
    for component in path.split(is_separator) {
        match component {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    let normalized = if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    };
    normalized.to_lowercase()
}
