use serde::{Deserialize, Serialize};

/// One report section, in canonical report order.
///
/// The derived `Ord` follows declaration order, which is the order sections
/// appear in the final report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionId {
    Os,
    Cpu,
    Security,
    Memory,
    Disk,
    Network,
    Gpu,
}

impl SectionId {
    /// Every section in canonical order.
    pub const ALL: [Self; 7] = [
        Self::Os,
        Self::Cpu,
        Self::Security,
        Self::Memory,
        Self::Disk,
        Self::Network,
        Self::Gpu,
    ];

    /// Identifier used in the `--metrics` selector string.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Os => "os",
            Self::Cpu => "cpu",
            Self::Security => "sec",
            Self::Memory => "mem",
            Self::Disk => "dsk",
            Self::Network => "net",
            Self::Gpu => "gpu",
        }
    }

    /// Header line of the rendered section.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Os => "OPERATING SYSTEM INFORMATION",
            Self::Cpu => "CPU STATISTICS",
            Self::Security => "SYSTEM SECURITY",
            Self::Memory => "MEMORY STATISTICS",
            Self::Disk => "DISK STATISTICS",
            Self::Network => "HOST INFORMATION",
            Self::Gpu => "GPU INFORMATION",
        }
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
