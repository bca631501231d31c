use std::fmt;

use crate::domain::value_objects::section::SectionId;

/// One rendered block of the report.
///
/// `text` ends with a single newline and never with a blank line; the
/// separating blank line is added by [`Report::text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub id: SectionId,
    pub text: String,
}

/// Ordered sections making up one report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    sections: Vec<ReportSection>,
}

impl Report {
    #[must_use]
    pub const fn new(sections: Vec<ReportSection>) -> Self {
        Self { sections }
    }

    #[must_use]
    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, id: SectionId) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Concatenates every section, each followed by one blank line.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str(&section.text);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
