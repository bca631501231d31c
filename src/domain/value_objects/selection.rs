use std::collections::BTreeSet;

use super::section::SectionId;

const USER_ACCOUNTS_KEY: &str = "cua";
const CONNECTIONS_KEY: &str = "anc";

/// Which blocks of the security section are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecuritySelection {
    pub user_accounts: bool,
    pub connections: bool,
}

impl SecuritySelection {
    #[must_use]
    pub const fn all() -> Self {
        Self {
            user_accounts: true,
            connections: true,
        }
    }

    #[must_use]
    pub const fn none() -> Self {
        Self {
            user_accounts: false,
            connections: false,
        }
    }
}

/// Sections enabled for one report, always iterated in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSelection {
    sections: BTreeSet<SectionId>,
    security: SecuritySelection,
}

impl Default for MetricSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl MetricSelection {
    /// Every section, with both security blocks.
    #[must_use]
    pub fn all() -> Self {
        Self {
            sections: SectionId::ALL.into_iter().collect(),
            security: SecuritySelection::all(),
        }
    }

    /// Parses a comma-separated selector such as `"cpu,mem,sec:cua"`.
    ///
    /// A missing or blank selector enables everything. Otherwise a section is
    /// enabled when its key occurs anywhere in the lower-cased selector, so
    /// `"hosts"` enables `os`. Unknown names are ignored.
    ///
    /// The first token containing `sec` picks the security blocks: exactly
    /// `sec` enables both, `sec:cua` / `sec:anc` / `sec:cua:anc` enable the
    /// named ones only.
    #[must_use]
    pub fn parse(selector: Option<&str>) -> Self {
        let Some(raw) = selector.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::all();
        };
        let lowered = raw.to_lowercase();

        let sections: BTreeSet<SectionId> = SectionId::ALL
            .into_iter()
            .filter(|id| lowered.contains(id.key()))
            .collect();

        let security = if sections.contains(&SectionId::Security) {
            parse_security(&lowered)
        } else {
            SecuritySelection::none()
        };

        Self { sections, security }
    }

    #[must_use]
    pub fn contains(&self, id: SectionId) -> bool {
        self.sections.contains(&id)
    }

    /// Enabled sections in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.sections.iter().copied()
    }

    #[must_use]
    pub fn sections(&self) -> Vec<SectionId> {
        self.iter().collect()
    }

    #[must_use]
    pub const fn security(&self) -> SecuritySelection {
        self.security
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn parse_security(lowered: &str) -> SecuritySelection {
    let key = SectionId::Security.key();
    let Some(token) = lowered
        .split(',')
        .map(str::trim)
        .find(|token| token.contains(key))
    else {
        return SecuritySelection::none();
    };

    if token == key {
        return SecuritySelection::all();
    }

    let sub_metrics: Vec<&str> = token
        .split(':')
        .map(str::trim)
        .filter(|part| *part != key)
        .collect();

    SecuritySelection {
        user_accounts: sub_metrics.contains(&USER_ACCOUNTS_KEY),
        connections: sub_metrics.contains(&CONNECTIONS_KEY),
    }
}
