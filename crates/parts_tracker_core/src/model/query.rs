//! Project list filtering for the supplier detail view.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::model::project::Project;

/// Receipt-status filter applied to a supplier's project list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// Every project.
    #[default]
    All,
    /// Projects with at least one received line item.
    Received,
    /// Projects with at least one line item still outstanding.
    Pending,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Received => "received",
            Self::Pending => "pending",
        }
    }

    pub fn matches(&self, project: &Project) -> bool {
        match self {
            Self::All => true,
            Self::Received => project.received() > 0,
            Self::Pending => project.pending() > 0,
        }
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a filter name other than `all|received|pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatusFilter(pub String);

impl Display for UnknownStatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown status filter `{}`; expected all|received|pending",
            self.0
        )
    }
}

impl Error for UnknownStatusFilter {}

impl FromStr for StatusFilter {
    type Err = UnknownStatusFilter;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "received" => Ok(Self::Received),
            "pending" => Ok(Self::Pending),
            other => Err(UnknownStatusFilter(other.to_string())),
        }
    }
}

/// Search text plus status filter for one supplier's project list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    /// Matched case-insensitively against code and name. Blank matches all.
    pub search: String,
    pub status: StatusFilter,
}

impl ProjectQuery {
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }

    /// Applies the query to `projects`, keeping their order.
    pub fn apply<'a>(&self, projects: impl IntoIterator<Item = &'a Project>) -> Vec<&'a Project> {
        let needle = self.search.trim().to_lowercase();
        projects
            .into_iter()
            .filter(|project| needle.is_empty() || project.matches_text(&needle))
            .filter(|project| self.status.matches(project))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectQuery, StatusFilter};
    use crate::model::project::Project;

    fn sample() -> Vec<Project> {
        vec![
            Project::with_counts("a", "s", "ALPHA-1", "Bracket", 4, 0),
            Project::with_counts("b", "s", "BETA-2", "Hinge", 3, 3),
            Project::with_counts("c", "s", "GAMMA-3", "Alpha Mount", 5, 2),
        ]
    }

    fn ids(projects: Vec<&Project>) -> Vec<&str> {
        projects.into_iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn search_matches_code_or_name_case_insensitively() {
        let projects = sample();
        let query = ProjectQuery::new("  alpha ", StatusFilter::All);
        assert_eq!(ids(query.apply(&projects)), vec!["a", "c"]);
    }

    #[test]
    fn status_filters_select_received_and_pending() {
        let projects = sample();
        let received = ProjectQuery::new("", StatusFilter::Received);
        assert_eq!(ids(received.apply(&projects)), vec!["b", "c"]);
        let pending = ProjectQuery::new("", StatusFilter::Pending);
        assert_eq!(ids(pending.apply(&projects)), vec!["a", "c"]);
    }

    #[test]
    fn filter_names_parse_and_reject_unknown_values() {
        assert_eq!("Pending".parse::<StatusFilter>(), Ok(StatusFilter::Pending));
        assert!("done".parse::<StatusFilter>().is_err());
        assert_eq!(
            "done".parse::<StatusFilter>().unwrap_or_default(),
            StatusFilter::All
        );
    }
}
