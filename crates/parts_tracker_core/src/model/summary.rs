//! Aggregated counts and percentage breakdowns for suppliers and projects.

use crate::model::count::Count;
use crate::model::id::SupplierId;
use crate::model::project::Project;
use serde::Serialize;

/// Line-item totals summed over one supplier's projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SupplierTotals {
    pub total: u64,
    pub received: u64,
    pub pending: u64,
}

impl SupplierTotals {
    /// Sums the counts of `projects`.
    pub fn from_projects<'a>(projects: impl IntoIterator<Item = &'a Project>) -> Self {
        let (total, received) = projects.into_iter().fold((0_u64, 0_u64), |(t, r), p| {
            (
                t + u64::from(p.total_line_items()),
                r + u64::from(p.received()),
            )
        });
        Self {
            total,
            received,
            pending: total - received,
        }
    }

    pub fn received_pct(&self) -> u32 {
        percent_of(self.received, self.total)
    }

    pub fn pending_pct(&self) -> u32 {
        percent_of(self.pending, self.total)
    }
}

/// Dashboard line for one supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplierSummary {
    pub supplier_id: SupplierId,
    pub name: String,
    pub totals: SupplierTotals,
    pub received_pct: u32,
    pub pending_pct: u32,
}

/// Per-project breakdown shown next to the editable counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectProgress {
    pub total: Count,
    pub received: Count,
    pub pending: Count,
    pub received_pct: u32,
    pub pending_pct: u32,
}

impl From<&Project> for ProjectProgress {
    fn from(project: &Project) -> Self {
        let total = project.total_line_items();
        let received = project.received();
        let pending = project.pending();
        Self {
            total,
            received,
            pending,
            received_pct: percent_of(u64::from(received), u64::from(total)),
            pending_pct: percent_of(u64::from(pending), u64::from(total)),
        }
    }
}

/// Rounded share of `part` in `whole`; `0` when `whole` is zero.
pub fn percent_of(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    // Half-way values round up.
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::{percent_of, ProjectProgress, SupplierTotals};
    use crate::model::project::Project;

    #[test]
    fn percent_of_rounds_half_up_and_handles_zero() {
        assert_eq!(percent_of(0, 0), 0);
        assert_eq!(percent_of(1, 8), 13);
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 67);
        assert_eq!(percent_of(5, 5), 100);
    }

    #[test]
    fn totals_sum_across_projects() {
        let projects = [
            Project::with_counts("a", "s", "A", "Alpha", 10, 4),
            Project::with_counts("b", "s", "B", "Beta", 5, 5),
        ];
        let totals = SupplierTotals::from_projects(&projects);
        assert_eq!(
            totals,
            SupplierTotals {
                total: 15,
                received: 9,
                pending: 6
            }
        );
        assert_eq!(totals.received_pct(), 60);
        assert_eq!(totals.pending_pct(), 40);
    }

    #[test]
    fn project_progress_reports_pending_share() {
        let project = Project::with_counts("a", "s", "A", "Alpha", 4, 1);
        let progress = ProjectProgress::from(&project);
        assert_eq!(progress.pending, 3);
        assert_eq!(progress.received_pct, 25);
        assert_eq!(progress.pending_pct, 75);
    }
}
