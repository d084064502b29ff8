//! Blocked-range reconciliation planner
//!
//! Pure function from (requested range, overlapping stored ranges) to the
//! rows to delete and the ranges to insert. Persistence is the caller's job.

use std::fmt;

use super::model::{BlockedRange, DateRange};

/// What the caller wants to happen to the requested dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReconcileAction {
    Block,
    Unblock,
}

impl ReconcileAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Unblock => "unblock",
        }
    }
}

impl fmt::Display for ReconcileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rows to delete and ranges to insert, both sorted by start date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    pub delete: Vec<BlockedRange>,
    pub insert: Vec<DateRange>,
}

impl ReconcilePlan {
    pub fn is_noop(&self) -> bool {
        self.delete.is_empty() && self.insert.is_empty()
    }

    pub fn deleted_ids(&self) -> Vec<i32> {
        self.delete.iter().map(|r| r.id).collect()
    }
}

/// Plan the reconciliation of `requested` against a room's stored ranges.
///
/// Every stored range overlapping `requested` is deleted and its parts
/// outside `requested` (at most one on each side) are re-inserted.
/// When blocking, `requested` itself is inserted only if no residual
/// survives: either nothing overlapped, or the overlapped ranges all lie
/// within `requested`. Unblocking never inserts `requested`.
///
/// Ranges in `stored` that do not overlap `requested` are ignored, and a
/// delete/insert pair describing the same interval cancels out. Touching
/// ranges are left as they are.
pub fn plan_reconciliation(
    action: ReconcileAction,
    requested: DateRange,
    stored: &[BlockedRange],
) -> ReconcilePlan {
    let mut delete: Vec<BlockedRange> = stored
        .iter()
        .filter(|r| r.range.overlaps(&requested))
        .cloned()
        .collect();

    let mut insert: Vec<DateRange> = delete
        .iter()
        .flat_map(|r| {
            [
                r.range.left_residual(&requested),
                r.range.right_residual(&requested),
            ]
        })
        .flatten()
        .collect();

    if action == ReconcileAction::Block && insert.is_empty() {
        insert.push(requested);
    }

    delete.retain(|existing| match insert.iter().position(|r| *r == existing.range) {
        Some(pos) => {
            insert.remove(pos);
            false
        }
        None => true,
    });

    delete.sort_by_key(|r| (r.range, r.id));
    insert.sort();

    ReconcilePlan { delete, insert }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn r(start: &str, end: &str) -> DateRange {
        DateRange::new(d(start), d(end)).unwrap()
    }

    fn stored(id: i32, start: &str, end: &str) -> BlockedRange {
        BlockedRange::new(id, 1, r(start, end))
    }

    #[test]
    fn block_on_empty_set_inserts_request() {
        let plan = plan_reconciliation(
            ReconcileAction::Block,
            r("2024-06-10", "2024-06-20"),
            &[],
        );
        assert!(plan.delete.is_empty());
        assert_eq!(plan.insert, vec![r("2024-06-10", "2024-06-20")]);
    }

    #[test]
    fn block_ignores_non_overlapping_ranges() {
        let existing = [stored(1, "2024-05-01", "2024-05-05")];
        let plan = plan_reconciliation(
            ReconcileAction::Block,
            r("2024-06-10", "2024-06-20"),
            &existing,
        );
        assert!(plan.delete.is_empty());
        assert_eq!(plan.insert, vec![r("2024-06-10", "2024-06-20")]);
    }

    #[test]
    fn block_equal_to_existing_is_noop() {
        let existing = [stored(7, "2024-06-10", "2024-06-20")];
        let plan = plan_reconciliation(
            ReconcileAction::Block,
            r("2024-06-10", "2024-06-20"),
            &existing,
        );
        assert!(plan.is_noop(), "unexpected plan: {:?}", plan);
    }

    #[test]
    fn block_strictly_inside_splits_into_two_residuals() {
        let existing = [stored(3, "2024-06-10", "2024-06-20")];
        let plan = plan_reconciliation(
            ReconcileAction::Block,
            r("2024-06-13", "2024-06-15"),
            &existing,
        );
        assert_eq!(plan.deleted_ids(), vec![3]);
        assert_eq!(
            plan.insert,
            vec![r("2024-06-10", "2024-06-12"), r("2024-06-16", "2024-06-20")]
        );
    }

    #[test]
    fn block_fully_covering_replaces_existing() {
        let existing = [stored(4, "2024-06-12", "2024-06-14")];
        let plan = plan_reconciliation(
            ReconcileAction::Block,
            r("2024-06-10", "2024-06-20"),
            &existing,
        );
        assert_eq!(plan.deleted_ids(), vec![4]);
        assert_eq!(plan.insert, vec![r("2024-06-10", "2024-06-20")]);
    }

    #[test]
    fn block_overlapping_right_edge_keeps_left_residual_only() {
        let existing = [stored(5, "2024-06-10", "2024-06-20")];
        let plan = plan_reconciliation(
            ReconcileAction::Block,
            r("2024-06-15", "2024-06-25"),
            &existing,
        );
        assert_eq!(plan.deleted_ids(), vec![5]);
        assert_eq!(plan.insert, vec![r("2024-06-10", "2024-06-14")]);
        assert!(plan.insert.iter().all(|range| range.start() <= range.end()));
    }

    #[test]
    fn block_spanning_several_ranges_keeps_outer_residuals() {
        let existing = [
            stored(1, "2024-06-01", "2024-06-05"),
            stored(2, "2024-06-08", "2024-06-12"),
            stored(3, "2024-06-15", "2024-06-18"),
        ];
        let plan = plan_reconciliation(
            ReconcileAction::Block,
            r("2024-06-04", "2024-06-16"),
            &existing,
        );
        assert_eq!(plan.deleted_ids(), vec![1, 2, 3]);
        assert_eq!(
            plan.insert,
            vec![r("2024-06-01", "2024-06-03"), r("2024-06-17", "2024-06-18")]
        );
    }

    #[test]
    fn block_covering_several_ranges_inserts_request_once() {
        let existing = [
            stored(1, "2024-06-02", "2024-06-03"),
            stored(2, "2024-06-08", "2024-06-09"),
        ];
        let plan = plan_reconciliation(
            ReconcileAction::Block,
            r("2024-06-01", "2024-06-10"),
            &existing,
        );
        assert_eq!(plan.deleted_ids(), vec![1, 2]);
        assert_eq!(plan.insert, vec![r("2024-06-01", "2024-06-10")]);
    }

    #[test]
    fn block_adjacent_to_existing_does_not_merge() {
        let existing = [stored(1, "2024-06-01", "2024-06-09")];
        let plan = plan_reconciliation(
            ReconcileAction::Block,
            r("2024-06-10", "2024-06-12"),
            &existing,
        );
        assert!(plan.delete.is_empty());
        assert_eq!(plan.insert, vec![r("2024-06-10", "2024-06-12")]);
    }

    #[test]
    fn unblock_without_overlap_is_noop() {
        let existing = [stored(1, "2024-06-01", "2024-06-09")];
        let plan = plan_reconciliation(
            ReconcileAction::Unblock,
            r("2024-06-10", "2024-06-12"),
            &existing,
        );
        assert!(plan.is_noop());
    }

    #[test]
    fn unblock_exact_range_deletes_it() {
        let existing = [stored(9, "2024-06-10", "2024-06-20")];
        let plan = plan_reconciliation(
            ReconcileAction::Unblock,
            r("2024-06-10", "2024-06-20"),
            &existing,
        );
        assert_eq!(plan.deleted_ids(), vec![9]);
        assert!(plan.insert.is_empty());
    }

    #[test]
    fn unblock_inside_leaves_both_sides_blocked() {
        let existing = [stored(9, "2024-06-10", "2024-06-20")];
        let plan = plan_reconciliation(
            ReconcileAction::Unblock,
            r("2024-06-14", "2024-06-14"),
            &existing,
        );
        assert_eq!(plan.deleted_ids(), vec![9]);
        assert_eq!(
            plan.insert,
            vec![r("2024-06-10", "2024-06-13"), r("2024-06-15", "2024-06-20")]
        );
    }

    #[test]
    fn action_display() {
        assert_eq!(ReconcileAction::Block.to_string(), "block");
        assert_eq!(ReconcileAction::Unblock.as_str(), "unblock");
    }
}
