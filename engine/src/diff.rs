//! Line diff classification for the side-by-side viewer.
//!
//! The diff itself is computed upstream. This module consumes the resulting
//! line sequences and derives statistics, filtered views and the positions
//! the navigator jumps between.

use crate::{error, navigator::ChangeNavigator, Error};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, Deref};

/// Classification of one diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffLineType {
    Equal,
    Delete,
    Insert,
    Replace,
    /// Padding where the other side has no corresponding line
    Empty,
}

impl DiffLineType {
    pub fn is_change(self) -> bool {
        self != DiffLineType::Equal
    }
}

/// One line of one side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    #[serde(rename = "type")]
    pub kind: DiffLineType,
    /// Absent for padding lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    #[serde(default)]
    pub content: String,
}

impl DiffLine {
    pub fn new(kind: DiffLineType, line_number: Option<u32>, content: impl Into<String>) -> Self {
        Self {
            kind,
            line_number,
            content: content.into(),
        }
    }

    pub fn equal(line_number: u32, content: impl Into<String>) -> Self {
        Self::new(DiffLineType::Equal, Some(line_number), content)
    }

    pub fn delete(line_number: u32, content: impl Into<String>) -> Self {
        Self::new(DiffLineType::Delete, Some(line_number), content)
    }

    pub fn insert(line_number: u32, content: impl Into<String>) -> Self {
        Self::new(DiffLineType::Insert, Some(line_number), content)
    }

    pub fn replace(line_number: u32, content: impl Into<String>) -> Self {
        Self::new(DiffLineType::Replace, Some(line_number), content)
    }

    /// A padding line.
    pub fn empty() -> Self {
        Self::new(DiffLineType::Empty, None, "")
    }

    pub fn is_change(&self) -> bool {
        self.kind.is_change()
    }
}

/// Change counts over a line sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
    pub changes: usize,
    pub total: usize,
}

impl DiffStats {
    pub fn new(additions: usize, deletions: usize, changes: usize) -> Self {
        Self {
            additions,
            deletions,
            changes,
            total: additions + deletions + changes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl Add for DiffStats {
    type Output = DiffStats;

    fn add(self, other: DiffStats) -> DiffStats {
        DiffStats::new(
            self.additions + other.additions,
            self.deletions + other.deletions,
            self.changes + other.changes,
        )
    }
}

impl Sum for DiffStats {
    fn sum<I: Iterator<Item = DiffStats>>(iter: I) -> Self {
        iter.fold(DiffStats::default(), Add::add)
    }
}

/// A line paired with its position in the unfiltered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedLine {
    pub index: usize,
    #[serde(flatten)]
    pub line: DiffLine,
}

impl Deref for IndexedLine {
    type Target = DiffLine;

    fn deref(&self) -> &DiffLine {
        &self.line
    }
}

/// Tally insertions, deletions and replacements in one pass.
pub fn compute_stats(lines: &[DiffLine]) -> DiffStats {
    let (mut additions, mut deletions, mut changes) = (0, 0, 0);

    for line in lines {
        match line.kind {
            DiffLineType::Insert => additions += 1,
            DiffLineType::Delete => deletions += 1,
            DiffLineType::Replace => changes += 1,
            DiffLineType::Equal | DiffLineType::Empty => {}
        }
    }

    DiffStats::new(additions, deletions, changes)
}

/// All lines when `hide` is false, otherwise only changed lines.
///
/// Relative order is kept and every entry carries its original index.
pub fn filter_unchanged(lines: &[DiffLine], hide: bool) -> Vec<IndexedLine> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !hide || line.is_change())
        .map(|(index, line)| IndexedLine {
            index,
            line: line.clone(),
        })
        .collect()
}

/// Indices of all lines that are not `equal`, strictly increasing.
pub fn find_change_sections(lines: &[DiffLine]) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.is_change())
        .map(|(index, _)| index)
        .collect()
}

/// One aligned row of a side-by-side diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffRow {
    pub index: usize,
    pub left: DiffLine,
    pub right: DiffLine,
}

impl DiffRow {
    pub fn is_change(&self) -> bool {
        self.left.is_change() || self.right.is_change()
    }
}

/// Two parallel line sequences from the upstream diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideBySideDiff {
    left: Vec<DiffLine>,
    right: Vec<DiffLine>,
}

impl SideBySideDiff {
    /// Pair the two sides, rejecting sequences of different length.
    pub fn new(left: Vec<DiffLine>, right: Vec<DiffLine>) -> error::Result<Self> {
        if left.len() != right.len() {
            return Err(Error::MalformedDiff {
                left: left.len(),
                right: right.len(),
            });
        }
        Ok(Self { left, right })
    }

    pub fn left(&self) -> &[DiffLine] {
        &self.left
    }

    pub fn right(&self) -> &[DiffLine] {
        &self.right
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Deletions come from the left column, additions from the right, and a
    /// row counts as one change when either column is a replacement.
    pub fn stats(&self) -> DiffStats {
        let deletions = compute_stats(&self.left).deletions;
        let additions = compute_stats(&self.right).additions;
        let changes = self
            .left
            .iter()
            .zip(&self.right)
            .filter(|(l, r)| l.kind == DiffLineType::Replace || r.kind == DiffLineType::Replace)
            .count();

        DiffStats::new(additions, deletions, changes)
    }

    /// Rows where either column is not `equal`.
    pub fn change_sections(&self) -> Vec<usize> {
        self.left
            .iter()
            .zip(&self.right)
            .enumerate()
            .filter(|(_, (l, r))| l.is_change() || r.is_change())
            .map(|(index, _)| index)
            .collect()
    }

    /// Aligned rows; with `hide_unchanged` only rows that changed on either side.
    pub fn rows(&self, hide_unchanged: bool) -> Vec<DiffRow> {
        self.left
            .iter()
            .zip(&self.right)
            .enumerate()
            .map(|(index, (left, right))| DiffRow {
                index,
                left: left.clone(),
                right: right.clone(),
            })
            .filter(|row| !hide_unchanged || row.is_change())
            .collect()
    }

    /// A navigator over this diff's change sections.
    pub fn navigator(&self) -> ChangeNavigator {
        ChangeNavigator::new(self.change_sections())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kinds(kinds: &[DiffLineType]) -> Vec<DiffLine> {
        kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| DiffLine::new(*kind, Some(i as u32 + 1), format!("line {}", i)))
            .collect()
    }

    use DiffLineType::*;

    #[test]
    fn stats_empty() {
        assert_eq!(compute_stats(&[]), DiffStats::default());
        assert!(compute_stats(&[]).is_empty());
    }

    #[test]
    fn stats_and_sections_scenario() {
        let lines = kinds(&[Equal, Delete, Insert, Equal]);

        assert_eq!(
            compute_stats(&lines),
            DiffStats {
                additions: 1,
                deletions: 1,
                changes: 0,
                total: 2,
            }
        );
        assert_eq!(find_change_sections(&lines), vec![1, 2]);
    }

    #[test]
    fn stats_ignore_padding() {
        let lines = kinds(&[Empty, Replace, Replace, Empty, Equal]);
        assert_eq!(compute_stats(&lines), DiffStats::new(0, 0, 2));
        // Padding still counts as a change section
        assert_eq!(find_change_sections(&lines), vec![0, 1, 2, 3]);
    }

    #[test]
    fn filter_keeps_everything_when_not_hiding() {
        let lines = kinds(&[Equal, Insert, Equal]);
        let filtered = filter_unchanged(&lines, false);

        assert_eq!(filtered.len(), 3);
        let unwrapped: Vec<DiffLine> = filtered.into_iter().map(|l| l.line).collect();
        assert_eq!(unwrapped, lines);
    }

    #[test]
    fn filter_hides_equal_and_keeps_indices() {
        let lines = kinds(&[Equal, Insert, Equal, Delete, Equal]);
        let filtered = filter_unchanged(&lines, true);

        let indices: Vec<_> = filtered.iter().map(|l| l.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert!(filtered.iter().all(|l| l.kind != Equal));
        assert_eq!(filtered[0].content, "line 1");
    }

    #[test]
    fn side_by_side_rejects_mismatched_lengths() {
        let err = SideBySideDiff::new(kinds(&[Equal, Equal]), kinds(&[Equal])).unwrap_err();
        assert_eq!(err, Error::MalformedDiff { left: 2, right: 1 });
    }

    #[test]
    fn side_by_side_stats() {
        let left = vec![
            DiffLine::equal(1, "hostname r1"),
            DiffLine::delete(2, "ntp server 10.0.0.1"),
            DiffLine::empty(),
            DiffLine::replace(3, "mtu 1500"),
        ];
        let right = vec![
            DiffLine::equal(1, "hostname r1"),
            DiffLine::empty(),
            DiffLine::insert(2, "logging host 10.0.0.9"),
            DiffLine::replace(3, "mtu 9000"),
        ];
        let diff = SideBySideDiff::new(left, right).unwrap();

        assert_eq!(diff.stats(), DiffStats::new(1, 1, 1));
        assert_eq!(diff.change_sections(), vec![1, 2, 3]);
        assert_eq!(diff.len(), 4);
        assert!(!diff.is_empty());

        let rows = diff.rows(true);
        let indices: Vec<_> = rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(diff.rows(false).len(), 4);

        let mut nav = diff.navigator();
        assert_eq!(nav.first(), Some(1));
    }

    #[test]
    fn diff_line_json_shape() {
        let line: DiffLine =
            serde_json::from_value(json!({"type": "insert", "lineNumber": 7, "content": "x"}))
                .unwrap();
        assert_eq!(line, DiffLine::insert(7, "x"));

        let padding: DiffLine = serde_json::from_value(json!({"type": "empty"})).unwrap();
        assert_eq!(padding, DiffLine::empty());
        assert_eq!(
            serde_json::to_value(&padding).unwrap(),
            json!({"type": "empty", "content": ""})
        );
    }

    #[test]
    fn indexed_line_flattens() {
        let filtered = filter_unchanged(&[DiffLine::delete(3, "gone")], true);
        assert_eq!(
            serde_json::to_value(&filtered[0]).unwrap(),
            json!({"index": 0, "type": "delete", "lineNumber": 3, "content": "gone"})
        );
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_kind() -> impl Strategy<Value = DiffLineType> {
            prop_oneof![
                Just(Equal),
                Just(Delete),
                Just(Insert),
                Just(Replace),
                Just(Empty),
            ]
        }

        fn arb_lines() -> impl Strategy<Value = Vec<DiffLine>> {
            prop::collection::vec(arb_kind(), 0..40).prop_map(|k| kinds(&k))
        }

        proptest! {
            #[test]
            fn prop_stats_additive(a in arb_lines(), b in arb_lines()) {
                let mut joined = a.clone();
                joined.extend(b.iter().cloned());
                prop_assert_eq!(compute_stats(&joined), compute_stats(&a) + compute_stats(&b));
            }

            #[test]
            fn prop_filter_is_subsequence_without_equal(lines in arb_lines()) {
                prop_assert_eq!(filter_unchanged(&lines, false).len(), lines.len());

                let filtered = filter_unchanged(&lines, true);
                prop_assert!(filtered.iter().all(|l| l.kind != Equal));
                prop_assert!(filtered.windows(2).all(|w| w[0].index < w[1].index));
                for entry in &filtered {
                    prop_assert_eq!(&lines[entry.index], &entry.line);
                }
            }

            #[test]
            fn prop_sections_match_filter(lines in arb_lines()) {
                let sections = find_change_sections(&lines);
                let filtered: Vec<_> = filter_unchanged(&lines, true).iter().map(|l| l.index).collect();
                prop_assert_eq!(sections, filtered);
            }
        }
    }
}
