//! Merged-range resolution.
//!
//! Each merged range gets a dense id; every cell inside a range resolves
//! to it through a single coalesced `(col, row)` map.

use std::collections::HashMap;

use crate::cell_ref::{parse_cell_range, CellNumbers, CellRangeNumbers};

/// Index of merged ranges for one worksheet.
#[derive(Debug, Clone, Default)]
pub struct MergeIndex {
    by_cell: HashMap<(u32, u32), usize>,
    ranges: Vec<CellRangeNumbers>,
}

impl MergeIndex {
    /// Build from textual range references in workbook order. Malformed
    /// references are skipped.
    pub fn build<S: AsRef<str>>(merges: &[S]) -> Self {
        let mut index = MergeIndex::default();
        for merge_ref in merges {
            let Some(range) = parse_cell_range(merge_ref.as_ref()) else {
                log::debug!("skipping malformed merge reference {:?}", merge_ref.as_ref());
                continue;
            };
            let merge_id = index.ranges.len();
            index.ranges.push(range);
            for col in range.start.col..=range.end.col {
                for row in range.start.row..=range.end.row {
                    index.by_cell.insert((col, row), merge_id);
                }
            }
        }
        index
    }

    /// The merged range containing `cell`, or `None` for unmerged cells.
    pub fn merge_range(&self, cell: CellNumbers) -> Option<&CellRangeNumbers> {
        let merge_id = self.by_cell.get(&(cell.col, cell.row))?;
        self.ranges.get(*merge_id)
    }

    /// Whether `cell` belongs to any merged range.
    pub fn is_merged(&self, cell: CellNumbers) -> bool {
        self.by_cell.contains_key(&(cell.col, cell.row))
    }

    /// All merged ranges in workbook order.
    pub fn ranges(&self) -> &[CellRangeNumbers] {
        &self.ranges
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_every_covered_cell_resolves() {
        let index = MergeIndex::build(&["A1:B2"]);
        let range = *index.ranges().first().unwrap();
        for col in 1..=2 {
            for row in 1..=2 {
                let cell = CellNumbers { col, row };
                assert_eq!(index.merge_range(cell), Some(&range));
                assert!(index.is_merged(cell));
            }
        }
        assert_eq!(index.merge_range(CellNumbers { col: 3, row: 1 }), None);
    }

    #[test]
    fn test_ranges_keep_workbook_order() {
        let index = MergeIndex::build(&["D4:E5", "A1:B2"]);
        let ranges = index.ranges();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].start, CellNumbers { col: 4, row: 4 });
        assert_eq!(ranges[1].start, CellNumbers { col: 1, row: 1 });
    }

    #[test]
    fn test_malformed_references_are_skipped() {
        let index = MergeIndex::build(&["garbage", "B2:C3"]);
        assert_eq!(index.ranges().len(), 1);
        assert!(index.is_merged(CellNumbers { col: 2, row: 2 }));
    }

    #[test]
    fn test_reversed_reference_is_normalised() {
        let index = MergeIndex::build(&["C3:B2"]);
        let range = index.merge_range(CellNumbers { col: 2, row: 3 }).unwrap();
        assert_eq!(range.start, CellNumbers { col: 2, row: 2 });
        assert_eq!(range.end, CellNumbers { col: 3, row: 3 });
    }
}
