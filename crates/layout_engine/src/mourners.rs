//! Mourning-party block arrangement

use serde::{Deserialize, Serialize};

/// Lists longer than this are arranged in a grid
pub const MOURNER_GRID_THRESHOLD: usize = 3;

/// Columns used by the grid arrangement
pub const MOURNER_GRID_COLUMNS: usize = 2;

/// How the visible mourners are arranged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MournerLayout {
    /// One centered row per mourner
    #[default]
    SingleColumn,
    /// Left-aligned cells filled row by row
    Grid { columns: usize },
}

impl MournerLayout {
    /// The arrangement for `count` visible mourners
    pub fn for_count(count: usize) -> Self {
        if count > MOURNER_GRID_THRESHOLD {
            MournerLayout::Grid {
                columns: MOURNER_GRID_COLUMNS,
            }
        } else {
            MournerLayout::SingleColumn
        }
    }

    pub fn is_grid(&self) -> bool {
        matches!(self, MournerLayout::Grid { .. })
    }

    pub fn columns(&self) -> usize {
        match self {
            MournerLayout::SingleColumn => 1,
            MournerLayout::Grid { columns } => *columns,
        }
    }

    /// Row and column of the `index`-th cell
    pub fn cell_position(&self, index: usize) -> (usize, usize) {
        let columns = self.columns().max(1);
        (index / columns, index % columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_threshold() {
        for n in 0..=3 {
            assert_eq!(MournerLayout::for_count(n), MournerLayout::SingleColumn);
        }
        assert_eq!(
            MournerLayout::for_count(4),
            MournerLayout::Grid { columns: 2 }
        );
    }

    #[test]
    fn test_row_major_cells() {
        let grid = MournerLayout::for_count(5);
        assert_eq!(grid.cell_position(0), (0, 0));
        assert_eq!(grid.cell_position(1), (0, 1));
        assert_eq!(grid.cell_position(2), (1, 0));
        assert_eq!(grid.cell_position(4), (2, 0));
        assert_eq!(MournerLayout::SingleColumn.cell_position(2), (2, 0));
    }

    proptest! {
        #[test]
        fn prop_mode_depends_only_on_count(n in 0usize..500) {
            let layout = MournerLayout::for_count(n);
            prop_assert_eq!(layout.is_grid(), n > MOURNER_GRID_THRESHOLD);
            prop_assert_eq!(layout, MournerLayout::for_count(n));
        }
    }
}
