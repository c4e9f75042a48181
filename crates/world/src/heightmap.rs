//! Sky heightmap for a chunk column.
//!
//! Each entry is the lowest Y that has open sky above it, i.e. one above the
//! topmost sky-blocking block in the column (`min_y` for an open column).
//! Any block at or above that height is lit by the sky.

const COLUMNS: usize = 256;

/// Heightmap for a single chunk (16x16), indexed by `(z << 4) | x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heightmap {
    heights: Box<[i32; COLUMNS]>,
    min_y: i32,
}

impl Heightmap {
    /// Heightmap of an empty column range starting at `min_y`.
    pub fn new(min_y: i32) -> Self {
        Self {
            heights: Box::new([min_y; COLUMNS]),
            min_y,
        }
    }

    /// Height for a column index.
    #[inline]
    pub fn get(&self, column: usize) -> i32 {
        self.heights[column]
    }

    /// Overwrite a column.
    pub fn set(&mut self, column: usize, height: i32) {
        self.heights[column] = height.max(self.min_y);
    }

    /// Lowest height any column can report.
    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Update a column after the block at `y` changed.
    ///
    /// `blocks_sky(y)` reports whether the block currently at `y` in the same
    /// column blocks sky light. It is only consulted when the column's top
    /// blocker was removed and a rescan is needed.
    pub fn on_block_changed<F>(&mut self, column: usize, y: i32, blocking: bool, blocks_sky: F)
    where
        F: Fn(i32) -> bool,
    {
        let current = self.heights[column];
        if blocking {
            if y >= current {
                self.heights[column] = y + 1;
            }
            return;
        }
        if y + 1 != current {
            return;
        }
        let mut height = self.min_y;
        let mut probe = y - 1;
        while probe >= self.min_y {
            if blocks_sky(probe) {
                height = probe + 1;
                break;
            }
            probe -= 1;
        }
        self.heights[column] = height;
    }
}
