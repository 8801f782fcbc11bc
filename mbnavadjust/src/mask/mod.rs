//! Section coverage masks
//!
//! Each section carries a fixed 25×25 boolean grid laid over its own
//! bounding box. A cell is populated when at least one sounding of the
//! section falls inside it. The grid is the unit of the overlap
//! computation in [`overlap`].
//!
//! # Layout
//!
//! Cells are addressed by `(col, row)` where `col` runs west to east and
//! `row` runs south to north. The flat index is `col + row * MASK_DIM`.
//! On disk the rows are written highest first, one line of 25 `0`/`1`
//! characters per row.

pub mod overlap;

use std::fmt;

pub use overlap::{any_overlap, compute_overlap, overlap_bounds, Footprint};

/// Number of cells along each axis of a coverage mask.
pub const MASK_DIM: usize = 25;

/// Total number of cells in a coverage mask.
pub const MASK_CELLS: usize = MASK_DIM * MASK_DIM;

/// Errors from decoding the text form of a mask.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaskLineError {
    #[error("expected {} mask rows, found {0}", MASK_DIM)]
    RowCount(usize),

    #[error("mask row has {0} cells, expected {}", MASK_DIM)]
    RowWidth(usize),

    #[error("invalid mask cell character {0:?}")]
    BadCell(char),
}

/// A 25×25 coverage grid.
#[derive(Clone, PartialEq, Eq)]
pub struct CoverageMask {
    cells: [bool; MASK_CELLS],
}

impl CoverageMask {
    /// A mask with no populated cells.
    pub fn empty() -> Self {
        Self {
            cells: [false; MASK_CELLS],
        }
    }

    /// A mask with every cell populated.
    pub fn full() -> Self {
        Self {
            cells: [true; MASK_CELLS],
        }
    }

    #[inline]
    fn index(col: usize, row: usize) -> Option<usize> {
        (col < MASK_DIM && row < MASK_DIM).then_some(col + row * MASK_DIM)
    }

    /// Returns the cell value; out-of-range cells read as unpopulated.
    #[inline]
    pub fn get(&self, col: usize, row: usize) -> bool {
        Self::index(col, row).map(|i| self.cells[i]).unwrap_or(false)
    }

    /// Sets a cell. Returns false if the cell is out of range.
    pub fn set(&mut self, col: usize, row: usize, populated: bool) -> bool {
        match Self::index(col, row) {
            Some(i) => {
                self.cells[i] = populated;
                true
            }
            None => false,
        }
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with_cell(mut self, col: usize, row: usize) -> Self {
        self.set(col, row, true);
        self
    }

    /// Number of populated cells.
    pub fn populated_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    /// Iterates populated cells as `(col, row)` in flat-index order.
    pub fn populated(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| c)
            .map(|(i, _)| (i % MASK_DIM, i / MASK_DIM))
    }

    /// True if every populated cell of `self` is populated in `other`.
    pub fn is_subset_of(&self, other: &CoverageMask) -> bool {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .all(|(&a, &b)| !a || b)
    }

    /// Decodes mask rows, highest row first.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MaskLineError> {
        if rows.len() != MASK_DIM {
            return Err(MaskLineError::RowCount(rows.len()));
        }
        let mut mask = Self::empty();
        for (k, line) in rows.iter().enumerate() {
            let row = MASK_DIM - 1 - k;
            mask.decode_row(row, line.as_ref())?;
        }
        Ok(mask)
    }

    /// Decodes a single text row into grid row `row`.
    pub fn decode_row(&mut self, row: usize, line: &str) -> Result<(), MaskLineError> {
        let line = line.trim_end();
        let width = line.chars().count();
        if width != MASK_DIM {
            return Err(MaskLineError::RowWidth(width));
        }
        for (col, ch) in line.chars().enumerate() {
            let populated = match ch {
                '0' => false,
                '1' => true,
                other => return Err(MaskLineError::BadCell(other)),
            };
            self.set(col, row, populated);
        }
        Ok(())
    }

    /// Encodes the mask as text rows, highest row first.
    pub fn to_rows(&self) -> Vec<String> {
        (0..MASK_DIM)
            .rev()
            .map(|row| {
                (0..MASK_DIM)
                    .map(|col| if self.get(col, row) { '1' } else { '0' })
                    .collect()
            })
            .collect()
    }
}

impl Default for CoverageMask {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for CoverageMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoverageMask")
            .field("populated", &self.populated_count())
            .finish()
    }
}
