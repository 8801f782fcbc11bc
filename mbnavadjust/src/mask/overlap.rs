//! Overlap of two section footprints under a candidate offset.
//!
//! Every populated cell of the first footprint is tested against every
//! populated cell of the second footprint shifted by the offset. A pair
//! counts when the two cell rectangles strictly intersect, and both cells
//! of that pair are marked. The score blends the marked fraction of each
//! footprint weighted by its cell area:
//!
//! ```text
//! overlap1 = marked1 / populated1
//! overlap2 = marked2 / populated2
//! score    = a1/(a1+a2) * overlap1 + a2/(a1+a2) * overlap2
//! ```
//!
//! The result is a truncated integer percent floored at 1, since 0 is
//! reserved for "not computed".

use super::{CoverageMask, MASK_CELLS, MASK_DIM};
use crate::coord::{GeoBounds, GeoOffset};

/// A section's bounding box together with its coverage grid.
#[derive(Debug, Clone, Copy)]
pub struct Footprint<'a> {
    pub bounds: &'a GeoBounds,
    pub mask: &'a CoverageMask,
}

impl<'a> Footprint<'a> {
    pub fn new(bounds: &'a GeoBounds, mask: &'a CoverageMask) -> Self {
        Self { bounds, mask }
    }

    #[inline]
    fn cell_size(&self) -> (f64, f64) {
        (
            self.bounds.width() / MASK_DIM as f64,
            self.bounds.height() / MASK_DIM as f64,
        )
    }

    #[inline]
    fn cell_area(&self) -> f64 {
        let (dx, dy) = self.cell_size();
        (dx * dy).abs()
    }

    fn cell_bounds(&self, col: usize, row: usize, shift: GeoOffset) -> GeoBounds {
        let (dx, dy) = self.cell_size();
        let lon = self.bounds.lon_min + shift.lon + dx * col as f64;
        let lat = self.bounds.lat_min + shift.lat + dy * row as f64;
        GeoBounds::new(lon, lon + dx, lat, lat + dy)
    }

    fn populated_cells(&self, shift: GeoOffset) -> Vec<(usize, GeoBounds)> {
        self.mask
            .populated()
            .map(|(col, row)| (col + row * MASK_DIM, self.cell_bounds(col, row, shift)))
            .collect()
    }
}

/// Visits every intersecting cell pair until the visitor returns false.
fn visit_intersections<F>(first: Footprint<'_>, second: Footprint<'_>, offset: GeoOffset, mut visit: F)
where
    F: FnMut(usize, usize, &GeoBounds, &GeoBounds) -> bool,
{
    let cells_1 = first.populated_cells(GeoOffset::ZERO);
    let cells_2 = second.populated_cells(offset);

    for (i1, b1) in &cells_1 {
        for (i2, b2) in &cells_2 {
            if b1.intersects(b2) && !visit(*i1, *i2, b1, b2) {
                return;
            }
        }
    }
}

/// Computes the overlap percent of two footprints.
///
/// `offset` shifts the second footprint relative to the first. The result
/// is always in `1..=100`.
pub fn compute_overlap(first: Footprint<'_>, second: Footprint<'_>, offset: GeoOffset) -> u8 {
    let mut marked_1 = [false; MASK_CELLS];
    let mut marked_2 = [false; MASK_CELLS];

    visit_intersections(first, second, offset, |i1, i2, _, _| {
        marked_1[i1] = true;
        marked_2[i2] = true;
        true
    });

    let fraction_1 = marked_fraction(&marked_1, first.mask.populated_count());
    let fraction_2 = marked_fraction(&marked_2, second.mask.populated_count());

    let area_1 = first.cell_area();
    let area_2 = second.cell_area();
    let total = area_1 + area_2;
    let (weight_1, weight_2) = if total > 0.0 && total.is_finite() {
        (area_1 / total, area_2 / total)
    } else {
        (0.5, 0.5)
    };

    let score = weight_1 * fraction_1 + weight_2 * fraction_2;
    ((100.0 * score) as u8).clamp(1, 100)
}

fn marked_fraction(marked: &[bool; MASK_CELLS], populated: usize) -> f64 {
    if populated == 0 {
        return 0.0;
    }
    marked.iter().filter(|&&m| m).count() as f64 / populated as f64
}

/// Returns the smallest rectangle enclosing every intersecting cell pair.
///
/// The rectangle is in the frame of the first footprint. Returns `None`
/// when no cells intersect.
pub fn overlap_bounds(
    first: Footprint<'_>,
    second: Footprint<'_>,
    offset: GeoOffset,
) -> Option<GeoBounds> {
    let mut envelope: Option<GeoBounds> = None;

    visit_intersections(first, second, offset, |_, _, b1, b2| {
        if let Some(hit) = b1.intersection(b2) {
            envelope = Some(match envelope {
                Some(current) => current.union(&hit),
                None => hit,
            });
        }
        true
    });

    envelope
}

/// True if any populated cells of the two footprints intersect.
pub fn any_overlap(first: Footprint<'_>, second: Footprint<'_>, offset: GeoOffset) -> bool {
    if !first.bounds.intersects(&second.bounds.translated(offset)) {
        return false;
    }
    let mut found = false;
    visit_intersections(first, second, offset, |_, _, _, _| {
        found = true;
        false
    });
    found
}
