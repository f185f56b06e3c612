//! Quadrangle scan conversion for satellite footprint oversampling
//!
//! One satellite footprint is a quadrilateral in grid-index space, usually
//! convex and counter-clockwise but near swath edges possibly collapsed,
//! inverted, or self-crossing. This module determines which output grid cells
//! the quadrangle covers, streaming each covered cell to a caller-supplied
//! sink so the accumulation store can fold the pixel's values in as it goes.
//!
//! The algorithm proceeds in three steps:
//!
//! 1. **Corner normalization**: round each corner to the nearest grid index,
//!    clamp into the grid bounds, and canonicalize the vertex order with a
//!    fixed compare-and-exchange network so that vertex 1 is the bottom,
//!    vertex 3 the top, and vertices 4 and 2 the left and right sides of a
//!    nominally counter-clockwise traversal.
//! 2. **Row range**: rows `y1+1` through `y3`. Starting one row above the
//!    bottom vertex keeps a shared horizontal edge between two vertically
//!    adjacent footprints from being counted by both.
//! 3. **Per-row bounds**: interpolate the left and right polygon edges at
//!    each row. A quadrangle whose side vertices straddle the 1-3 diagonal
//!    the expected way is `Standard`; anything else drops to a `Fallback`
//!    that bounds one side with the diagonal itself and swaps the computed
//!    bounds outright if they still come out crossed. The right bound is
//!    decremented by one and columns run `left+1..=right`; together with the
//!    bottom-row adjustment this prevents double counting of edges shared by
//!    adjacent footprints. The asymmetry between the two adjustments is
//!    intentional and matches the historical product, so downstream averages
//!    stay comparable; do not regularize it.
//!
//! Degenerate input never errors here: an empty row range or crossed-edge
//! fallback simply yields zero covered cells.

use crate::bounds::GridBounds;
use crate::geometry::{calcline, clip, exchange_coord};

/// Which branch of the per-row bound computation applies to this quadrangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    /// Vertex 2 right of the 1-3 diagonal and vertex 4 left of it.
    Standard,
    /// Inverted or self-crossing vertex layout; bound one side with the
    /// diagonal and repair crossed bounds per row.
    Fallback,
}

/// Streams every grid cell covered by the footprint quadrangle to `emit` as
/// `(x, y)` in global grid indices. Malformed quadrangles (non-finite or
/// collapsed corners, reversed winding) contribute zero cells rather than
/// erroring.
pub(crate) fn rasterize<F>(corners_x: &[f64; 4], corners_y: &[f64; 4], bounds: GridBounds, mut emit: F)
where
    F: FnMut(i64, i64),
{
    // Bad geolocation: contribute nothing
    if corners_x.iter().chain(corners_y.iter()).any(|c| !c.is_finite()) {
        return;
    }

    let nx = bounds.nx() as f64;
    let ny = bounds.ny() as f64;

    // Step 1: round to the nearest grid index, clamp into bounds, and shift
    // to 1-based local indices so the scan works the same for any bounds
    let local = |c: f64, min: i64, max: i64| clip(c.round(), min as f64, max as f64) - (min - 1) as f64;

    let mut p1 = (
        local(corners_x[0], bounds.minx, bounds.maxx),
        local(corners_y[0], bounds.miny, bounds.maxy),
    );
    let mut p2 = (
        local(corners_x[1], bounds.minx, bounds.maxx),
        local(corners_y[1], bounds.miny, bounds.maxy),
    );
    let mut p3 = (
        local(corners_x[2], bounds.minx, bounds.maxx),
        local(corners_y[2], bounds.miny, bounds.maxy),
    );
    let mut p4 = (
        local(corners_x[3], bounds.minx, bounds.maxx),
        local(corners_y[3], bounds.miny, bounds.maxy),
    );

    // Canonical vertex order: 1 bottom, 3 top, 4 left / 2 right
    if p2.1 < p1.1 {
        (p1, p2) = exchange_coord(p1, p2);
    }
    if p3.1 < p1.1 {
        (p1, p3) = exchange_coord(p1, p3);
    }
    if p4.1 < p1.1 {
        (p1, p4) = exchange_coord(p1, p4);
    }
    if p2.1 > p3.1 {
        (p2, p3) = exchange_coord(p2, p3);
    }
    if p4.1 > p3.1 {
        (p4, p3) = exchange_coord(p4, p3);
    }
    if p4.0 > p2.0 {
        (p4, p2) = exchange_coord(p4, p2);
    }

    let (x1, y1) = p1;
    let (x3, y3) = p3;

    // Step 2: row range y1+1..=y3, clamped to the vertical grid extent. An
    // empty range (flat or collapsed quadrangle) contributes nothing, and a
    // non-empty one guarantees y3 > y1 for the diagonal interpolation below.
    let bottom = (y1 as i64 + 1).max(1);
    let top = (y3 as i64).min(ny as i64);
    if bottom > top {
        return;
    }

    let diag = |y: f64| calcline(y, x1, y1, x3, y3);

    let orientation = if p2.0 >= diag(p2.1) && p4.0 <= diag(p4.1) {
        Orientation::Standard
    } else {
        // Make vertex 2 the off-diagonal boundary vertex
        if p2.0 < diag(p2.1) {
            (p2, p4) = exchange_coord(p2, p4);
        }
        Orientation::Fallback
    };

    let (x2, y2) = p2;
    let (x4, y4) = p4;

    // Step 3: per-row left/right bounds. The edge splits use <= so that a
    // side vertex sharing the top row still interpolates along a
    // vertically separated edge; at the vertex row itself both candidate
    // edges interpolate to the vertex's x, so the value is unchanged.
    for y_quad in bottom..=top {
        let yq = y_quad as f64;

        let (xleft, xright) = match orientation {
            Orientation::Standard => {
                let xl = if yq <= y4 {
                    calcline(yq, x1, y1, x4, y4)
                } else {
                    calcline(yq, x4, y4, x3, y3)
                };
                let xr = if yq <= y2 {
                    calcline(yq, x1, y1, x2, y2)
                } else {
                    calcline(yq, x2, y2, x3, y3)
                };
                (xl, xr)
            }
            Orientation::Fallback => {
                let xl = diag(yq);
                let xr = if yq <= y2 {
                    calcline(yq, x1, y1, x2, y2)
                } else {
                    calcline(yq, x2, y2, x3, y3)
                };
                // Crossed edges: swap the computed bounds outright
                if xl > xr { (xr, xl) } else { (xl, xr) }
            }
        };

        let left = xleft.round() as i64;
        let right = xright.round() as i64 - 1;

        if left <= 0 {
            continue;
        }
        let left = clip(left as f64, 1.0, nx) as i64;
        let right = clip(right as f64, 1.0, nx) as i64;

        for x_quad in (left + 1)..=right {
            emit(x_quad + bounds.minx - 1, y_quad + bounds.miny - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covered(corners_x: [f64; 4], corners_y: [f64; 4], bounds: GridBounds) -> Vec<(i64, i64)> {
        let mut cells = Vec::new();
        rasterize(&corners_x, &corners_y, bounds, |x, y| cells.push((x, y)));
        cells
    }

    fn bounds3() -> GridBounds {
        GridBounds::new(1, 3, 1, 3).unwrap()
    }

    #[test]
    fn test_single_cell_footprint() {
        // Footprint spanning grid indices (1,1)-(3,2) covers exactly cell (2,2):
        // the bottom row and the left/right edge columns are skipped by the
        // shared-edge adjustments
        let cells = covered([1.0, 3.0, 3.0, 1.0], [1.0, 1.0, 2.0, 2.0], bounds3());
        assert_eq!(cells, vec![(2, 2)]);
    }

    #[test]
    fn test_square_footprint_coverage() {
        // A 4x4 span covers the 3x3 block above-right of the bottom-left corner
        let bounds = GridBounds::new(1, 6, 1, 6).unwrap();
        let cells = covered([1.0, 5.0, 5.0, 1.0], [1.0, 1.0, 4.0, 4.0], bounds);

        let mut expected = Vec::new();
        for y in 2..=4 {
            for x in 2..=4 {
                expected.push((x, y));
            }
        }
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_winding_order_does_not_matter() {
        let ccw = covered([1.0, 3.0, 3.0, 1.0], [1.0, 1.0, 2.0, 2.0], bounds3());
        // Same quadrangle traversed clockwise
        let cw = covered([1.0, 1.0, 3.0, 3.0], [1.0, 2.0, 2.0, 1.0], bounds3());
        assert_eq!(ccw, cw);
    }

    #[test]
    fn test_corner_rounding() {
        // Real-valued corners round to the same integer quadrangle
        let cells = covered([0.7, 3.2, 2.9, 1.4], [1.2, 0.8, 2.1, 1.9], bounds3());
        assert_eq!(cells, covered([1.0, 3.0, 3.0, 1.0], [1.0, 1.0, 2.0, 2.0], bounds3()));
    }

    #[test]
    fn test_collapsed_quadrangle_covers_nothing() {
        assert!(covered([2.0; 4], [2.0; 4], bounds3()).is_empty());

        // Horizontal sliver: empty row range
        assert!(covered([1.0, 2.0, 3.0, 2.0], [2.0, 2.0, 2.0, 2.0], bounds3()).is_empty());

        // Vertical sliver: zero-width rows
        assert!(covered([2.0, 2.0, 2.0, 2.0], [1.0, 1.0, 3.0, 3.0], bounds3()).is_empty());
    }

    #[test]
    fn test_self_crossing_quadrangle_is_absorbed() {
        // Bowtie vertex order: takes the fallback branch, must not panic
        let cells = covered([1.0, 3.0, 1.0, 3.0], [1.0, 1.0, 3.0, 3.0], bounds3());
        for &(x, y) in &cells {
            assert!((1..=3).contains(&x) && (1..=3).contains(&y));
        }
    }

    #[test]
    fn test_fallback_still_covers_interior() {
        // Wide bowtie with the 1-3 diagonal as its left side; the fallback
        // branch should still find interior cells
        let bounds = GridBounds::new(1, 6, 1, 6).unwrap();
        let cells = covered([1.0, 5.0, 1.0, 5.0], [1.0, 1.0, 5.0, 5.0], bounds);
        assert!(!cells.is_empty());
        for &(x, y) in &cells {
            assert!((1..=6).contains(&x) && (1..=6).contains(&y));
        }
    }

    #[test]
    fn test_non_finite_corners_cover_nothing() {
        assert!(covered([1.0, f64::NAN, 3.0, 1.0], [1.0, 1.0, 2.0, 2.0], bounds3()).is_empty());
        assert!(
            covered([1.0, 3.0, 3.0, 1.0], [1.0, f64::INFINITY, 2.0, 2.0], bounds3()).is_empty()
        );
    }

    #[test]
    fn test_out_of_bounds_corners_are_clamped() {
        // Footprint hanging off every side of the grid: covered cells must
        // stay inside the declared bounds
        let cells = covered([-5.0, 10.0, 10.0, -5.0], [-5.0, -5.0, 10.0, 10.0], bounds3());
        assert!(!cells.is_empty());
        for &(x, y) in &cells {
            assert!((1..=3).contains(&x) && (1..=3).contains(&y));
        }
    }

    #[test]
    fn test_shifted_bounds() {
        // Same footprint shape expressed in a grid whose indices start at
        // (101, 201) covers the equivalently shifted cell
        let bounds = GridBounds::new(101, 103, 201, 203).unwrap();
        let cells = covered(
            [101.0, 103.0, 103.0, 101.0],
            [201.0, 201.0, 202.0, 202.0],
            bounds,
        );
        assert_eq!(cells, vec![(102, 202)]);
    }

    #[test]
    fn test_row_order_is_bottom_up() {
        let bounds = GridBounds::new(1, 6, 1, 6).unwrap();
        let cells = covered([1.0, 5.0, 5.0, 1.0], [1.0, 1.0, 4.0, 4.0], bounds);
        let rows: Vec<i64> = cells.iter().map(|&(_, y)| y).collect();
        let mut sorted = rows.clone();
        sorted.sort_unstable();
        assert_eq!(rows, sorted);
    }
}
