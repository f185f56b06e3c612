// Scan-conversion primitives for the quadrangle rasterizer. All coordinates
// are in grid-index space (1 unit = 1 output grid cell).

/// Interpolated abscissa on the segment (x1,y1)-(x2,y2) at ordinate `y`.
///
/// Returns NaN when the segment is horizontal (`y1 == y2`); the rasterizer
/// only calls this between vertically separated vertices.
pub fn calcline(y: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    x1 + (x2 - x1) * (y - y1) / (y2 - y1)
}

/// Clamps `value` into `[lo, hi]`.
pub fn clip(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

/// Swaps two coordinate pairs. Used by the corner ordering network to
/// canonicalize quadrangle vertices.
pub fn exchange_coord(p1: (f64, f64), p2: (f64, f64)) -> ((f64, f64), (f64, f64)) {
    (p2, p1)
}
