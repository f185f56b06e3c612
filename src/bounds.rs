use serde::Deserialize;

/// Output grid index bounds. Grid indices run `minx..=maxx` horizontally and
/// `miny..=maxy` vertically, one unit per output cell. Bounds are not
/// necessarily 1-based; the rasterizer shifts into local 1-based indices
/// internally.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GridBounds {
    pub minx: i64,
    pub maxx: i64,
    pub miny: i64,
    pub maxy: i64,
}

impl GridBounds {
    pub fn new(minx: i64, maxx: i64, miny: i64, maxy: i64) -> Result<Self, String> {
        if minx > maxx || miny > maxy {
            return Err("Min grid indices must be <= max grid indices".to_string());
        }

        Ok(GridBounds {
            minx,
            maxx,
            miny,
            maxy,
        })
    }

    /// Number of cells along x.
    pub fn nx(&self) -> usize {
        (self.maxx - self.minx + 1) as usize
    }

    /// Number of cells along y.
    pub fn ny(&self) -> usize {
        (self.maxy - self.miny + 1) as usize
    }

    pub fn ncells(&self) -> usize {
        self.nx() * self.ny()
    }
}
