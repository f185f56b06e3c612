use crate::bounds::GridBounds;
use crate::fields::FieldSet;
use crate::grid::error::GridError;
use crate::grid::raster;
use crate::swath::Footprint;

/// Accumulation target for one orbit's footprints.
///
/// Every scalar field holds a per-cell running mean of the contributing
/// footprints, `count` the number of contributors, `area` the running mean of
/// contributing footprint areas (NaN while the cell is empty) and
/// `areaweight = count / area`. Flag fields keep every contributing value per
/// cell, in contribution order. The running mean is final after the last
/// footprint, so `finalize` has nothing to do; it exists as the hook where
/// derived fields would be computed downstream.
///
/// Storage is row-major over `nx * ny` cells, flat arrays indexed through
/// `cell_index`.
#[derive(Debug)]
pub struct OutputGrid {
    bounds: GridBounds,
    fields: FieldSet,
    values: Vec<Vec<f64>>,
    count: Vec<u32>,
    area: Vec<f64>,
    areaweight: Vec<f64>,
    flag_lists: Vec<Vec<Vec<u32>>>,
}

impl OutputGrid {
    pub fn new(bounds: GridBounds, fields: FieldSet) -> Self {
        let ncells = bounds.ncells();

        OutputGrid {
            bounds,
            values: vec![vec![0.0; ncells]; fields.n_scalars()],
            count: vec![0; ncells],
            area: vec![f64::NAN; ncells],
            areaweight: vec![0.0; ncells],
            flag_lists: vec![vec![Vec::new(); ncells]; fields.n_flags()],
            fields,
        }
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Folds one footprint into the grid; returns the number of cells it
    /// covered. Shape mismatches against the field registry fail before any
    /// mutation; a non-finite primary value or degenerate geometry simply
    /// contributes zero cells.
    pub fn accumulate(&mut self, footprint: &Footprint) -> Result<usize, GridError> {
        if footprint.scalars.len() != self.fields.n_scalars() {
            return Err(GridError::ScalarCount {
                expected: self.fields.n_scalars(),
                got: footprint.scalars.len(),
            });
        }
        if footprint.flags.len() != self.fields.n_flags() {
            return Err(GridError::FlagCount {
                expected: self.fields.n_flags(),
                got: footprint.flags.len(),
            });
        }

        // A footprint with no valid primary measurement carries no averaging
        // weight and is excluded outright
        if !footprint.scalars[self.fields.primary_index()].is_finite() {
            return Ok(0);
        }

        let bounds = self.bounds;
        let nx = bounds.nx();
        let mut covered = 0;

        raster::rasterize(&footprint.corners_x, &footprint.corners_y, bounds, |x, y| {
            let idx = (y - bounds.miny) as usize * nx + (x - bounds.minx) as usize;
            self.contribute(idx, footprint);
            covered += 1;
        });

        Ok(covered)
    }

    /// Running-mean update of a single cell. Occupancy is judged by the
    /// contribution count, which keeps the count/area/field invariant intact
    /// even when a cell's mean happens to land on 0.0.
    fn contribute(&mut self, idx: usize, footprint: &Footprint) {
        if self.count[idx] > 0 {
            let count = self.count[idx] + 1;
            let n = count as f64;

            self.count[idx] = count;
            self.area[idx] = (self.area[idx] * (n - 1.0) + footprint.area) / n;
            self.areaweight[idx] = n / self.area[idx];

            for (k, value) in footprint.scalars.iter().enumerate() {
                self.values[k][idx] = (self.values[k][idx] * (n - 1.0) + value) / n;
            }
        } else {
            self.count[idx] = 1;
            self.area[idx] = footprint.area;
            self.areaweight[idx] = 1.0 / footprint.area;

            for (k, value) in footprint.scalars.iter().enumerate() {
                self.values[k][idx] = *value;
            }
        }

        for (k, flag) in footprint.flags.iter().enumerate() {
            self.flag_lists[k][idx].push(*flag);
        }
    }

    /// Identity for now; the running means are already final. Derived-field
    /// computation (AMF recomputation) plugs in here downstream.
    pub fn finalize(self) -> Self {
        self
    }

    fn cell_index(&self, x: i64, y: i64) -> Result<usize, String> {
        if x < self.bounds.minx || x > self.bounds.maxx {
            return Err(format!(
                "x index {} out of bounds ({}..={})",
                x, self.bounds.minx, self.bounds.maxx
            ));
        }
        if y < self.bounds.miny || y > self.bounds.maxy {
            return Err(format!(
                "y index {} out of bounds ({}..={})",
                y, self.bounds.miny, self.bounds.maxy
            ));
        }

        Ok((y - self.bounds.miny) as usize * self.bounds.nx() + (x - self.bounds.minx) as usize)
    }

    pub fn count_at(&self, x: i64, y: i64) -> Result<u32, String> {
        Ok(self.count[self.cell_index(x, y)?])
    }

    pub fn area_at(&self, x: i64, y: i64) -> Result<f64, String> {
        Ok(self.area[self.cell_index(x, y)?])
    }

    pub fn areaweight_at(&self, x: i64, y: i64) -> Result<f64, String> {
        Ok(self.areaweight[self.cell_index(x, y)?])
    }

    pub fn value_at(&self, field: &str, x: i64, y: i64) -> Result<f64, String> {
        let k = self
            .fields
            .scalar_index(field)
            .ok_or_else(|| format!("Unknown scalar field: {}", field))?;

        Ok(self.values[k][self.cell_index(x, y)?])
    }

    pub fn flags_at(&self, field: &str, x: i64, y: i64) -> Result<&[u32], String> {
        let k = self
            .fields
            .flag_index(field)
            .ok_or_else(|| format!("Unknown flag field: {}", field))?;

        Ok(&self.flag_lists[k][self.cell_index(x, y)?])
    }

    /// Full per-cell array for one scalar field, row-major.
    pub fn scalar_field(&self, field: &str) -> Result<&[f64], String> {
        let k = self
            .fields
            .scalar_index(field)
            .ok_or_else(|| format!("Unknown scalar field: {}", field))?;

        Ok(&self.values[k])
    }

    pub fn counts(&self) -> &[u32] {
        &self.count
    }

    pub fn populated_cells(&self) -> usize {
        self.count.iter().filter(|&&c| c > 0).count()
    }
}
