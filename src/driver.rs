use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDateTime;
use glob::glob;

use crate::config::GridConfig;
use crate::grid::OutputGrid;
use crate::swath::Swath;

/// One orbit's finalized grid together with the swath metadata it came from.
#[derive(Debug)]
pub struct GriddedOrbit {
    pub orbit: u32,
    pub time: NaiveDateTime,
    pub grid: OutputGrid,
    /// Pixels that contributed at least one cell.
    pub pixels_gridded: usize,
    /// Pixels excluded for a missing primary value or degenerate geometry.
    pub pixels_skipped: usize,
}

/// Batch driver: discovers swath files, grids each orbit sequentially, and
/// returns the finalized grids. Footprints within an orbit must be processed
/// in order because every contribution depends on the prior accumulated state
/// of the cells it touches.
#[derive(Debug)]
pub struct SwathGridder {
    config: GridConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl SwathGridder {
    pub fn new(config: GridConfig) -> Self {
        SwathGridder {
            config,
            cancel: None,
        }
    }

    /// Installs a cancellation flag polled between footprints. A cancelled
    /// run stops at the next footprint boundary and returns the orbits
    /// finished so far.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Swath files matching the configured pattern, in sorted order so runs
    /// are reproducible regardless of filesystem enumeration order.
    fn discover_swaths(&self) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
        let mut paths = Vec::new();
        for entry in glob(self.config.swath_pattern())? {
            paths.push(entry?);
        }
        paths.sort();

        Ok(paths)
    }

    pub fn process(&self) -> Result<Vec<GriddedOrbit>, Box<dyn std::error::Error>> {
        let paths = self.discover_swaths()?;
        println!(
            "Found {} swath file(s) matching {}",
            paths.len(),
            self.config.swath_pattern()
        );

        let mut orbits = Vec::new();

        for path in &paths {
            let swath = Swath::from_file(path)?;

            if !self.config.in_date_window(swath.time.date()) {
                println!(
                    "Skipping orbit {} ({}): outside configured date window",
                    swath.orbit, swath.time
                );
                continue;
            }

            match self.grid_swath(&swath)? {
                Some(orbit) => {
                    println!(
                        "✓ Gridded orbit {} ({}): {} pixels contributed, {} skipped, {} cells populated",
                        orbit.orbit,
                        orbit.time,
                        orbit.pixels_gridded,
                        orbit.pixels_skipped,
                        orbit.grid.populated_cells()
                    );
                    orbits.push(orbit);
                }
                None => {
                    eprintln!("Cancelled during orbit {}; returning finished orbits", swath.orbit);
                    break;
                }
            }
        }

        Ok(orbits)
    }

    /// Grids one orbit. Returns None when the run was cancelled mid-orbit;
    /// a partially accumulated grid is discarded rather than reported.
    fn grid_swath(&self, swath: &Swath) -> Result<Option<GriddedOrbit>, Box<dyn std::error::Error>> {
        let mut grid = OutputGrid::new(self.config.bounds(), self.config.fields().clone());
        let mut pixels_gridded = 0;
        let mut pixels_skipped = 0;

        for pixel in &swath.pixels {
            if self.cancelled() {
                return Ok(None);
            }

            let footprint = pixel.to_footprint(self.config.fields());
            let covered = grid.accumulate(&footprint)?;
            if covered > 0 {
                pixels_gridded += 1;
            } else {
                pixels_skipped += 1;
            }
        }

        Ok(Some(GriddedOrbit {
            orbit: swath.orbit,
            time: swath.time,
            grid: grid.finalize(),
            pixels_gridded,
            pixels_skipped,
        }))
    }
}
