use chrono::NaiveDate;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::bounds::GridBounds;
use crate::fields::FieldSet;

pub mod error;
pub use error::ConfigError;

/// One gridding run's configuration: output grid extent, the field registry,
/// where to find swath files, and an optional orbit date window.
#[derive(Debug, Clone)]
pub struct GridConfig {
    bounds: GridBounds,
    fields: FieldSet,
    swath_pattern: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

// Deserializes a GridConfig, validating the grid bounds, the field registry
// and the date window before the run starts.
impl<'de> Deserialize<'de> for GridConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            bounds: BoundsHelper,
            scalar_fields: Vec<String>,
            #[serde(default)]
            flag_fields: Vec<String>,
            primary_field: String,
            swath_pattern: String,
            start_date: Option<String>,
            end_date: Option<String>,
        }

        #[derive(Deserialize)]
        struct BoundsHelper {
            minx: i64,
            maxx: i64,
            miny: i64,
            maxy: i64,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let bounds = GridBounds::new(
            helper.bounds.minx,
            helper.bounds.maxx,
            helper.bounds.miny,
            helper.bounds.maxy,
        )
        .map_err(|e| D::Error::custom(ConfigError::Bounds(e)))?;

        let fields = FieldSet::new(
            helper.scalar_fields,
            helper.flag_fields,
            &helper.primary_field,
        )
        .map_err(|e| D::Error::custom(ConfigError::Fields(e)))?;

        let parse_date = |s: &str| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|e| D::Error::custom(format!("Invalid date format: {}", e)))
        };

        let start_date = helper.start_date.as_deref().map(parse_date).transpose()?;
        let end_date = helper.end_date.as_deref().map(parse_date).transpose()?;

        if let (Some(start), Some(end)) = (start_date, end_date)
            && start > end
        {
            return Err(D::Error::custom(ConfigError::DateOrder));
        }

        Ok(GridConfig {
            bounds,
            fields,
            swath_pattern: helper.swath_pattern,
            start_date,
            end_date,
        })
    }
}

impl GridConfig {
    pub fn new(bounds: GridBounds, fields: FieldSet, swath_pattern: &str) -> Self {
        Self {
            bounds,
            fields,
            swath_pattern: swath_pattern.to_string(),
            start_date: None,
            end_date: None,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<GridConfig, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: GridConfig = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn swath_pattern(&self) -> &str {
        &self.swath_pattern
    }

    /// Whether an orbit observed on `date` falls inside the configured
    /// window. Open-ended on either side when a bound is not set.
    pub fn in_date_window(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start_date
            && date < start
        {
            return false;
        }
        if let Some(end) = self.end_date
            && date > end
        {
            return false;
        }

        true
    }
}
