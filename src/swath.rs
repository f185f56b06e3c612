use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::fields::FieldSet;

/// One satellite pixel ready for gridding: four corner points in grid-index
/// space, the geodesic area of the footprint, and the field values aligned to
/// a `FieldSet` ordering.
///
/// The corners may be geometrically degenerate (collapsed, inverted winding);
/// the rasterizer absorbs that without error.
#[derive(Debug, Clone)]
pub struct Footprint {
    pub corners_x: [f64; 4],
    pub corners_y: [f64; 4],
    /// Geodesic area of the 50%-response footprint, km^2.
    pub area: f64,
    /// Scalar values, one per `FieldSet` scalar field, in registry order.
    pub scalars: Vec<f64>,
    /// Flag values, one per `FieldSet` flag field, in registry order.
    pub flags: Vec<u32>,
}

#[derive(Debug)]
pub enum SwathError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SwathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwathError::Io(e) => write!(f, "I/O error: {}", e),
            SwathError::Json(e) => write!(f, "Failed to parse swath JSON: {}", e),
        }
    }
}

impl std::error::Error for SwathError {}

impl From<std::io::Error> for SwathError {
    fn from(err: std::io::Error) -> SwathError {
        SwathError::Io(err)
    }
}

impl From<serde_json::Error> for SwathError {
    fn from(err: serde_json::Error) -> SwathError {
        SwathError::Json(err)
    }
}

/// One pixel record as stored in a swath file: corners plus field values keyed
/// by name. Resolution against the run's `FieldSet` happens in
/// `to_footprint`.
#[derive(Debug, Clone)]
pub struct PixelRecord {
    pub corners_x: [f64; 4],
    pub corners_y: [f64; 4],
    pub area: f64,
    pub values: BTreeMap<String, f64>,
    pub flags: BTreeMap<String, u32>,
}

impl PixelRecord {
    /// Aligns the named values to the registry ordering. Scalar fields absent
    /// from the record become NaN (fill), so a missing primary field simply
    /// excludes the pixel from the grid; absent flag fields become 0.
    /// Extra names in the record that the registry does not grid are ignored.
    pub fn to_footprint(&self, fields: &FieldSet) -> Footprint {
        let scalars = fields
            .scalar_names()
            .iter()
            .map(|name| self.values.get(name).copied().unwrap_or(f64::NAN))
            .collect();

        let flags = fields
            .flag_names()
            .iter()
            .map(|name| self.flags.get(name).copied().unwrap_or(0))
            .collect();

        Footprint {
            corners_x: self.corners_x,
            corners_y: self.corners_y,
            area: self.area,
            scalars,
            flags,
        }
    }
}

impl<'de> Deserialize<'de> for PixelRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct PixelHelper {
            corners_x: Vec<f64>,
            corners_y: Vec<f64>,
            area: f64,
            #[serde(default)]
            values: BTreeMap<String, f64>,
            #[serde(default)]
            flags: BTreeMap<String, u32>,
        }

        let helper = PixelHelper::deserialize(deserializer)?;

        // A footprint has exactly 4 corners
        let corners_x: [f64; 4] = helper
            .corners_x
            .try_into()
            .map_err(|v: Vec<f64>| D::Error::custom(format!("Expected 4 corner x values, got {}", v.len())))?;
        let corners_y: [f64; 4] = helper
            .corners_y
            .try_into()
            .map_err(|v: Vec<f64>| D::Error::custom(format!("Expected 4 corner y values, got {}", v.len())))?;

        if !(helper.area.is_finite() && helper.area > 0.0) {
            return Err(D::Error::custom(format!(
                "Pixel area must be finite and positive, got {}",
                helper.area
            )));
        }

        Ok(PixelRecord {
            corners_x,
            corners_y,
            area: helper.area,
            values: helper.values,
            flags: helper.flags,
        })
    }
}

/// One orbit's worth of pixels, as dumped by the upstream projection step
/// (corner coordinates already transformed from lon/lat to grid-index space).
#[derive(Debug, Clone)]
pub struct Swath {
    pub orbit: u32,
    pub time: NaiveDateTime,
    pub pixels: Vec<PixelRecord>,
}

impl<'de> Deserialize<'de> for Swath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct SwathHelper {
            orbit: u32,
            time: String,
            pixels: Vec<PixelRecord>,
        }

        let helper = SwathHelper::deserialize(deserializer)?;

        let time = NaiveDateTime::parse_from_str(&helper.time, "%Y-%m-%dT%H:%M:%S")
            .map_err(|e| D::Error::custom(format!("Invalid swath time format: {}", e)))?;

        Ok(Swath {
            orbit: helper.orbit,
            time,
            pixels: helper.pixels,
        })
    }
}

impl Swath {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Swath, SwathError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let swath: Swath = serde_json::from_reader(reader).map_err(SwathError::from)?;

        Ok(swath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::tempdir;

    fn sample_swath_json() -> &'static str {
        r#"
    {
        "orbit": 41234,
        "time": "2012-06-01T18:35:00",
        "pixels": [
            {
                "corners_x": [1.2, 3.4, 3.6, 1.1],
                "corners_y": [1.0, 1.3, 2.8, 2.9],
                "area": 312.5,
                "values": { "behr_no2": 1.2e15, "amf_trop": 1.8 },
                "flags": { "vcd_quality": 0 }
            }
        ]
    }
    "#
    }

    #[test]
    fn test_swath_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("swath.json");
        let mut file = File::create(&file_path).unwrap();
        file.write_all(sample_swath_json().as_bytes()).unwrap();

        let swath = Swath::from_file(&file_path).unwrap();

        assert_eq!(swath.orbit, 41234);
        assert_eq!(
            swath.time,
            NaiveDate::from_ymd_opt(2012, 6, 1)
                .unwrap()
                .and_hms_opt(18, 35, 0)
                .unwrap()
        );
        assert_eq!(swath.pixels.len(), 1);
        assert_eq!(swath.pixels[0].area, 312.5);
    }

    #[test]
    fn test_swath_rejects_wrong_corner_count() {
        let bad = r#"
    {
        "orbit": 1,
        "time": "2012-06-01T18:35:00",
        "pixels": [
            { "corners_x": [1.0, 2.0, 3.0], "corners_y": [1.0, 1.0, 2.0, 2.0], "area": 100.0 }
        ]
    }
    "#;
        let parsed: Result<Swath, _> = serde_json::from_str(bad);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_swath_rejects_bad_time_and_area() {
        let bad_time = r#"{ "orbit": 1, "time": "June 1st 2012", "pixels": [] }"#;
        assert!(serde_json::from_str::<Swath>(bad_time).is_err());

        let bad_area = r#"
    {
        "orbit": 1,
        "time": "2012-06-01T18:35:00",
        "pixels": [
            { "corners_x": [1.0, 2.0, 2.0, 1.0], "corners_y": [1.0, 1.0, 2.0, 2.0], "area": -5.0 }
        ]
    }
    "#;
        assert!(serde_json::from_str::<Swath>(bad_area).is_err());
    }

    #[test]
    fn test_pixel_record_field_alignment() {
        let swath: Swath = serde_json::from_str(sample_swath_json()).unwrap();
        let fields = FieldSet::new(
            vec!["behr_no2".to_string(), "amf_trop".to_string(), "cloud_fraction".to_string()],
            vec!["vcd_quality".to_string(), "xtrack_quality".to_string()],
            "behr_no2",
        )
        .unwrap();

        let footprint = swath.pixels[0].to_footprint(&fields);

        assert_eq!(footprint.scalars[0], 1.2e15);
        assert_eq!(footprint.scalars[1], 1.8);
        // Missing scalar is treated as fill
        assert!(footprint.scalars[2].is_nan());
        assert_eq!(footprint.flags, vec![0, 0]);
    }
}
