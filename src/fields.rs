use std::collections::HashSet;

/// Registry of the fields carried through the gridding run.
///
/// The original per-field accumulation code repeated the same running-mean
/// update for every named retrieval field; here the set of fields is
/// configuration data and the accumulation loops are indexed through this
/// registry. Scalar fields are averaged per cell; flag fields are collected
/// per cell as append-only lists. The primary scalar field drives NaN
/// exclusion: a footprint whose primary value is not finite contributes
/// nothing to the grid.
#[derive(Debug, Clone)]
pub struct FieldSet {
    scalars: Vec<String>,
    flags: Vec<String>,
    primary: usize,
}

impl FieldSet {
    pub fn new(
        scalars: Vec<String>,
        flags: Vec<String>,
        primary: &str,
    ) -> Result<Self, String> {
        if scalars.is_empty() {
            return Err("At least one scalar field is required".to_string());
        }

        let mut seen = HashSet::new();
        for name in scalars.iter().chain(flags.iter()) {
            if name.is_empty() {
                return Err("Field names cannot be empty".to_string());
            }
            if !seen.insert(name.as_str()) {
                return Err(format!("Duplicate field name: {}", name));
            }
        }

        let primary_index = scalars
            .iter()
            .position(|name| name == primary)
            .ok_or_else(|| format!("Primary field {} is not a scalar field", primary))?;

        Ok(FieldSet {
            scalars,
            flags,
            primary: primary_index,
        })
    }

    pub fn n_scalars(&self) -> usize {
        self.scalars.len()
    }

    pub fn n_flags(&self) -> usize {
        self.flags.len()
    }

    /// Index of the primary scalar field within the scalar ordering.
    pub fn primary_index(&self) -> usize {
        self.primary
    }

    pub fn scalar_index(&self, name: &str) -> Option<usize> {
        self.scalars.iter().position(|n| n == name)
    }

    pub fn flag_index(&self, name: &str) -> Option<usize> {
        self.flags.iter().position(|n| n == name)
    }

    pub fn scalar_names(&self) -> &[String] {
        &self.scalars
    }

    pub fn flag_names(&self) -> &[String] {
        &self.flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fieldset_construction() {
        let fields = FieldSet::new(
            names(&["behr_no2", "amf_trop", "cloud_fraction"]),
            names(&["vcd_quality", "xtrack_quality"]),
            "behr_no2",
        )
        .unwrap();

        assert_eq!(fields.n_scalars(), 3);
        assert_eq!(fields.n_flags(), 2);
        assert_eq!(fields.primary_index(), 0);
        assert_eq!(fields.scalar_index("amf_trop"), Some(1));
        assert_eq!(fields.flag_index("xtrack_quality"), Some(1));
        assert_eq!(fields.scalar_index("vcd_quality"), None);
    }

    #[test]
    fn test_fieldset_rejects_empty_scalars() {
        assert!(FieldSet::new(vec![], names(&["flag"]), "x").is_err());
    }

    #[test]
    fn test_fieldset_rejects_duplicates() {
        let dup_scalar = FieldSet::new(names(&["no2", "no2"]), vec![], "no2");
        assert!(dup_scalar.is_err());

        // Duplicates across scalar/flag namespaces are rejected too
        let cross = FieldSet::new(names(&["no2"]), names(&["no2"]), "no2");
        assert!(cross.is_err());
    }

    #[test]
    fn test_fieldset_rejects_unknown_primary() {
        let fields = FieldSet::new(names(&["no2"]), vec![], "amf");
        assert!(fields.is_err());
    }

    #[test]
    fn test_fieldset_rejects_empty_name() {
        assert!(FieldSet::new(names(&["no2", ""]), vec![], "no2").is_err());
    }
}
