use std::fmt;

/// Input-validation errors raised before any grid mutation. Geometric
/// degeneracy is deliberately not represented here: a malformed footprint
/// contributes zero cells instead of failing the orbit.
#[derive(Debug)]
pub enum GridError {
    ScalarCount { expected: usize, got: usize },
    FlagCount { expected: usize, got: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::ScalarCount { expected, got } => write!(
                f,
                "Footprint carries {} scalar values but the field registry has {}",
                got, expected
            ),
            GridError::FlagCount { expected, got } => write!(
                f,
                "Footprint carries {} flag values but the field registry has {}",
                got, expected
            ),
        }
    }
}

impl std::error::Error for GridError {}
