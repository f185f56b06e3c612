use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    DateOrder,
    DateParse(chrono::ParseError),
    Bounds(String),
    Fields(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DateOrder => write!(f, "end_date cannot be earlier than start_date"),
            ConfigError::DateParse(e) => write!(f, "Failed to parse date: {}", e),
            ConfigError::Bounds(e) => write!(f, "Invalid grid bounds: {}", e),
            ConfigError::Fields(e) => write!(f, "Invalid field registry: {}", e),
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse JSON: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<chrono::ParseError> for ConfigError {
    fn from(err: chrono::ParseError) -> ConfigError {
        ConfigError::DateParse(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::Json(err)
    }
}
