//! Error types for apkforge
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for apkforge
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{name} not found at: {}", .path.display())]
    MissingDependency { name: String, path: PathBuf },

    #[error("Could not find line \"{line}\" in file {}", .file.display())]
    LineNotFound { line: String, file: PathBuf },
}

/// Result type alias for apkforge operations
pub type Result<T> = std::result::Result<T, ForgeError>;

impl ForgeError {
    /// Build a missing-dependency error for a labelled path
    pub fn missing(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ForgeError::MissingDependency {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_message() {
        let err = ForgeError::missing("Android SDK", "/opt/sdk");
        assert_eq!(err.to_string(), "Android SDK not found at: /opt/sdk");
        assert!(matches!(err, ForgeError::MissingDependency { ref name, .. } if name == "Android SDK"));
    }

    #[test]
    fn test_line_not_found_message() {
        let err = ForgeError::LineNotFound {
            line: "add_subdirectory(src)".into(),
            file: PathBuf::from("app/jni/CMakeLists.txt"),
        };
        assert!(err.to_string().contains("\"add_subdirectory(src)\""));
        assert!(err.to_string().contains("CMakeLists.txt"));
    }
}
