//! Toolchain Detection
//!
//! Verifies that the directories and executables a packaging run depends on
//! are present before anything destructive happens.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use serde::Serialize;
use tracing::debug;
use which::which_in;

use apkforge_core::{ForgeError, ProjectLayout};

/// External executables the pipeline shells out to
pub const REQUIRED_TOOLS: &[&str] = &["cargo", "ndk-build"];

/// Fail with a missing-dependency error if `path` does not exist
pub fn require_path(path: &Path, name: &str) -> apkforge_core::Result<()> {
    if path.exists() {
        debug!("{} found at {:?}", name, path);
        Ok(())
    } else {
        Err(ForgeError::missing(name, path))
    }
}

/// Presence of one required directory
#[derive(Debug, Clone, Serialize)]
pub struct PathStatus {
    pub name: String,
    pub path: PathBuf,
    pub exists: bool,
}

/// Location of one required executable
#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub path: Option<PathBuf>,
}

/// Toolchain detector
pub struct ToolchainDetector;

impl ToolchainDetector {
    /// Directories a full run needs, labelled for reporting
    pub fn required_paths(layout: &ProjectLayout) -> Vec<(&'static str, PathBuf)> {
        vec![
            ("Rust-SDL2 repo", layout.sdl2_repo.clone()),
            ("Android SDK", layout.sdk_path.clone()),
            ("NDK path", layout.ndk_path.clone()),
            ("Assets", layout.assets_src.clone()),
        ]
    }

    /// Check every required directory
    pub fn check_paths(layout: &ProjectLayout) -> Vec<PathStatus> {
        Self::required_paths(layout)
            .into_iter()
            .map(|(name, path)| PathStatus {
                name: name.to_string(),
                exists: path.exists(),
                path,
            })
            .collect()
    }

    /// Look up a tool on the given search path
    pub fn find_tool(name: &str, search_path: &OsStr) -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        which_in(name, Some(search_path), cwd).ok()
    }

    /// Check every required tool on the given search path
    pub fn check_tools(search_path: &OsStr) -> Vec<ToolStatus> {
        REQUIRED_TOOLS
            .iter()
            .map(|name| ToolStatus {
                name: name.to_string(),
                path: Self::find_tool(name, search_path),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apkforge_core::PipelineConfig;

    #[test]
    fn test_require_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(require_path(dir.path(), "Android SDK").is_ok());

        let missing = dir.path().join("missing");
        let err = require_path(&missing, "Android SDK").unwrap_err();
        assert!(matches!(err, ForgeError::MissingDependency { ref name, .. } if name == "Android SDK"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_check_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.android.sdk_path = dir.path().to_path_buf();
        config.android.ndk_path = dir.path().join("no-ndk");

        let layout = ProjectLayout::resolve(&config, dir.path());
        let statuses = ToolchainDetector::check_paths(&layout);

        let sdk = statuses.iter().find(|s| s.name == "Android SDK").unwrap();
        let ndk = statuses.iter().find(|s| s.name == "NDK path").unwrap();
        assert!(sdk.exists);
        assert!(!ndk.exists);
    }

    #[test]
    fn test_find_tool_on_empty_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ToolchainDetector::find_tool("ndk-build", dir.path().as_os_str()).is_none());
    }
}
