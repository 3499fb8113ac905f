//! Pipeline Configuration
//!
//! All settings of a packaging run:
//! - Project naming and directory placement
//! - Android SDK/NDK locations
//! - SDL2 source locations
//! - Build mode and artifact names
//!
//! Defaults mirror a stock setup where the game crate, the `rust-sdl2`
//! checkout, the SDL sources and the generated Android project are siblings.

use std::path::{Component, Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ForgeError, Result};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "apkforge.toml";

/// Build variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    Debug,
    #[default]
    Release,
}

impl BuildVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "debug",
            BuildVariant::Release => "release",
        }
    }

    pub fn cargo_flag(&self) -> Option<&'static str> {
        match self {
            BuildVariant::Debug => None,
            BuildVariant::Release => Some("--release"),
        }
    }

    pub fn gradle_task_suffix(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "Debug",
            BuildVariant::Release => "Release",
        }
    }
}

/// When the first-time project setup runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetupTrigger {
    /// Set up the Android project only if its directory is absent
    #[default]
    WhenProjectMissing,
    /// Set up the Android project only if its directory already exists
    WhenProjectPresent,
    /// Never run setup
    Never,
}

impl SetupTrigger {
    /// Decide whether setup should run given the project directory state
    pub fn should_setup(&self, project_exists: bool) -> bool {
        match self {
            SetupTrigger::WhenProjectMissing => !project_exists,
            SetupTrigger::WhenProjectPresent => project_exists,
            SetupTrigger::Never => false,
        }
    }
}

/// Project placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Name of the generated Android Studio project directory
    pub name: String,
    /// Game crate directory (relative paths resolve against the working directory)
    pub crate_dir: PathBuf,
    /// Directory holding the sibling checkouts, relative to the crate
    pub workspace_root: PathBuf,
    /// Assets shipped inside the APK, relative to the crate
    pub assets_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "android_project".to_string(),
            crate_dir: PathBuf::from("."),
            workspace_root: PathBuf::from(".."),
            assets_dir: PathBuf::from("assets"),
        }
    }
}

/// Android SDK/NDK settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidConfig {
    /// Path to Android SDK
    pub sdk_path: PathBuf,
    /// Path to Android NDK
    pub ndk_path: PathBuf,
    /// API level baked into the NDK clang linker names
    pub api_level: u32,
    /// `APP_PLATFORM` passed to ndk-build
    pub app_platform: u32,
    /// NDK prebuilt host tag override (defaults to the current host)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_tag: Option<String>,
}

impl Default for AndroidConfig {
    fn default() -> Self {
        Self {
            sdk_path: PathBuf::from("~/Android/Sdk"),
            ndk_path: PathBuf::from("~/Android/Sdk/ndk/25.2.9519653"),
            api_level: 26,
            app_platform: 19,
            host_tag: None,
        }
    }
}

/// SDL2 source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdlConfig {
    /// rust-sdl2 checkout name under the workspace root
    pub repo: String,
    /// Directory name the SDL sources are copied to under the workspace root
    pub source_dir: String,
    /// Prebuilt SDL shared libraries, one subdirectory per ABI, relative to the crate
    pub libs_path: PathBuf,
}

impl Default for SdlConfig {
    fn default() -> Self {
        Self {
            repo: "rust-sdl2-2.0.18".to_string(),
            source_dir: "SDL".to_string(),
            libs_path: PathBuf::from("../SDL/libs"),
        }
    }
}

/// Build settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// File name of the compiled game library
    pub lib_name: String,
    /// Cargo build mode
    pub mode: BuildVariant,
    /// Destination of the generated cargo toolchain config
    pub cargo_config: PathBuf,
    /// When first-time setup runs
    pub setup_trigger: SetupTrigger,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            lib_name: "libmain.so".to_string(),
            mode: BuildVariant::Release,
            cargo_config: PathBuf::from("~/.cargo/config"),
            setup_trigger: SetupTrigger::WhenProjectMissing,
        }
    }
}

/// Complete configuration of a packaging run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub project: ProjectConfig,
    pub android: AndroidConfig,
    pub sdl: SdlConfig,
    pub build: BuildConfig,
}

impl PipelineConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from file
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ForgeError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        debug!("Loading config from {:?}", path);
        let contents = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&contents)
    }

    /// Load an explicit config file, or `apkforge.toml` from the working
    /// directory when present, or fall back to defaults
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path).await;
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            Self::load(&local).await
        } else {
            info!("No {} found, using defaults", CONFIG_FILE_NAME);
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let contents = toml::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }

    /// Reject values that cannot produce a usable run
    pub fn validate(&self) -> Result<()> {
        if self.project.name.trim().is_empty() {
            return Err(ForgeError::Config("project name must not be empty".into()));
        }
        if self.build.lib_name.trim().is_empty() {
            return Err(ForgeError::Config("library name must not be empty".into()));
        }
        if self.sdl.repo.trim().is_empty() {
            return Err(ForgeError::Config("SDL2 repository name must not be empty".into()));
        }
        if self.android.api_level == 0 || self.android.app_platform == 0 {
            return Err(ForgeError::Config("API levels must be positive".into()));
        }
        Ok(())
    }
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.project.name, "android_project");
        assert_eq!(config.android.sdk_path, PathBuf::from("~/Android/Sdk"));
        assert_eq!(config.sdl.repo, "rust-sdl2-2.0.18");
        assert_eq!(config.build.lib_name, "libmain.so");
        assert_eq!(config.build.mode, BuildVariant::Release);
        assert_eq!(config.build.setup_trigger, SetupTrigger::WhenProjectMissing);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
[project]
name = "my_game"

[build]
mode = "debug"
setup_trigger = "when-project-present"
"#,
        )
        .unwrap();

        assert_eq!(config.project.name, "my_game");
        assert_eq!(config.project.workspace_root, PathBuf::from(".."));
        assert_eq!(config.build.mode, BuildVariant::Debug);
        assert_eq!(config.build.setup_trigger, SetupTrigger::WhenProjectPresent);
        assert_eq!(config.android.api_level, 26);
    }

    #[test]
    fn test_setup_trigger() {
        assert!(SetupTrigger::WhenProjectMissing.should_setup(false));
        assert!(!SetupTrigger::WhenProjectMissing.should_setup(true));
        assert!(SetupTrigger::WhenProjectPresent.should_setup(true));
        assert!(!SetupTrigger::Never.should_setup(false));
    }

    #[test]
    fn test_variant_flags() {
        assert_eq!(BuildVariant::Debug.cargo_flag(), None);
        assert_eq!(BuildVariant::Release.cargo_flag(), Some("--release"));
        assert_eq!(BuildVariant::Release.as_str(), "release");
    }

    #[test]
    fn test_expand_home() {
        let plain = PathBuf::from("/opt/sdk");
        assert_eq!(expand_home(&plain), plain);

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/Android/Sdk")), home.join("Android/Sdk"));
        }
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let mut config = PipelineConfig::default();
        config.project.name = " ".into();
        assert!(matches!(config.validate(), Err(ForgeError::Config(_))));
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apkforge.toml");

        let mut config = PipelineConfig::default();
        config.project.name = "saved".into();
        config.save(&path).await.unwrap();

        let loaded = PipelineConfig::load(&path).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = PipelineConfig::load(Path::new("/nonexistent/apkforge.toml")).await;
        assert!(matches!(result, Err(ForgeError::Config(_))));
    }
}
