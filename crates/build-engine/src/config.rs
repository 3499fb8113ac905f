//! Tool Configuration
//!
//! Settings for the external build tools driven by the pipeline.

use serde::{Deserialize, Serialize};

/// ndk-build configuration for the SDL sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NdkBuildConfig {
    /// Makefile describing the SDL modules
    pub build_script: String,
    /// `APP_PLATFORM` API level
    pub app_platform: u32,
}

impl Default for NdkBuildConfig {
    fn default() -> Self {
        Self {
            build_script: "./Android.mk".to_string(),
            app_platform: 19,
        }
    }
}
