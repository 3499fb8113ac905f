//! Android Build Engine
//!
//! Drives cargo, ndk-build and Gradle to turn an SDL2 game crate into an APK.

pub mod config;
pub mod process;
pub mod fs;
pub mod cargo_build;
pub mod ndk_build;
pub mod gradle_build;
pub mod runner;

pub use config::NdkBuildConfig;
pub use process::{CommandOutput, CommandRunner, CommandSpec, ProcessRunner};
pub use cargo_build::CargoBuild;
pub use ndk_build::NdkBuild;
pub use gradle_build::GradleBuild;
pub use runner::{BuildRunner, BuildOutput, BuildProgress};

use apkforge_android_toolchain::NdkError;
use apkforge_core::ForgeError;

/// Build errors
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Command `{command}` failed (exit code {}):\n{output}", exit_code(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Copy failed: {0}")]
    CopyFailed(String),
    #[error(transparent)]
    Core(#[from] ForgeError),
    #[error(transparent)]
    Ndk(#[from] NdkError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none".to_string(), // killed by a signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_command_failed_message() {
        let err = BuildError::CommandFailed {
            command: "cargo build --target x86".into(),
            code: Some(101),
            output: "error: could not compile".into(),
        };
        let message = err.to_string();
        assert!(message.contains("cargo build --target x86"));
        assert!(message.contains("101"));
        assert!(message.contains("could not compile"));
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: BuildError = ForgeError::missing("Android SDK", PathBuf::from("/sdk")).into();
        assert_eq!(err.to_string(), "Android SDK not found at: /sdk");
    }
}
