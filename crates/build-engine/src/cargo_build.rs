//! Cargo Build for the Android targets
//!
//! Cross-compiles the game library once per ABI and fetches the SDL sources
//! through the `sdl2-sys` build script.

use std::path::{Path, PathBuf};
use tracing::info;

use apkforge_android_toolchain::Abi;
use apkforge_core::BuildVariant;

use crate::process::{run_checked, CommandRunner, CommandSpec};
use crate::BuildError;

/// Cargo build for Android
pub struct CargoBuild {
    crate_dir: PathBuf,
    variant: BuildVariant,
}

impl CargoBuild {
    /// Create a new cargo builder
    pub fn new(crate_dir: impl Into<PathBuf>, variant: BuildVariant) -> Self {
        Self {
            crate_dir: crate_dir.into(),
            variant,
        }
    }

    /// `cargo build` inside `sdl2-sys`; only the side effect of downloading
    /// the SDL sources into the crate is needed
    pub fn fetch_sources_command(sdl2_sys_dir: &Path) -> CommandSpec {
        CommandSpec::new("cargo").arg("build").current_dir(sdl2_sys_dir)
    }

    /// Command building the game library for one ABI
    pub fn target_command(&self, abi: Abi) -> CommandSpec {
        let mut cmd = CommandSpec::new("cargo")
            .args(["build", "--target", abi.rust_triple()])
            .current_dir(&self.crate_dir);

        if let Some(flag) = self.variant.cargo_flag() {
            cmd = cmd.arg(flag);
        }

        cmd
    }

    /// Build every ABI in order, stopping at the first failure
    pub async fn build_all<R: CommandRunner>(&self, runner: &R, abis: &[Abi]) -> Result<(), BuildError> {
        for abi in abis {
            info!("Building {} ({})", abi, abi.rust_triple());
            run_checked(runner, &self.target_command(*abi)).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::RecordingRunner;

    #[test]
    fn test_release_target_command() {
        let build = CargoBuild::new("/game", BuildVariant::Release);
        let cmd = build.target_command(Abi::ArmeabiV7a);
        assert_eq!(cmd.display(), "cargo build --target armv7-linux-androideabi --release");
        assert_eq!(cmd.current_dir, Some(PathBuf::from("/game")));
    }

    #[test]
    fn test_debug_target_command() {
        let build = CargoBuild::new("/game", BuildVariant::Debug);
        let cmd = build.target_command(Abi::X86);
        assert_eq!(cmd.display(), "cargo build --target i686-linux-android");
    }

    #[test]
    fn test_fetch_sources_command() {
        let cmd = CargoBuild::fetch_sources_command(Path::new("/rust-sdl2/sdl2-sys"));
        assert_eq!(cmd.display(), "cargo build");
        assert_eq!(cmd.current_dir, Some(PathBuf::from("/rust-sdl2/sdl2-sys")));
    }

    #[tokio::test]
    async fn test_build_all_stops_at_failure() {
        let runner = RecordingRunner::failing_when(|spec| spec.has_arg("armv7-linux-androideabi"));
        let build = CargoBuild::new("/game", BuildVariant::Release);

        let result = build.build_all(&runner, Abi::all()).await;
        assert!(matches!(result, Err(BuildError::CommandFailed { .. })));

        let commands = runner.commands();
        assert_eq!(commands.len(), 2);
        assert!(!commands.iter().any(|c| c.has_arg("i686-linux-android")));
    }
}
