//! ndk-build for the SDL sources
//!
//! Produces the prebuilt SDL shared libraries (`libs/<abi>/`) the game links
//! against.

use std::path::PathBuf;
use tracing::info;

use apkforge_android_toolchain::Abi;

use crate::config::NdkBuildConfig;
use crate::process::{run_checked, CommandRunner, CommandSpec};
use crate::BuildError;

/// ndk-build invocation over an `Android.mk` project
pub struct NdkBuild {
    project_dir: PathBuf,
    config: NdkBuildConfig,
    env: Vec<(String, String)>,
}

impl NdkBuild {
    pub fn new(project_dir: impl Into<PathBuf>, config: NdkBuildConfig) -> Self {
        Self {
            project_dir: project_dir.into(),
            config,
            env: Vec::new(),
        }
    }

    /// Environment for the child, typically a PATH including the NDK
    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }

    /// Command building the SDL modules for one ABI
    pub fn command(&self, abi: Abi) -> CommandSpec {
        CommandSpec::new("ndk-build")
            .args([
                "NDK_PROJECT_PATH=.".to_string(),
                format!("APP_BUILD_SCRIPT={}", self.config.build_script),
                format!("APP_PLATFORM=android-{}", self.config.app_platform),
                format!("APP_ABI={}", abi.abi_name()),
            ])
            .current_dir(&self.project_dir)
            .envs(self.env.iter().cloned())
    }

    /// Build every ABI in order, stopping at the first failure
    pub async fn build_all<R: CommandRunner>(&self, runner: &R, abis: &[Abi]) -> Result<(), BuildError> {
        for abi in abis {
            info!("Building SDL for {}", abi);
            run_checked(runner, &self.command(*abi)).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndk_build_command() {
        let build = NdkBuild::new("/work/SDL", NdkBuildConfig::default())
            .with_env(vec![("PATH".into(), "/usr/bin:/ndk".into())]);
        let cmd = build.command(Abi::Arm64V8a);

        assert_eq!(
            cmd.display(),
            "ndk-build NDK_PROJECT_PATH=. APP_BUILD_SCRIPT=./Android.mk APP_PLATFORM=android-19 APP_ABI=arm64-v8a"
        );
        assert_eq!(cmd.current_dir, Some(PathBuf::from("/work/SDL")));
        assert_eq!(cmd.env, vec![("PATH".to_string(), "/usr/bin:/ndk".to_string())]);
    }
}
