//! Gradle Build for the generated Android project
//!
//! Wraps the project's Gradle wrapper and the `local.properties` it reads.

use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

use apkforge_core::BuildVariant;

use crate::process::{run_checked, CommandRunner, CommandSpec};
use crate::BuildError;

/// Gradle build for Android
pub struct GradleBuild {
    project_dir: PathBuf,
    variant: BuildVariant,
    android_home: Option<PathBuf>,
}

impl GradleBuild {
    /// Create a new Gradle builder; the SDL project is assembled as a debug APK
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            variant: BuildVariant::Debug,
            android_home: None,
        }
    }

    /// Set ANDROID_HOME
    pub fn with_android_home(mut self, path: PathBuf) -> Self {
        self.android_home = Some(path);
        self
    }

    /// Get gradlew path
    fn gradlew_path(&self) -> PathBuf {
        let wrapper_name = if cfg!(windows) { "gradlew.bat" } else { "gradlew" };
        self.project_dir.join(wrapper_name)
    }

    /// Command running the assemble task through the wrapper
    pub fn assemble_command(&self) -> CommandSpec {
        let task = format!("assemble{}", self.variant.gradle_task_suffix());

        let mut cmd = CommandSpec::new(self.gradlew_path().to_string_lossy())
            .arg(task)
            .current_dir(&self.project_dir);

        if let Some(ref android_home) = self.android_home {
            let home = android_home.to_string_lossy().to_string();
            cmd = cmd.envs([
                ("ANDROID_HOME".to_string(), home.clone()),
                ("ANDROID_SDK_ROOT".to_string(), home),
            ]);
        }

        cmd
    }

    /// Build the project and return the first package found, if any
    pub async fn build<R: CommandRunner>(&self, runner: &R) -> Result<Option<PathBuf>, BuildError> {
        info!("Building Android app with Gradle...");
        run_checked(runner, &self.assemble_command()).await?;
        info!("Gradle build completed successfully");

        Ok(self.find_output())
    }

    /// Output directory for the configured variant
    pub fn output_dir(&self) -> PathBuf {
        self.project_dir
            .join("app")
            .join("build")
            .join("outputs")
            .join("apk")
            .join(self.variant.as_str())
    }

    /// Find the output APK
    pub fn find_output(&self) -> Option<PathBuf> {
        let dir = self.output_dir();
        if !dir.exists() {
            return None;
        }

        WalkDir::new(&dir)
            .max_depth(4)
            .into_iter()
            .filter_map(|e| e.ok())
            .find(|e| e.path().extension().map(|ext| ext == "apk").unwrap_or(false))
            .map(|e| e.path().to_path_buf())
    }
}

/// Write `local.properties` pointing Gradle at the SDK
pub async fn write_local_properties(path: &Path, sdk_path: &Path) -> Result<(), BuildError> {
    let contents = format!("sdk.dir={}\n", sdk_path.display());
    tokio::fs::write(path, contents).await?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::RecordingRunner;
    use tempfile::TempDir;

    #[test]
    fn test_assemble_command() {
        let build = GradleBuild::new("/work/android_project")
            .with_android_home(PathBuf::from("/sdk"));
        let cmd = build.assemble_command();

        assert!(cmd.program.ends_with("gradlew") || cmd.program.ends_with("gradlew.bat"));
        assert_eq!(cmd.args, vec!["assembleDebug".to_string()]);
        assert_eq!(cmd.current_dir, Some(PathBuf::from("/work/android_project")));
        assert!(cmd.env.contains(&("ANDROID_HOME".to_string(), "/sdk".to_string())));
    }

    #[test]
    fn test_output_dir() {
        let build = GradleBuild::new("/work/android_project");
        assert_eq!(
            build.output_dir(),
            PathBuf::from("/work/android_project/app/build/outputs/apk/debug")
        );
    }

    #[tokio::test]
    async fn test_build_finds_apk() {
        let temp = TempDir::new().unwrap();
        let build = GradleBuild::new(temp.path());

        let out = build.output_dir();
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("app-debug.apk"), b"PK").unwrap();

        let runner = RecordingRunner::new();
        let apk = build.build(&runner).await.unwrap();

        assert_eq!(apk, Some(out.join("app-debug.apk")));
        assert_eq!(runner.commands().len(), 1);
    }

    #[tokio::test]
    async fn test_build_failure() {
        let runner = RecordingRunner::failing_when(|spec| spec.has_arg("assembleDebug"));
        let result = GradleBuild::new("/nowhere").build(&runner).await;
        assert!(matches!(result, Err(BuildError::CommandFailed { .. })));
    }

    #[tokio::test]
    async fn test_write_local_properties() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("local.properties");

        write_local_properties(&path, Path::new("/home/dev/Android/Sdk")).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "sdk.dir=/home/dev/Android/Sdk\n");
    }
}
