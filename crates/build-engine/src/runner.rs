//! Build Runner
//!
//! Coordinates the entire packaging run: one-time project setup followed by
//! the per-build cross-compilation, packaging and Gradle assembly.

use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use apkforge_android_toolchain::{require_path, Abi, EnvManager, EnvironmentConfig, NdkManager};
use apkforge_core::patcher::{comment_line, toggle_section};
use apkforge_core::{CommentStyle, ForgeError, PipelineConfig, ProjectLayout, SectionAction};

use crate::config::NdkBuildConfig;
use crate::fs::{copy_dir, copy_file, recreate_dir, symlink_dir, CopyMode};
use crate::gradle_build::{write_local_properties, GradleBuild};
use crate::process::{run_checked, CommandRunner, ProcessRunner};
use crate::{BuildError, CargoBuild, NdkBuild};

/// Build output
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Directory Gradle writes the APK to
    pub apk_dir: PathBuf,
    /// The APK itself, when Gradle produced one where expected
    pub apk: Option<PathBuf>,
    /// Whether first-time project setup ran
    pub setup_performed: bool,
    /// ABIs included
    pub abis: Vec<String>,
    /// Cargo build mode used
    pub variant: String,
    /// Build duration in seconds
    pub duration_secs: f64,
}

/// Build progress
#[derive(Debug, Clone)]
pub enum BuildProgress {
    Started,
    Validating,
    SettingUp,
    WritingCargoConfig { path: PathBuf },
    FetchingSdl,
    BuildingSdl { abi: String },
    CreatingProject,
    PreparingDeps,
    Compiling { current: u32, total: u32, target: String },
    Packaging,
    CopyingAssets,
    Assembling,
    Completed { output: BuildOutput },
    Failed { error: String },
}

/// Build runner that coordinates the build process
pub struct BuildRunner<R: CommandRunner = ProcessRunner> {
    config: PipelineConfig,
    layout: ProjectLayout,
    runner: R,
    progress: Option<mpsc::Sender<BuildProgress>>,
}

impl BuildRunner<ProcessRunner> {
    /// Runner executing real child processes, layout resolved from the
    /// working directory
    pub fn from_config(config: PipelineConfig) -> Result<Self, BuildError> {
        let layout = ProjectLayout::from_config(&config)?;
        Ok(Self::new(config, layout, ProcessRunner::inherit()))
    }
}

impl<R: CommandRunner> BuildRunner<R> {
    /// Create a new build runner
    pub fn new(config: PipelineConfig, layout: ProjectLayout, runner: R) -> Self {
        Self {
            config,
            layout,
            runner,
            progress: None,
        }
    }

    /// Report progress on a channel
    pub fn with_progress(mut self, tx: mpsc::Sender<BuildProgress>) -> Self {
        self.progress = Some(tx);
        self
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn command_runner(&self) -> &R {
        &self.runner
    }

    /// Whether this run will generate the Android project
    pub fn needs_setup(&self) -> bool {
        self.config
            .build
            .setup_trigger
            .should_setup(self.layout.project_dir.exists())
    }

    /// Run the build
    pub async fn run(&self) -> Result<BuildOutput, BuildError> {
        let start = Instant::now();
        info!("Starting build for {:?}", self.layout.crate_dir);
        self.emit(BuildProgress::Started).await;

        match self.execute(start).await {
            Ok(output) => {
                info!("Build completed in {:.2}s", output.duration_secs);
                self.emit(BuildProgress::Completed { output: output.clone() }).await;
                Ok(output)
            }
            Err(e) => {
                error!("Build failed: {}", e);
                self.emit(BuildProgress::Failed { error: e.to_string() }).await;
                Err(e)
            }
        }
    }

    async fn execute(&self, start: Instant) -> Result<BuildOutput, BuildError> {
        self.emit(BuildProgress::Validating).await;
        require_path(&self.layout.sdl2_repo, "Rust-SDL2 repo")?;
        require_path(&self.layout.sdk_path, "Android SDK")?;

        let setup_performed = self.needs_setup();
        if setup_performed {
            self.setup_project().await?;
        } else {
            info!("Using existing Android project at {:?}", self.layout.project_dir);
        }

        self.prepare_deps().await?;
        self.compile_targets().await?;
        self.package_libraries().await?;
        self.copy_assets().await?;
        let (apk_dir, apk) = self.assemble().await?;

        Ok(BuildOutput {
            apk_dir,
            apk,
            setup_performed,
            abis: Abi::all().iter().map(|a| a.abi_name().to_string()).collect(),
            variant: self.config.build.mode.as_str().to_string(),
            duration_secs: start.elapsed().as_secs_f64(),
        })
    }

    /// Generate and patch the Android Studio project from the SDL sources
    async fn setup_project(&self) -> Result<(), BuildError> {
        self.emit(BuildProgress::SettingUp).await;
        info!("Setting up Android project at {:?}", self.layout.project_dir);

        require_path(&self.layout.ndk_path, "NDK path")?;
        let mut ndk = NdkManager::from_path(self.layout.ndk_path.clone())?;
        if let Some(ref host_tag) = self.config.android.host_tag {
            ndk = ndk.with_host_tag(host_tag.clone());
        }

        self.emit(BuildProgress::WritingCargoConfig {
            path: self.layout.cargo_config.clone(),
        })
        .await;
        ndk.write_cargo_config(&self.layout.cargo_config, self.config.android.api_level)
            .await?;

        self.emit(BuildProgress::FetchingSdl).await;
        run_checked(&self.runner, &CargoBuild::fetch_sources_command(&self.layout.sdl2_sys_dir())).await?;
        if self.layout.sdl_dir.exists() {
            warn!("Merging SDL sources into existing {:?}", self.layout.sdl_dir);
        }
        copy_dir(&self.layout.sdl_cache_dir(), &self.layout.sdl_dir, CopyMode::Merge)?;

        let env = EnvManager::new(EnvironmentConfig::for_android(
            self.layout.sdk_path.clone(),
            self.layout.ndk_path.clone(),
        ));
        let ndk_build = NdkBuild::new(
            &self.layout.sdl_dir,
            NdkBuildConfig {
                app_platform: self.config.android.app_platform,
                ..Default::default()
            },
        )
        .with_env(env.command_env());

        for abi in Abi::all() {
            self.emit(BuildProgress::BuildingSdl {
                abi: abi.abi_name().to_string(),
            })
            .await;
            ndk_build.build_all(&self.runner, &[*abi]).await?;
        }

        self.emit(BuildProgress::CreatingProject).await;
        copy_dir(&self.layout.sdl_android_project(), &self.layout.project_dir, CopyMode::Fresh)?;
        symlink_dir(&self.layout.sdl_dir, &self.layout.sdl_link())?;

        let gradle = self.layout.build_gradle();
        let commented = toggle_section(&gradle, "ndkBuild", SectionAction::Comment, CommentStyle::DoubleSlash).await?;
        let uncommented = toggle_section(&gradle, "cmake", SectionAction::Uncomment, CommentStyle::DoubleSlash).await?;
        if commented == 0 || uncommented == 0 {
            warn!(
                "Unexpected {:?}: ndkBuild lines commented {}, cmake lines enabled {}",
                gradle, commented, uncommented
            );
        }

        comment_line(&self.layout.cmake_lists(), "add_subdirectory(src)", CommentStyle::Hash).await?;
        write_local_properties(&self.layout.local_properties(), &self.layout.sdk_path).await?;

        info!("Android project ready");
        Ok(())
    }

    /// Put the prebuilt SDL libraries where the linker looks for them
    async fn prepare_deps(&self) -> Result<(), BuildError> {
        self.emit(BuildProgress::PreparingDeps).await;

        for abi in Abi::all() {
            let libs = self.layout.libs_path.join(abi.abi_name());
            if !has_entries(&libs) {
                return Err(ForgeError::missing(format!("SDL libraries for {}", abi.abi_name()), libs).into());
            }

            let deps = self.layout.deps_dir(abi.rust_triple(), self.config.build.mode);
            std::fs::create_dir_all(&deps)?;
            copy_dir(&libs, &deps, CopyMode::Merge)?;
            debug!("Prepared {:?}", deps);
        }
        Ok(())
    }

    async fn compile_targets(&self) -> Result<(), BuildError> {
        let cargo = CargoBuild::new(&self.layout.crate_dir, self.config.build.mode);
        let abis = Abi::all();

        for (i, abi) in abis.iter().enumerate() {
            self.emit(BuildProgress::Compiling {
                current: i as u32 + 1,
                total: abis.len() as u32,
                target: abi.rust_triple().to_string(),
            })
            .await;
            cargo.build_all(&self.runner, &[*abi]).await?;
        }
        Ok(())
    }

    /// Copy each compiled library into a freshly emptied `jniLibs` tree
    async fn package_libraries(&self) -> Result<(), BuildError> {
        self.emit(BuildProgress::Packaging).await;
        recreate_dir(&self.layout.jni_libs_dir())?;

        for abi in Abi::all() {
            let built = self
                .layout
                .target_dir(abi.rust_triple(), self.config.build.mode)
                .join(&self.config.build.lib_name);
            let slot = self.layout.jni_lib_path(abi.abi_name());

            copy_file(&built, &slot)?;
            info!("Packaged {} -> {:?}", abi, slot);
        }
        Ok(())
    }

    async fn copy_assets(&self) -> Result<(), BuildError> {
        self.emit(BuildProgress::CopyingAssets).await;
        recreate_dir(&self.layout.assets_dir())?;
        copy_dir(&self.layout.assets_src, &self.layout.packaged_assets_dir(), CopyMode::Fresh)
    }

    /// Run Gradle, returning its output directory and the APK found there
    async fn assemble(&self) -> Result<(PathBuf, Option<PathBuf>), BuildError> {
        self.emit(BuildProgress::Assembling).await;
        let gradle = GradleBuild::new(&self.layout.project_dir)
            .with_android_home(self.layout.sdk_path.clone());
        let apk = gradle.build(&self.runner).await?;
        Ok((gradle.output_dir(), apk))
    }

    async fn emit(&self, progress: BuildProgress) {
        debug!("{:?}", progress);
        if let Some(ref tx) = self.progress {
            let _ = tx.send(progress).await;
        }
    }
}

/// ndk-build leaves one directory of shared libraries per ABI; an empty or
/// missing one means that ABI never got built
fn has_entries(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
