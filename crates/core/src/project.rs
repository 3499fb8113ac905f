//! Project Layout
//!
//! Resolves every directory and file the packaging pipeline reads or writes
//! from a [`PipelineConfig`].

use std::path::{Component, Path, PathBuf};

use crate::config::{expand_home, BuildVariant, PipelineConfig};
use crate::error::Result;

/// File name the SDL Java activity loads the game library from
pub const JNI_LIB_NAME: &str = "libmain.so";

/// Android project skeleton directory inside the SDL sources
pub const SDL_ANDROID_PROJECT: &str = "android-project";

/// Absolute locations used by a packaging run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Game crate root (where cargo runs)
    pub crate_dir: PathBuf,
    /// Parent directory of the sibling checkouts
    pub workspace_root: PathBuf,
    /// rust-sdl2 checkout
    pub sdl2_repo: PathBuf,
    /// SDL sources copied out of the rust-sdl2 build cache
    pub sdl_dir: PathBuf,
    /// Generated Android Studio project
    pub project_dir: PathBuf,
    /// Android SDK root
    pub sdk_path: PathBuf,
    /// Android NDK root
    pub ndk_path: PathBuf,
    /// Prebuilt SDL shared libraries, one directory per ABI
    pub libs_path: PathBuf,
    /// Assets shipped with the game
    pub assets_src: PathBuf,
    /// Generated cargo toolchain config
    pub cargo_config: PathBuf,
}

impl ProjectLayout {
    /// Resolve a layout against the process working directory
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::resolve(config, &cwd))
    }

    /// Resolve a layout against an explicit base directory
    pub fn resolve(config: &PipelineConfig, base: &Path) -> Self {
        let crate_dir = resolve_path(base, &config.project.crate_dir);
        let workspace_root = resolve_path(&crate_dir, &config.project.workspace_root);

        Self {
            sdl2_repo: workspace_root.join(&config.sdl.repo),
            sdl_dir: workspace_root.join(&config.sdl.source_dir),
            project_dir: workspace_root.join(&config.project.name),
            sdk_path: resolve_path(&crate_dir, &config.android.sdk_path),
            ndk_path: resolve_path(&crate_dir, &config.android.ndk_path),
            libs_path: resolve_path(&crate_dir, &config.sdl.libs_path),
            assets_src: resolve_path(&crate_dir, &config.project.assets_dir),
            cargo_config: resolve_path(&crate_dir, &config.build.cargo_config),
            crate_dir,
            workspace_root,
        }
    }

    /// `sdl2-sys` crate inside the rust-sdl2 checkout
    pub fn sdl2_sys_dir(&self) -> PathBuf {
        self.sdl2_repo.join("sdl2-sys")
    }

    /// SDL sources downloaded by the `sdl2-sys` build script
    pub fn sdl_cache_dir(&self) -> PathBuf {
        self.sdl2_sys_dir().join("SDL")
    }

    /// Android project skeleton shipped with SDL
    pub fn sdl_android_project(&self) -> PathBuf {
        self.sdl_dir.join(SDL_ANDROID_PROJECT)
    }

    pub fn app_dir(&self) -> PathBuf {
        self.project_dir.join("app")
    }

    pub fn build_gradle(&self) -> PathBuf {
        self.app_dir().join("build.gradle")
    }

    pub fn jni_dir(&self) -> PathBuf {
        self.app_dir().join("jni")
    }

    pub fn cmake_lists(&self) -> PathBuf {
        self.jni_dir().join("CMakeLists.txt")
    }

    /// Where the SDL source symlink is placed
    pub fn sdl_link(&self) -> PathBuf {
        self.jni_dir().join(self.sdl_dir.file_name().unwrap_or_default())
    }

    pub fn local_properties(&self) -> PathBuf {
        self.project_dir.join("local.properties")
    }

    fn main_dir(&self) -> PathBuf {
        self.app_dir().join("src").join("main")
    }

    pub fn jni_libs_dir(&self) -> PathBuf {
        self.main_dir().join("jniLibs")
    }

    /// Per-ABI slot the packaged library is copied to
    pub fn jni_lib_path(&self, abi_name: &str) -> PathBuf {
        self.jni_libs_dir().join(abi_name).join(JNI_LIB_NAME)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.main_dir().join("assets")
    }

    /// The game reads its files from `assets/` inside the APK asset root
    pub fn packaged_assets_dir(&self) -> PathBuf {
        self.assets_dir().join("assets")
    }

    /// Cargo output directory for a target triple
    pub fn target_dir(&self, triple: &str, mode: BuildVariant) -> PathBuf {
        self.crate_dir.join("target").join(triple).join(mode.as_str())
    }

    /// Directory the linker searches for the prebuilt SDL libraries
    pub fn deps_dir(&self, triple: &str, mode: BuildVariant) -> PathBuf {
        self.target_dir(triple, mode).join("deps")
    }
}

/// Expand `~`, join relative paths onto `base` and fold `.`/`..` lexically
fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    let expanded = expand_home(path);
    if expanded.is_absolute() {
        normalize(&expanded)
    } else {
        normalize(&base.join(expanded))
    }
}

/// Remove `.` and `..` components without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` above the root is the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ProjectLayout {
        let mut config = PipelineConfig::default();
        config.project.crate_dir = PathBuf::from("game");
        config.android.sdk_path = PathBuf::from("/opt/android/sdk");
        ProjectLayout::resolve(&config, Path::new("/work"))
    }

    #[test]
    fn test_sibling_layout() {
        let layout = layout();
        assert_eq!(layout.crate_dir, PathBuf::from("/work/game"));
        assert_eq!(layout.workspace_root, PathBuf::from("/work"));
        assert_eq!(layout.sdl2_repo, PathBuf::from("/work/rust-sdl2-2.0.18"));
        assert_eq!(layout.sdl_dir, PathBuf::from("/work/SDL"));
        assert_eq!(layout.project_dir, PathBuf::from("/work/android_project"));
        assert_eq!(layout.sdk_path, PathBuf::from("/opt/android/sdk"));
        assert_eq!(layout.libs_path, PathBuf::from("/work/SDL/libs"));
    }

    #[test]
    fn test_project_files() {
        let layout = layout();
        let project = PathBuf::from("/work/android_project");
        assert_eq!(layout.build_gradle(), project.join("app/build.gradle"));
        assert_eq!(layout.cmake_lists(), project.join("app/jni/CMakeLists.txt"));
        assert_eq!(layout.sdl_link(), project.join("app/jni/SDL"));
        assert_eq!(layout.local_properties(), project.join("local.properties"));
        assert_eq!(
            layout.jni_lib_path("x86"),
            project.join("app/src/main/jniLibs/x86/libmain.so")
        );
        assert_eq!(
            layout.packaged_assets_dir(),
            project.join("app/src/main/assets/assets")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_dot_components_are_folded() {
        let mut config = PipelineConfig::default();
        config.project.crate_dir = PathBuf::from("./games/./space/");
        config.project.workspace_root = PathBuf::from("../..");
        config.sdl.libs_path = PathBuf::from("../../SDL/./libs");
        let layout = ProjectLayout::resolve(&config, Path::new("/work"));

        assert_eq!(layout.crate_dir, PathBuf::from("/work/games/space"));
        assert_eq!(layout.workspace_root, PathBuf::from("/work"));
        assert_eq!(layout.libs_path, PathBuf::from("/work/SDL/libs"));

        assert_eq!(normalize(Path::new("/../a/../../b")), PathBuf::from("/b"));
        assert_eq!(normalize(Path::new("../x/../../y")), PathBuf::from("../../y"));
    }

    #[test]
    fn test_target_dirs() {
        let layout = layout();
        assert_eq!(
            layout.deps_dir("aarch64-linux-android", BuildVariant::Release),
            PathBuf::from("/work/game/target/aarch64-linux-android/release/deps")
        );
    }
}
