//! apkforge - Android packaging for SDL2 Rust games
//!
//! Turns a Rust game built on `sdl2` into an installable debug APK by
//! generating an Android Studio project from the SDL sources, cross-compiling
//! the game for every supported ABI and driving Gradle.
//!
//! ## Architecture
//!
//! - `apkforge-core`: configuration, project layout and the build-file patcher
//! - `apkforge-android-toolchain`: SDK/NDK validation, cargo toolchain config
//!   and the NDK tool environment
//! - `apkforge-build-engine`: command runner and the build pipeline

#![warn(clippy::all)]

pub mod commands;

// Re-export main components for library usage
pub use apkforge_core as core;
pub use apkforge_android_toolchain as toolchain;
pub use apkforge_build_engine as build;

/// Prelude module for convenient imports
pub mod prelude {
    pub use apkforge_core::{BuildVariant, PipelineConfig, ProjectLayout, SetupTrigger};
    pub use apkforge_android_toolchain::{Abi, NdkManager, ToolchainDetector};
    pub use apkforge_build_engine::{BuildOutput, BuildRunner, ProcessRunner};
}
