//! Android Toolchain Management
//!
//! Handles the Android side of a packaging run:
//! - Validation of the SDK, NDK and source directories
//! - NDK archiver/linker lookup per ABI and the cargo config built from it
//! - The environment handed to NDK tools

pub mod detector;
pub mod env;
pub mod ndk;

pub use detector::{require_path, PathStatus, ToolStatus, ToolchainDetector};
pub use env::{EnvManager, EnvironmentConfig};
pub use ndk::{Abi, NdkError, NdkManager, Toolchain};

