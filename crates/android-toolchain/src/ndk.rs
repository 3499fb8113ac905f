//! NDK Manager
//!
//! Maps the packaged Android ABIs to their NDK binaries and writes the cargo
//! configuration that points rustc at the NDK archiver and linker.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// NDK Manager errors
#[derive(Debug, thiserror::Error)]
pub enum NdkError {
    #[error("NDK not found at: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Target ABI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Abi {
    Arm64V8a,
    ArmeabiV7a,
    X86,
}

impl Abi {
    /// Get the clang target prefix for this ABI
    pub fn ndk_triple(&self) -> &'static str {
        match self {
            Abi::Arm64V8a => "aarch64-linux-android",
            Abi::ArmeabiV7a => "armv7a-linux-androideabi",
            Abi::X86 => "i686-linux-android",
        }
    }

    /// Get the binutils prefix for this ABI
    pub fn binutils_prefix(&self) -> &'static str {
        match self {
            Abi::Arm64V8a => "aarch64-linux-android",
            Abi::ArmeabiV7a => "arm-linux-androideabi",
            Abi::X86 => "i686-linux-android",
        }
    }

    /// Get the Rust target triple for this ABI
    pub fn rust_triple(&self) -> &'static str {
        match self {
            Abi::Arm64V8a => "aarch64-linux-android",
            Abi::ArmeabiV7a => "armv7-linux-androideabi",
            Abi::X86 => "i686-linux-android",
        }
    }

    /// Get the ABI name as used in APK lib directory
    pub fn abi_name(&self) -> &'static str {
        match self {
            Abi::Arm64V8a => "arm64-v8a",
            Abi::ArmeabiV7a => "armeabi-v7a",
            Abi::X86 => "x86",
        }
    }

    /// Get all packaged ABIs
    pub fn all() -> &'static [Abi] {
        &[Abi::Arm64V8a, Abi::ArmeabiV7a, Abi::X86]
    }
}

impl fmt::Display for Abi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abi_name())
    }
}

/// NDK binaries used to link for one ABI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub abi: Abi,
    pub ar: PathBuf,
    pub linker: PathBuf,
}

/// Detect the host platform tag
pub fn detect_host_tag() -> &'static str {
    if cfg!(windows) {
        "windows-x86_64"
    } else if cfg!(target_os = "macos") {
        "darwin-x86_64"
    } else {
        "linux-x86_64"
    }
}

/// Resolve the archiver and linker of `abi` inside an NDK
pub fn toolchain(ndk_root: &Path, host_tag: &str, abi: Abi, api_level: u32) -> Toolchain {
    let bin_dir = ndk_root
        .join("toolchains")
        .join("llvm")
        .join("prebuilt")
        .join(host_tag)
        .join("bin");

    Toolchain {
        abi,
        ar: bin_dir.join(format!("{}-ar", abi.binutils_prefix())),
        linker: bin_dir.join(format!("{}{}-clang", abi.ndk_triple(), api_level)),
    }
}

/// Render the cargo configuration for every packaged ABI
pub fn cargo_config(ndk_root: &Path, host_tag: &str, api_level: u32) -> String {
    let mut config = String::new();

    for abi in Abi::all() {
        let toolchain = toolchain(ndk_root, host_tag, *abi, api_level);
        config.push_str(&format!(
            r#"[target.{}]
ar = "{}"
linker = "{}"

"#,
            abi.rust_triple(),
            toolchain.ar.to_string_lossy().replace('\\', "/"),
            toolchain.linker.to_string_lossy().replace('\\', "/"),
        ));
    }

    config
}

/// NDK Manager
pub struct NdkManager {
    ndk_path: PathBuf,
    host_tag: String,
}

impl NdkManager {
    /// Create a new NDK manager from a path
    pub fn from_path(path: PathBuf) -> Result<Self, NdkError> {
        if !path.exists() {
            return Err(NdkError::NotFound(path));
        }

        Ok(Self {
            ndk_path: path,
            host_tag: detect_host_tag().to_string(),
        })
    }

    /// Override the prebuilt host tag
    pub fn with_host_tag(mut self, host_tag: impl Into<String>) -> Self {
        self.host_tag = host_tag.into();
        self
    }

    /// Get cargo configuration for cross-compilation
    pub fn cargo_config(&self, api_level: u32) -> String {
        cargo_config(&self.ndk_path, &self.host_tag, api_level)
    }

    /// Write the cargo config, replacing whatever the destination held
    pub async fn write_cargo_config(&self, destination: &Path, api_level: u32) -> Result<(), NdkError> {
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        if destination.exists() {
            warn!("Overwriting existing cargo config at {:?}", destination);
        }

        tokio::fs::write(destination, self.cargo_config(api_level)).await?;

        info!("Wrote cargo config to {:?}", destination);
        Ok(())
    }
}
