//! apkforge Core - Configuration and shared types
//!
//! This crate holds what every stage of the packaging pipeline shares:
//! the run configuration, the resolved project layout, the build-file
//! patcher and the common error type.

pub mod config;
pub mod error;
pub mod patcher;
pub mod project;

pub use config::{BuildVariant, PipelineConfig, SetupTrigger};
pub use error::{ForgeError, Result};
pub use patcher::{CommentStyle, SectionAction};
pub use project::ProjectLayout;

/// apkforge version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "apkforge";
