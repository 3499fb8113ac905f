//! Environment Manager
//!
//! Builds the environment handed to child processes: SDK/NDK variables and a
//! `PATH` extended with the NDK root so `ndk-build` resolves.

use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Environment configuration
#[derive(Debug, Clone, Default)]
pub struct EnvironmentConfig {
    /// ANDROID_HOME / ANDROID_SDK_ROOT
    pub android_home: Option<PathBuf>,
    /// ANDROID_NDK_HOME
    pub ndk_home: Option<PathBuf>,
    /// Entries appended to PATH
    pub path_additions: Vec<PathBuf>,
}

impl EnvironmentConfig {
    /// Environment for a run with the given SDK and NDK
    pub fn for_android(sdk: PathBuf, ndk: PathBuf) -> Self {
        Self {
            android_home: Some(sdk),
            path_additions: vec![ndk.clone()],
            ndk_home: Some(ndk),
        }
    }
}

/// Environment Manager
pub struct EnvManager {
    config: EnvironmentConfig,
    base_path: String,
}

impl EnvManager {
    /// Create a new environment manager on top of the current PATH
    pub fn new(config: EnvironmentConfig) -> Self {
        let base_path = std::env::var("PATH")
            .or_else(|_| std::env::var("Path"))
            .unwrap_or_default();

        Self::with_base_path(config, base_path)
    }

    /// Create an environment manager on top of an explicit PATH
    pub fn with_base_path(config: EnvironmentConfig, base_path: impl Into<String>) -> Self {
        Self {
            config,
            base_path: base_path.into(),
        }
    }

    /// Get environment variables to set
    pub fn get_env_vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();

        if let Some(ref path) = self.config.android_home {
            let path_str = path.to_string_lossy().to_string();
            vars.insert("ANDROID_HOME".to_string(), path_str.clone());
            vars.insert("ANDROID_SDK_ROOT".to_string(), path_str);
        }

        if let Some(ref path) = self.config.ndk_home {
            let path_str = path.to_string_lossy().to_string();
            vars.insert("ANDROID_NDK_HOME".to_string(), path_str.clone());
            vars.insert("NDK_HOME".to_string(), path_str);
        }

        vars
    }

    /// Get PATH value with the additions appended
    pub fn get_path(&self) -> String {
        let path_sep = if cfg!(windows) { ";" } else { ":" };

        let mut entries: Vec<String> = Vec::new();
        if !self.base_path.is_empty() {
            entries.push(self.base_path.clone());
        }
        entries.extend(
            self.config
                .path_additions
                .iter()
                .map(|p| p.to_string_lossy().to_string()),
        );

        entries.join(path_sep)
    }

    /// Full environment for a child command, PATH included
    pub fn command_env(&self) -> Vec<(String, String)> {
        let mut env: Vec<(String, String)> = self.get_env_vars().into_iter().collect();
        env.sort();

        let path_key = if cfg!(windows) { "Path" } else { "PATH" };
        env.push((path_key.to_string(), self.get_path()));

        debug!("Child environment: {} variable(s)", env.len());
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_android_environment() {
        let config = EnvironmentConfig::for_android(
            PathBuf::from("/android/sdk"),
            PathBuf::from("/android/ndk"),
        );
        let env = EnvManager::with_base_path(config, "/usr/bin");
        let vars = env.get_env_vars();

        assert_eq!(vars.get("ANDROID_HOME").map(String::as_str), Some("/android/sdk"));
        assert_eq!(vars.get("ANDROID_NDK_HOME").map(String::as_str), Some("/android/ndk"));
    }

    #[cfg(unix)]
    #[test]
    fn test_ndk_appended_to_path() {
        let config = EnvironmentConfig::for_android(
            PathBuf::from("/android/sdk"),
            PathBuf::from("/android/ndk"),
        );
        let env = EnvManager::with_base_path(config, "/usr/bin:/bin");

        assert_eq!(env.get_path(), "/usr/bin:/bin:/android/ndk");

        let command_env = env.command_env();
        let (key, value) = command_env.last().unwrap();
        assert_eq!(key, "PATH");
        assert_eq!(value, "/usr/bin:/bin:/android/ndk");
    }

    #[cfg(unix)]
    #[test]
    fn test_empty_base_path() {
        let config = EnvironmentConfig::for_android(PathBuf::from("/sdk"), PathBuf::from("/ndk"));
        let env = EnvManager::with_base_path(config, "");

        assert_eq!(env.get_path(), "/ndk");
        assert_eq!(env.command_env().len(), 5);
    }
}
