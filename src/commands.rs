//! CLI commands for apkforge
//!
//! Each subcommand is a small struct with an `execute` method so it can be
//! driven from `main` or from tests.

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use apkforge_android_toolchain::ndk::{cargo_config, detect_host_tag};
use apkforge_android_toolchain::{
    EnvManager, EnvironmentConfig, NdkManager, PathStatus, ToolStatus, ToolchainDetector,
};
use apkforge_build_engine::{BuildOutput, BuildRunner};
use apkforge_core::{PipelineConfig, ProjectLayout};

/// Build command options
pub struct BuildCommand {
    pub config: PipelineConfig,
}

impl BuildCommand {
    /// Execute the build command
    pub async fn execute(&self) -> Result<BuildOutput> {
        let runner = BuildRunner::from_config(self.config.clone())?;
        info!("Building project: {:?}", runner.layout().crate_dir);

        let output = runner.run().await?;

        println!("APK built in {}", output.apk_dir.display());
        if let Some(ref apk) = output.apk {
            println!("  {}", apk.display());
        }
        Ok(output)
    }
}

/// Result of an environment check
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub paths: Vec<PathStatus>,
    pub tools: Vec<ToolStatus>,
    pub ok: bool,
}

/// Environment check options
pub struct CheckCommand {
    pub config: PipelineConfig,
    pub json: bool,
}

impl CheckCommand {
    /// Inspect required directories and tools without changing anything
    pub fn report(&self, base: &Path) -> CheckReport {
        let layout = ProjectLayout::resolve(&self.config, base);
        let paths = ToolchainDetector::check_paths(&layout);

        // Tools are looked up the way ndk-build will see them, NDK included
        let env = EnvManager::new(EnvironmentConfig::for_android(
            layout.sdk_path.clone(),
            layout.ndk_path.clone(),
        ));
        let tools = ToolchainDetector::check_tools(env.get_path().as_ref());

        let ok = paths.iter().all(|p| p.exists) && tools.iter().all(|t| t.path.is_some());
        CheckReport { paths, tools, ok }
    }

    /// Print the report; returns whether everything was found
    pub fn execute(&self) -> Result<bool> {
        let cwd = std::env::current_dir()?;
        let report = self.report(&cwd);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(report.ok);
        }

        for status in &report.paths {
            let mark = if status.exists { "ok" } else { "MISSING" };
            println!("{:<8} {:<16} {}", mark, status.name, status.path.display());
        }
        for tool in &report.tools {
            match tool.path {
                Some(ref path) => println!("{:<8} {:<16} {}", "ok", tool.name, path.display()),
                None => println!("{:<8} {:<16} not on PATH", "MISSING", tool.name),
            }
        }

        Ok(report.ok)
    }
}

/// Cargo toolchain config options
pub struct CargoConfigCommand {
    pub config: PipelineConfig,
    pub output: Option<PathBuf>,
}

impl CargoConfigCommand {
    /// Render the cargo config for the configured NDK
    pub fn render(&self, base: &Path) -> String {
        let layout = ProjectLayout::resolve(&self.config, base);
        let host_tag = self
            .config
            .android
            .host_tag
            .clone()
            .unwrap_or_else(|| detect_host_tag().to_string());

        cargo_config(&layout.ndk_path, &host_tag, self.config.android.api_level)
    }

    /// Print the cargo config, or write it to the output file
    pub async fn execute(&self) -> Result<()> {
        let cwd = std::env::current_dir()?;

        match self.output {
            None => print!("{}", self.render(&cwd)),
            Some(ref output) => {
                let layout = ProjectLayout::resolve(&self.config, &cwd);
                let mut ndk = NdkManager::from_path(layout.ndk_path.clone())?;
                if let Some(ref host_tag) = self.config.android.host_tag {
                    ndk = ndk.with_host_tag(host_tag.clone());
                }
                ndk.write_cargo_config(output, self.config.android.api_level)
                    .await
                    .with_context(|| format!("writing {}", output.display()))?;
                println!("Wrote {}", output.display());
            }
        }
        Ok(())
    }
}
