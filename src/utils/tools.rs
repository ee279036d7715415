use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;

use crate::errors::{AppError, AppResult};

// Structure to represent an external tool
#[derive(Debug, Clone)]
pub struct ExternalTool {
    pub name: String,
    pub path: PathBuf,
    pub version: Option<Version>,
    pub min_version: Version,
}

// Global storage for discovered tools
static TOOLS: Lazy<Mutex<Vec<ExternalTool>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Locate the external tools the pipeline shells out to. Currently only
/// yt-dlp; absence is an error telling the user to install it.
pub fn init_tools() -> AppResult<()> {
    info!("Checking external tools...");

    let ytdlp_path = which::which("yt-dlp").map_err(|_| {
        AppError::Tool(
            "yt-dlp not found in PATH. Install it from https://github.com/yt-dlp/yt-dlp"
                .to_string(),
        )
    })?;
    info!("Found yt-dlp at {}", ytdlp_path.display());

    let version = match check_ytdlp_version(&ytdlp_path) {
        Ok(version) => {
            info!("yt-dlp version: {}", version);
            Some(version)
        }
        Err(e) => {
            warn!("Could not determine yt-dlp version: {}", e);
            None
        }
    };

    let tool = ExternalTool {
        name: "yt-dlp".to_string(),
        path: ytdlp_path,
        version,
        min_version: Version::new(2023, 1, 1),
    };
    if let Some(version) = &tool.version {
        if *version < tool.min_version {
            warn!(
                "yt-dlp {} is older than the recommended {}, downloads may fail",
                version, tool.min_version
            );
        }
    }

    let mut tools = TOOLS.lock().unwrap();
    tools.clear();
    tools.push(tool);

    Ok(())
}

/// Get a discovered tool's path by name
pub fn get_tool_path(name: &str) -> Option<PathBuf> {
    TOOLS
        .lock()
        .unwrap()
        .iter()
        .find(|tool| tool.name == name)
        .map(|tool| tool.path.clone())
}

/// Check the yt-dlp version
fn check_ytdlp_version(path: &Path) -> Result<Version> {
    let output = Command::new(path)
        .args(["--version"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .context("Failed to execute yt-dlp")?;

    if !output.status.success() {
        return Err(anyhow!("Failed to get yt-dlp version"));
    }

    let version_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
    parse_ytdlp_version(&version_str)
}

// yt-dlp versions are dates like "2024.08.06"; the zero-padded components
// are not valid semver, so the digits are parsed out explicitly.
fn parse_ytdlp_version(version_str: &str) -> Result<Version> {
    let re = Regex::new(r"(\d{4})\.(\d{1,2})\.(\d{1,2})")?;
    let caps = re
        .captures(version_str)
        .ok_or_else(|| anyhow!("Unrecognized yt-dlp version string: {}", version_str))?;

    let year: u64 = caps[1].parse()?;
    let month: u64 = caps[2].parse()?;
    let day: u64 = caps[3].parse()?;
    Ok(Version::new(year, month, day))
}
