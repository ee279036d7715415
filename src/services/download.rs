use async_trait::async_trait;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::errors::{AppError, AppResult};
use crate::utils::common::check_file_exists_and_valid;
use crate::utils::tools::get_tool_path;

/// Fetches a video URL into a local media file. The pipeline only depends on
/// this trait; tests substitute their own implementation.
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    /// Download `url` into the directory of `dest_stem`, returning the path
    /// of the media file. The caller owns the directory and its cleanup.
    async fn fetch(&self, url: &str, dest_stem: &Path) -> AppResult<PathBuf>;
}

/// yt-dlp backed downloader. Audio is extracted to m4a so the output path is
/// known up front instead of being discovered by scanning the directory.
pub struct YtDlpFetcher {
    ytdlp: PathBuf,
}

impl YtDlpFetcher {
    pub fn new(ytdlp: PathBuf) -> Self {
        Self { ytdlp }
    }

    /// Build a fetcher from the tool registry populated by
    /// [`crate::utils::tools::init_tools`].
    pub fn from_tools() -> AppResult<Self> {
        let ytdlp = get_tool_path("yt-dlp")
            .ok_or_else(|| AppError::Tool("yt-dlp not found".to_string()))?;
        Ok(Self::new(ytdlp))
    }
}

fn download_args(url: &str, output_template: &str) -> Vec<String> {
    vec![
        url.to_string(),
        "--format".to_string(),
        "bestaudio[ext=m4a]/bestaudio".to_string(),
        "--extract-audio".to_string(),
        "--audio-format".to_string(),
        "m4a".to_string(),
        "--output".to_string(),
        output_template.to_string(),
        "--no-playlist".to_string(),
        "--no-warnings".to_string(),
        "--no-mtime".to_string(),
        "--restrict-filenames".to_string(),
    ]
}

/// Fallback output discovery: first directory entry whose name starts with
/// the requested stem. Sorted so repeated runs pick the same file.
async fn find_file_by_stem(dir: &Path, stem: &str) -> AppResult<PathBuf> {
    let mut matches = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        if name.to_string_lossy().starts_with(stem) {
            matches.push(entry.path());
        }
    }
    matches.sort();

    matches.into_iter().next().ok_or_else(|| {
        AppError::Download(format!(
            "no downloaded file matching '{}' found in {}",
            stem,
            dir.display()
        ))
    })
}

#[async_trait]
impl MediaDownloader for YtDlpFetcher {
    async fn fetch(&self, url: &str, dest_stem: &Path) -> AppResult<PathBuf> {
        info!("Starting download for URL: {}", url);

        // yt-dlp fills in the extension; forcing m4a makes it predictable
        let output_template = format!("{}.%(ext)s", dest_stem.display());
        let expected_path = dest_stem.with_extension("m4a");
        debug!("Output template: {}", output_template);
        debug!("Expected media path: {}", expected_path.display());

        let output = Command::new(&self.ytdlp)
            .args(download_args(url, &output_template))
            .output()
            .await
            .map_err(|e| AppError::Download(format!("failed to launch yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Download(format!(
                "yt-dlp exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        if check_file_exists_and_valid(&expected_path).await {
            info!("Download completed: {}", expected_path.display());
            return Ok(expected_path);
        }

        // The expected path should exist after a successful run; scan for a
        // stem match in case yt-dlp chose a different container anyway.
        warn!(
            "Expected file not found at {}, scanning directory",
            expected_path.display()
        );
        let dir = dest_stem.parent().unwrap_or_else(|| Path::new("."));
        let stem = dest_stem
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let found = find_file_by_stem(dir, &stem).await?;
        info!("Download completed: {}", found.display());
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_force_audio_extraction_and_template() {
        let args = download_args("https://example.com/v", "/tmp/work/video_1.%(ext)s");
        assert_eq!(args[0], "https://example.com/v");
        assert!(args.contains(&"--extract-audio".to_string()));
        assert!(args.contains(&"m4a".to_string()));
        assert!(args.contains(&"/tmp/work/video_1.%(ext)s".to_string()));
        assert!(args.contains(&"--no-playlist".to_string()));
    }

    #[tokio::test]
    async fn stem_scan_picks_deterministic_match() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("video_1.webm"), b"a").unwrap();
        std::fs::write(dir.path().join("video_1.m4a"), b"b").unwrap();
        std::fs::write(dir.path().join("other.m4a"), b"c").unwrap();

        let found = find_file_by_stem(dir.path(), "video_1").await.unwrap();
        assert_eq!(found.file_name().unwrap().to_string_lossy(), "video_1.m4a");
    }

    #[tokio::test]
    async fn stem_scan_fails_when_nothing_matches() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("other.m4a"), b"c").unwrap();

        let err = find_file_by_stem(dir.path(), "video_1").await.unwrap_err();
        assert!(matches!(err, AppError::Download(_)));
    }
}
