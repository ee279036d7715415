use log::info;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::AppResult;
use crate::models::VideoResult;

/// Download name of the exported bundle
pub const ARCHIVE_FILE_NAME: &str = "youtube_transcripts.zip";
/// Content type for serving the bundle as a download
pub const ARCHIVE_MIME_TYPE: &str = "application/zip";

fn separator() -> String {
    "=".repeat(50)
}

pub fn arabic_artifact(result: &VideoResult) -> String {
    format!(
        "Video URL: {}\n\nARABIC TRANSCRIPT:\n{}",
        result.url, result.arabic
    )
}

pub fn english_artifact(result: &VideoResult) -> String {
    format!(
        "Video URL: {}\n\nENGLISH TRANSLATION:\n{}",
        result.url, result.english
    )
}

pub fn combined_artifact(result: &VideoResult) -> String {
    format!(
        "Video URL: {}\n\nARABIC TRANSCRIPT:\n{}\n\n{}\n\nENGLISH TRANSLATION:\n{}",
        result.url,
        result.arabic,
        separator(),
        result.english
    )
}

/// Serialize every result into three text files (source, target, combined)
/// and bundle them as an in-memory zip. Nothing is persisted; the caller
/// decides where the bytes go.
pub fn package_results(results: &[VideoResult]) -> AppResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for result in results {
        zip.start_file(format!("transcript_arabic_{}.txt", result.index), options)?;
        zip.write_all(arabic_artifact(result).as_bytes())?;

        zip.start_file(format!("transcript_english_{}.txt", result.index), options)?;
        zip.write_all(english_artifact(result).as_bytes())?;

        zip.start_file(format!("transcript_both_{}.txt", result.index), options)?;
        zip.write_all(combined_artifact(result).as_bytes())?;
    }

    let cursor = zip.finish()?;
    let bytes = cursor.into_inner();
    info!(
        "Packaged {} result(s) into {} byte archive",
        results.len(),
        bytes.len()
    );
    Ok(bytes)
}
