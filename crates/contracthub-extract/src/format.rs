//! File format detection from URLs and declared MIME types.

use reqwest::Url;

use contracthub_core::error::AppError;
use contracthub_core::result::AppResult;
use contracthub_core::traits::FileFormat;

/// Extensions in match order; `.docx` precedes `.doc` because it contains it.
const EXTENSIONS: [(&str, FileFormat); 3] = [
    (".pdf", FileFormat::Pdf),
    (".docx", FileFormat::Docx),
    (".doc", FileFormat::Doc),
];

/// Determine the document format of `file_url`.
///
/// Checked in order: the path suffix, an extension anywhere in the last
/// path segment, then a `contentType` query parameter. Strings that do not
/// parse as URLs, such as bare object keys, get the path checks only.
pub fn detect_format(file_url: &str) -> AppResult<FileFormat> {
    let detected = match Url::parse(file_url) {
        Ok(url) => from_path(url.path()).or_else(|| from_content_type(&url)),
        Err(_) => {
            let path = file_url.split(['?', '#']).next().unwrap_or_default();
            from_path(path)
        }
    };

    detected.ok_or_else(|| {
        AppError::unsupported_format(
            "Unsupported file type: only PDF and DOCX files can be processed",
        )
    })
}

fn from_path(path: &str) -> Option<FileFormat> {
    let path = path.to_ascii_lowercase();
    if let Some((_, format)) = EXTENSIONS.iter().find(|(ext, _)| path.ends_with(ext)) {
        return Some(*format);
    }

    let last_segment = path.rsplit('/').next().unwrap_or_default();
    EXTENSIONS
        .iter()
        .find(|(ext, _)| last_segment.contains(ext))
        .map(|(_, format)| *format)
}

fn from_content_type(url: &Url) -> Option<FileFormat> {
    let (_, content_type) = url.query_pairs().find(|(k, _)| k == "contentType")?;
    let content_type = content_type.to_ascii_lowercase();
    if content_type.contains("pdf") {
        Some(FileFormat::Pdf)
    } else if content_type.contains("docx") || content_type.contains("document") {
        Some(FileFormat::Docx)
    } else {
        None
    }
}

/// Interpret a stored MIME/type string. Used only to flag mismatches.
pub fn declared_format(declared: &str) -> Option<FileFormat> {
    let declared = declared.trim().to_ascii_lowercase();
    if declared.contains("pdf") {
        Some(FileFormat::Pdf)
    } else if declared.contains("wordprocessingml") || declared.contains("docx") {
        Some(FileFormat::Docx)
    } else if declared == "application/msword" || declared == "doc" {
        Some(FileFormat::Doc)
    } else {
        None
    }
}
