//! Resume file intake.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::types::ResumeFormat;

/// Default upload size limit (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Shortest run of printable characters kept by text extraction.
const MIN_TEXT_RUN: usize = 4;

/// A resume file accepted by the upload handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedResume {
    pub file_name: String,
    pub format: ResumeFormat,
    pub size_bytes: u64,
    /// Best-effort plain text pulled from the file
    pub extracted_text: String,
}

/// Why an upload was refused. `Display` is the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("Invalid file type. Please upload a PDF or Word document.")]
    InvalidType { file_name: String },

    #[error("File too large. Maximum size is {}.", format_size(*limit_bytes))]
    TooLarge { size_bytes: u64, limit_bytes: u64 },

    #[error("Could not read {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Could not read any text from this file.")]
    NoText { file_name: String },
}

/// Accepts or rejects a resume file.
pub trait UploadHandler: Send + Sync {
    fn upload(&self, path: &Path) -> Result<UploadedResume, UploadRejection>;
}

/// Reads resumes from the local file system.
#[derive(Debug, Clone)]
pub struct LocalUploadHandler {
    max_bytes: u64,
}

impl Default for LocalUploadHandler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

impl LocalUploadHandler {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }
}

impl UploadHandler for LocalUploadHandler {
    fn upload(&self, path: &Path) -> Result<UploadedResume, UploadRejection> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ResumeFormat::from_extension)
            .ok_or_else(|| UploadRejection::InvalidType {
                file_name: file_name.clone(),
            })?;

        let unreadable = |e: std::io::Error| UploadRejection::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let size_bytes = fs::metadata(path).map_err(unreadable)?.len();
        if size_bytes > self.max_bytes {
            return Err(UploadRejection::TooLarge {
                size_bytes,
                limit_bytes: self.max_bytes,
            });
        }

        let bytes = fs::read(path).map_err(unreadable)?;
        let extracted_text = extract_text(&bytes);
        if extracted_text.trim().is_empty() {
            return Err(UploadRejection::NoText { file_name });
        }
        tracing::debug!(file = %file_name, %format, size_bytes, "Resume accepted");

        Ok(UploadedResume {
            file_name,
            format,
            size_bytes,
            extracted_text,
        })
    }
}

/// Pull readable text out of a document without parsing its container.
///
/// Keeps runs of at least four printable ASCII characters and joins them
/// with single spaces. Good enough for keyword scoring of plain or lightly
/// encoded files.
pub fn extract_text(bytes: &[u8]) -> String {
    let mut runs: Vec<String> = Vec::new();
    let mut current = String::new();

    for &b in bytes {
        if b.is_ascii_graphic() || b == b' ' {
            current.push(b as char);
        } else {
            flush_run(&mut current, &mut runs);
        }
    }
    flush_run(&mut current, &mut runs);

    runs.join(" ")
}

fn flush_run(current: &mut String, runs: &mut Vec<String>) {
    let trimmed = current.trim();
    if trimmed.len() >= MIN_TEXT_RUN {
        runs.push(trimmed.to_string());
    }
    current.clear();
}

/// Human-readable byte count ("5MB", "512KB", "12 bytes").
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= MIB {
        format!("{:.1}MB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}
