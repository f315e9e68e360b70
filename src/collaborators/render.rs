//! Turning an optimized resume into a downloadable document.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::optimizer::OptimizedResume;
use crate::catalog::Template;
use crate::types::ExportFormat;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("nothing to render: optimized resume is empty")]
    EmptyContent,

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A rendered document ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Save into `dir` (created if missing) and return the written path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, RenderError> {
        let path = dir.join(&self.file_name);
        let io_err = |source| RenderError::Write {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(dir).map_err(io_err)?;
        fs::write(&path, &self.bytes).map_err(io_err)?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "Resume exported");
        Ok(path)
    }
}

/// Produces a document in the requested format.
pub trait DocumentRenderer: Send + Sync {
    fn render(
        &self,
        resume: &OptimizedResume,
        template: &Template,
        format: ExportFormat,
    ) -> Result<Artifact, RenderError>;
}

/// Writes a plain-text draft tagged with the template and requested format.
///
/// The draft stands in for real PDF/DOCX output; the file is named
/// `resume-<template>-<format>.txt` so it is never mistaken for one.
#[derive(Debug, Clone, Default)]
pub struct DraftRenderer;

impl DocumentRenderer for DraftRenderer {
    fn render(
        &self,
        resume: &OptimizedResume,
        template: &Template,
        format: ExportFormat,
    ) -> Result<Artifact, RenderError> {
        if resume.content.trim().is_empty() {
            return Err(RenderError::EmptyContent);
        }

        let rule = "=".repeat(60);
        let body = format!(
            "{rule}\nTemplate: {} ({})\nRequested format: {}\n{rule}\n\n{}\n",
            template.name,
            template.description,
            format.label(),
            resume.content.trim_end(),
        );

        Ok(Artifact {
            file_name: format!("resume-{}-{}.txt", template.id, format.extension()),
            format,
            bytes: body.into_bytes(),
        })
    }
}
