use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Target roles offered as suggestions. Users may type any other label.
pub const PRESET_ROLES: &[&str] = &[
    "Frontend Developer",
    "Backend Developer",
    "Full Stack Developer",
    "Data Analyst",
    "Product Manager",
    "DevOps Engineer",
];

/// The uploaded candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl Document {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn pdf(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self::new(name, PDF_CONTENT_TYPE, bytes)
    }

    /// Reads a PDF from disk, naming it after the file.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume.pdf".to_string());
        Ok(Self::pdf(name, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Free-text label naming the job the document is evaluated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub label: String,
}

impl Role {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.label.trim().is_empty()
    }
}
