//! Format trait definition
//!
//! This module defines the Format trait that every document reader and writer implements.
//! A format is identified by its file suffix and extension: `novel_manuscript.odt` is the
//! `_manuscript` format with extension `odt`.

use crate::error::FormatError;
use crate::model::Project;

/// Serialized output produced by a [`Format`] implementation.
pub enum SerializedDocument {
    /// UTF-8 text output (HTML, CSV)
    Text(String),
    /// Binary output (zipped ODF packages)
    Binary(Vec<u8>),
}

impl SerializedDocument {
    /// Consume the serialized output and return the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            SerializedDocument::Text(text) => text.into_bytes(),
            SerializedDocument::Binary(bytes) => bytes,
        }
    }
}

/// Values a writer needs besides the project itself.
#[derive(Debug, Clone)]
pub struct ExportContext {
    /// File name of the target without suffix and extension, URL quoted.
    pub project_name: String,
    /// Directory of the target, URL quoted with forward slashes.
    pub project_path: String,
    /// Locale used when the project carries none.
    pub fallback_language: String,
    pub fallback_country: String,
    /// Timestamp written into document metadata.
    pub datetime: String,
}

impl ExportContext {
    pub fn new(project_name: impl Into<String>, project_path: impl Into<String>) -> Self {
        ExportContext {
            project_name: project_name.into(),
            project_path: project_path.into(),
            fallback_language: "en".to_string(),
            fallback_country: "US".to_string(),
            datetime: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }

    pub fn with_fallback_locale(mut self, language: &str, country: &str) -> Self {
        self.fallback_language = language.to_string();
        self.fallback_country = country.to_string();
        self
    }
}

impl Default for ExportContext {
    fn default() -> Self {
        ExportContext::new("", "")
    }
}

/// Trait for document formats
///
/// Readers turn a document into a partial [`Project`] holding only what the document carries;
/// the merge engine reconciles it with the stored project. Writers render a full project.
///
/// # Examples
///
/// ```ignore
/// struct SceneDescriptions;
///
/// impl Format for SceneDescriptions {
///     fn name(&self) -> &str {
///         "html-scenes"
///     }
///
///     fn suffix(&self) -> &str {
///         "_scenes"
///     }
///
///     fn extension(&self) -> &str {
///         "html"
///     }
///
///     fn supports_parsing(&self) -> bool {
///         true
///     }
///
///     fn parse(&self, source: &[u8]) -> Result<Project, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// Unique name of this format (e.g., "odt-manuscript", "csv-scenelist")
    fn name(&self) -> &str;

    /// Human readable description
    fn description(&self) -> &str {
        ""
    }

    /// File name suffix in front of the extension (e.g., "_manuscript"); may be empty
    fn suffix(&self) -> &str;

    /// File extension without the leading dot
    fn extension(&self) -> &str;

    /// Whether this format can be read back into a project
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format can be written from a project
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse a document into a partial project
    ///
    /// Default implementation returns UnsupportedFormat.
    fn parse(&self, _source: &[u8]) -> Result<Project, FormatError> {
        Err(FormatError::UnsupportedFormat(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Render a project into this format
    ///
    /// Default implementation returns UnsupportedFormat.
    fn serialize(
        &self,
        _project: &Project,
        _ctx: &ExportContext,
    ) -> Result<SerializedDocument, FormatError> {
        Err(FormatError::UnsupportedFormat(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }

    /// `<suffix>.<extension>`, the file name ending that selects this format
    fn file_ending(&self) -> String {
        format!("{}.{}", self.suffix(), self.extension())
    }
}
