//! Format registry for format discovery and selection
//!
//! Formats are registered by name and found by the file name ending they handle. A document
//! `novel_scenes.odt` belongs to the format whose `<suffix>.<extension>` is the longest ending of
//! the file name, so `_scenes.odt` wins over the unsuffixed `.odt`.

use crate::error::FormatError;
use crate::format::{ExportContext, Format, SerializedDocument};
use crate::formats::common::table::ListKind;
use crate::formats::{
    CsvFormat, HtmlDocument, HtmlFormat, OdsFormat, OdtDocument, OdtFormat, Yw7Format,
};
use crate::model::Project;
use std::collections::HashMap;

/// Extensions tried in this order when an export names only a suffix.
const EXPORT_PREFERENCE: &[&str] = &["odt", "ods", "html", "csv"];

/// Registry of document formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let format = registry.detect("novel_scenes.odt")?;
/// let partial = format.parse(&bytes)?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::UnsupportedFormat(format!("no format named '{name}'")))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// All formats, sorted by extension and then suffix
    pub fn formats(&self) -> Vec<&dyn Format> {
        let mut formats: Vec<&dyn Format> = self.formats.values().map(|f| f.as_ref()).collect();
        formats.sort_by(|a, b| {
            (a.extension(), a.suffix()).cmp(&(b.extension(), b.suffix()))
        });
        formats
    }

    /// The format handling `filename`, by the longest matching `<suffix>.<extension>`
    pub fn detect(&self, filename: &str) -> Result<&dyn Format, FormatError> {
        let name = std::path::Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(filename);
        self.formats
            .values()
            .map(|f| f.as_ref())
            .filter(|f| name.ends_with(&f.file_ending()))
            .max_by_key(|f| f.file_ending().len())
            .ok_or_else(|| FormatError::UnsupportedFormat(format!("\"{filename}\"")))
    }

    /// The writer for documents with `suffix`
    ///
    /// Without an extension the first of ODT, ODS, HTML and CSV offering the suffix is taken.
    pub fn writer(&self, suffix: &str, extension: Option<&str>) -> Result<&dyn Format, FormatError> {
        let candidates: Vec<&dyn Format> = self
            .formats
            .values()
            .map(|f| f.as_ref())
            .filter(|f| f.supports_serialization() && f.suffix() == suffix)
            .filter(|f| EXPORT_PREFERENCE.contains(&f.extension()))
            .collect();
        let found = match extension {
            Some(extension) => candidates.into_iter().find(|f| f.extension() == extension),
            None => EXPORT_PREFERENCE
                .iter()
                .find_map(|ext| candidates.iter().copied().find(|f| f.extension() == *ext)),
        };
        found.ok_or_else(|| {
            FormatError::UnsupportedFormat(format!(
                "no writer for \"{suffix}.{}\"",
                extension.unwrap_or("*")
            ))
        })
    }

    /// Parse a document using the specified format
    pub fn parse(&self, source: &[u8], format: &str) -> Result<Project, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(FormatError::UnsupportedFormat(format!(
                "Format '{format}' does not support parsing"
            )));
        }
        fmt.parse(source)
    }

    /// Serialize a project using the specified format
    pub fn serialize(
        &self,
        project: &Project,
        ctx: &ExportContext,
        format: &str,
    ) -> Result<SerializedDocument, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::UnsupportedFormat(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        fmt.serialize(project, ctx)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Yw7Format);
        for document in OdtDocument::ALL {
            registry.register(OdtFormat::new(document));
        }
        for document in HtmlDocument::ALL {
            registry.register(HtmlFormat::new(document));
        }
        for list in ListKind::ALL {
            registry.register(OdsFormat::new(list));
            registry.register(CsvFormat::new(list));
        }
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestFormat;

    impl Format for TestFormat {
        fn name(&self) -> &str {
            "test"
        }
        fn suffix(&self) -> &str {
            "_test"
        }
        fn extension(&self) -> &str {
            "txt"
        }
        fn supports_parsing(&self) -> bool {
            true
        }
        fn parse(&self, _source: &[u8]) -> Result<Project, FormatError> {
            let mut project = Project::new();
            project.title = Some("test".into());
            Ok(project)
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.formats.len(), 0);
    }

    #[test]
    fn test_registry_register_and_replace() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);
        registry.register(TestFormat);
        assert!(registry.has("test"));
        assert_eq!(registry.list_formats(), vec!["test"]);
    }

    #[test]
    fn test_registry_get_nonexistent() {
        let registry = FormatRegistry::new();
        let result = registry.get("nonexistent");
        assert!(matches!(result, Err(FormatError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_registry_parse() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);
        let project = registry.parse(b"input", "test").unwrap();
        assert_eq!(project.title.as_deref(), Some("test"));
    }

    #[test]
    fn test_registry_serialize_unsupported() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);
        let result = registry.serialize(&Project::new(), &ExportContext::default(), "test");
        assert!(matches!(result, Err(FormatError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = FormatRegistry::with_defaults();
        assert!(registry.has("yw7"));
        assert!(registry.has("odt-manuscript"));
        assert!(registry.has("odt"));
        assert!(registry.has("ods-scenelist"));
        assert!(registry.has("html-chapters"));
        assert!(registry.has("csv-itemlist"));
        assert_eq!(registry.formats().len(), 1 + 12 + 11 + 4 + 4);
    }

    #[test]
    fn test_detect_longest_ending() {
        let registry = FormatRegistry::with_defaults();
        let name = |file: &str| registry.detect(file).map(|f| f.name().to_string()).ok();
        assert_eq!(name("/home/jo/novel_scenes.odt"), Some("odt-scenes".to_string()));
        assert_eq!(name("novel.odt"), Some("odt".to_string()));
        assert_eq!(name("novel_charlist.csv"), Some("csv-charlist".to_string()));
        assert_eq!(name("novel_manuscript.html"), Some("html-manuscript".to_string()));
        assert_eq!(name("novel.yw7"), Some("yw7".to_string()));
        assert_eq!(name("novel.docx"), None);
    }

    #[test]
    fn test_writer_preference() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(registry.writer("_manuscript", None).unwrap().name(), "odt-manuscript");
        assert_eq!(registry.writer("_scenelist", None).unwrap().name(), "ods-scenelist");
        assert_eq!(
            registry.writer("_scenelist", Some("csv")).unwrap().name(),
            "csv-scenelist"
        );
        assert_eq!(registry.writer("", None).unwrap().name(), "odt");
        assert!(registry.writer("_characters", Some("html")).is_err());
        assert!(registry.writer("_xref", None).is_err());
    }
}
