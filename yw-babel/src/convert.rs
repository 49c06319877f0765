//! Conversion drivers
//!
//!     Three directions, picked by [`Converter::run`] from the source file name:
//!
//!     - `novel.yw7` is exported to `novel<suffix>.<ext>` next to it.
//!     - `novel<suffix>.<ext>` with a known suffix is read and merged into `novel.yw7`.
//!     - An unsuffixed document becomes a new `novel.yw7`, unless that exists already.
//!
//!     Every write goes through [`write_with_backup`]. Results are status strings; failures carry
//!     the [`FAILURE_MARKER`](crate::FAILURE_MARKER) prefix.

use crate::common::merge::merge;
use crate::common::split::split_scenes;
use crate::error::FormatError;
use crate::format::{ExportContext, Format};
use crate::formats::yw7::{self, Yw7File};
use crate::fsutil::{norm_path, read_file, write_with_backup};
use crate::registry::FormatRegistry;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

/// Document types that are written only, even though their packages parse.
const WRITE_ONLY_SUFFIXES: &[&str] = &["_xref", "_brf_synopsis"];

/// Drives exports, imports and project creation on files.
pub struct Converter {
    registry: FormatRegistry,
    fallback_language: String,
    fallback_country: String,
    keep_backup: bool,
}

impl Converter {
    pub fn new() -> Self {
        Converter {
            registry: FormatRegistry::with_defaults(),
            fallback_language: "en".to_string(),
            fallback_country: "US".to_string(),
            keep_backup: true,
        }
    }

    /// Locale for projects that carry none.
    pub fn with_fallback_locale(mut self, language: &str, country: &str) -> Self {
        self.fallback_language = language.to_string();
        self.fallback_country = country.to_string();
        self
    }

    /// Keep the `.bak` file after a successful write.
    pub fn keep_backup(mut self, keep: bool) -> Self {
        self.keep_backup = keep;
        self
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    fn project_file(&self, path: PathBuf) -> Yw7File {
        Yw7File::new(path)
            .with_fallback_locale(&self.fallback_language, &self.fallback_country)
            .keep_backup(self.keep_backup)
    }

    /// Export the yw7 project at `source` to the document type `suffix`.
    ///
    /// Without `extension` the writer is picked by preference: ODT, ODS, HTML, CSV.
    pub fn export_from_yw(
        &self,
        source: &Path,
        suffix: &str,
        extension: Option<&str>,
    ) -> Result<String, FormatError> {
        let writer = self.registry.writer(suffix, extension)?;
        let project = self.project_file(source.to_path_buf()).read()?;

        let (dir, stem) = split_source(source);
        let target = dir.join(format!("{stem}{}", writer.file_ending()));
        let (project_path, project_name) = url_parts(&dir, &stem);
        let ctx = ExportContext::new(project_name, project_path)
            .with_fallback_locale(&self.fallback_language, &self.fallback_country);

        let document = writer.serialize(&project, &ctx)?;
        write_with_backup(&target, &document.into_bytes(), self.keep_backup)?;
        info!(format = writer.name(), target = %norm_path(&target), "document exported");
        Ok(written(&target))
    }

    /// Read the document at `source` and merge it into its sibling yw7 project.
    pub fn import_to_yw(&self, source: &Path) -> Result<String, FormatError> {
        let format = self.reader_for(source)?;
        if format.suffix().is_empty() {
            return Err(FormatError::UnsupportedFormat(format!(
                "\"{}\" has no document suffix",
                norm_path(source)
            )));
        }
        let bytes = read_file(source)?;
        let imported = format.parse(&bytes)?;

        let target = sibling_project(source, format);
        let mut file = self.project_file(target.clone());
        let mut project = file.read()?;
        let report = merge(&mut project, imported);
        project.get_languages();
        debug!(
            format = format.name(),
            scenes_split = report.scenes_split,
            "document merged"
        );
        file.write(&project)?;
        info!(source = %norm_path(source), target = %norm_path(&target), "document imported");
        Ok(written(&target))
    }

    /// Build a new yw7 project from the work in progress or outline at `source`.
    pub fn create_yw(&self, source: &Path) -> Result<String, FormatError> {
        let format = self.reader_for(source)?;
        let target = sibling_project(source, format);
        if target.exists() {
            return Err(FormatError::WriteError(format!(
                "File exists: \"{}\".",
                norm_path(&target)
            )));
        }
        let bytes = read_file(source)?;
        let mut project = format.parse(&bytes)?;
        let split = split_scenes(&mut project);
        project.propagate_kinds();
        project.get_languages();
        debug!(
            chapters = project.chapters.len(),
            scenes = project.scenes.len(),
            split,
            "project built"
        );
        self.project_file(target.clone()).write(&project)?;
        info!(source = %norm_path(source), target = %norm_path(&target), "project created");
        Ok(written(&target))
    }

    /// Convert `source` in the direction its name implies and report the outcome.
    ///
    /// `suffix` selects the document type of an export; it is ignored otherwise.
    pub fn run(&self, source: &Path, suffix: Option<&str>) -> String {
        let result = if is_project(source) {
            self.export_from_yw(source, suffix.unwrap_or(""), None)
        } else {
            match self.reader_for(source) {
                Ok(format) if format.suffix().is_empty() => self.create_yw(source),
                Ok(_) => self.import_to_yw(source),
                Err(e) => Err(e),
            }
        };
        match result {
            Ok(status) => status,
            Err(e) => {
                info!(source = %norm_path(source), error = %e, "conversion failed");
                e.status_message()
            }
        }
    }

    fn reader_for(&self, source: &Path) -> Result<&dyn Format, FormatError> {
        let name = norm_path(source);
        let format = self.registry.detect(&name)?;
        if !format.supports_parsing() || WRITE_ONLY_SUFFIXES.contains(&format.suffix()) {
            return Err(FormatError::UnsupportedFormat(format!(
                "\"{name}\" cannot be imported"
            )));
        }
        Ok(format)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

fn is_project(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(yw7::EXTENSION))
}

fn written(path: &Path) -> String {
    format!("File written: \"{}\".", norm_path(path))
}

/// Directory and file stem of `source`.
fn split_source(source: &Path) -> (PathBuf, String) {
    let dir = source
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (dir, stem)
}

/// `novel.yw7` for `novel<suffix>.<ext>`.
fn sibling_project(source: &Path, format: &dyn Format) -> PathBuf {
    let (dir, _) = split_source(source);
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = name.strip_suffix(&format.file_ending()).unwrap_or(&name);
    dir.join(format!("{base}.{}", yw7::EXTENSION))
}

/// URL quoted directory (without the leading slash) and file stem, for document links.
fn url_parts(dir: &Path, stem: &str) -> (String, String) {
    let absolute = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    match Url::from_file_path(absolute.join(stem)) {
        Ok(url) => {
            let path = url.path().trim_start_matches('/');
            match path.rsplit_once('/') {
                Some((dir, name)) => (dir.to_string(), name.to_string()),
                None => (String::new(), path.to_string()),
            }
        }
        Err(()) => (norm_path(&absolute), stem.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsutil::{backup_path, lock_path};
    use crate::model::{Chapter, Scene};
    use crate::Project;
    use std::fs;

    fn project() -> Project {
        let mut project = Project::new();
        project.title = Some("Night Train".into());
        let mut scene = Scene {
            title: Some("Chase".into()),
            desc: Some("They run.".into()),
            ..Default::default()
        };
        scene.set_content("Run fast.");
        project.scenes.insert("1".into(), scene);
        project.chapters.insert(
            "1".into(),
            Chapter {
                title: Some("One".into()),
                srt_scenes: vec!["1".into()],
                ..Default::default()
            },
        );
        project.srt_chapters.push("1".into());
        project
    }

    fn setup() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my novel.yw7");
        Yw7File::new(&path).write(&project()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_export_writes_suffixed_document() {
        let (dir, path) = setup();
        let status = Converter::new()
            .export_from_yw(&path, "_manuscript", None)
            .unwrap();
        let target = dir.path().join("my novel_manuscript.odt");
        assert!(target.is_file());
        assert_eq!(status, format!("File written: \"{}\".", norm_path(&target)));
    }

    #[test]
    fn test_export_with_explicit_extension() {
        let (dir, path) = setup();
        Converter::new()
            .export_from_yw(&path, "_scenelist", Some("csv"))
            .unwrap();
        let text = fs::read_to_string(dir.path().join("my novel_scenelist.csv")).unwrap();
        assert!(text.contains("\"Chase\""));
    }

    #[test]
    fn test_import_merges_into_project() {
        let (dir, path) = setup();
        let converter = Converter::new().keep_backup(false);
        converter
            .export_from_yw(&path, "_scenelist", Some("csv"))
            .unwrap();
        let list = dir.path().join("my novel_scenelist.csv");
        let text = fs::read_to_string(&list).unwrap();
        fs::write(&list, text.replace("\"Chase\"", "\"Escape\"")).unwrap();

        let status = converter.import_to_yw(&list).unwrap();
        assert!(status.ends_with("my novel.yw7\"."));
        assert!(!backup_path(&path).exists());

        let read = Yw7File::new(&path).read().unwrap();
        assert_eq!(read.scenes["1"].title.as_deref(), Some("Escape"));
        assert_eq!(read.scenes["1"].content(), Some("Run fast."));
    }

    #[test]
    fn test_import_refuses_write_only_documents() {
        let (dir, _) = setup();
        let xref = dir.path().join("my novel_xref.odt");
        fs::write(&xref, b"").unwrap();
        let err = Converter::new().import_to_yw(&xref).unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_import_without_project() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("lost_itemlist.csv");
        fs::write(&list, "\"ID\",\"Name\",\"Description\",\"Aka\",\"Tags\"\n").unwrap();
        let err = Converter::new().import_to_yw(&list).unwrap_err();
        assert!(matches!(err, FormatError::NotFound(_)));
    }

    #[test]
    fn test_create_from_work_in_progress() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("draft.html");
        fs::write(
            &source,
            "<html lang=\"en-GB\"><head><title>Draft</title></head><body><h2>Start</h2><p>It begins.</p></body></html>",
        )
        .unwrap();

        Converter::new().create_yw(&source).unwrap();
        let read = Yw7File::new(dir.path().join("draft.yw7")).read().unwrap();
        assert_eq!(read.title.as_deref(), Some("Draft"));
        assert_eq!(read.chapters["1"].title.as_deref(), Some("Start"));
        assert_eq!(read.scenes["1"].content(), Some("It begins."));

        let err = Converter::new().create_yw(&source).unwrap_err();
        assert!(matches!(err, FormatError::WriteError(_)));
    }

    #[test]
    fn test_run_reports_failures_with_marker() {
        let (dir, path) = setup();
        fs::write(lock_path(&path), "").unwrap();
        let status = Converter::new().run(&path, Some("_scenes"));
        assert_eq!(status, "!yWriter seems to be open. Please close first.");

        let status = Converter::new().run(&dir.path().join("notes.txt"), None);
        assert!(status.starts_with(crate::FAILURE_MARKER));
    }

    #[test]
    fn test_run_dispatches_on_extension() {
        let (dir, path) = setup();
        let converter = Converter::new();
        let status = converter.run(&path, Some("_chapters"));
        assert!(status.starts_with("File written"));

        let document = dir.path().join("my novel_chapters.odt");
        assert!(document.is_file());
        let status = converter.run(&document, None);
        assert!(status.starts_with("File written"), "{status}");
    }

    #[test]
    fn test_sibling_project() {
        let registry = FormatRegistry::with_defaults();
        let source = Path::new("/books/novel_scenes.html");
        let format = registry.detect("novel_scenes.html").unwrap();
        assert_eq!(
            sibling_project(source, format),
            PathBuf::from("/books/novel.yw7")
        );
    }
}
