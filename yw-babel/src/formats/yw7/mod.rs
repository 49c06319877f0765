//! yWriter 7 project files
//!
//!     `.yw7` is the project store every conversion reads from or writes back to. [`Yw7File`]
//!     keeps the element tree of the last read so a write only touches what the model knows
//!     about; [`Yw7Format`] is the stateless variant used through the registry.

mod postprocess;
mod reader;
pub mod tree;
mod writer;

use crate::error::FormatError;
use crate::format::{ExportContext, Format, SerializedDocument};
use crate::fsutil::{is_locked, norm_path, read_file, write_with_backup};
use crate::model::Project;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tree::XmlElement;

pub use postprocess::postprocess;
pub use reader::read_project;
pub use writer::{build_tree, new_tree};

/// Project level custom fields this crate reads.
pub(crate) const PROJECT_FIELDS: &[&str] = &["Field_LanguageCode", "Field_CountryCode"];

/// Scene level custom fields carried through unchanged.
pub(crate) const SCENE_FIELDS: &[&str] = &["Field_SceneArcs", "Field_SceneStyle"];

pub const EXTENSION: &str = "yw7";

/// A yWriter 7 project on disk.
#[derive(Debug)]
pub struct Yw7File {
    path: PathBuf,
    tree: Option<XmlElement>,
    fallback_language: String,
    fallback_country: String,
    keep_backup: bool,
}

impl Yw7File {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Yw7File {
            path: path.into(),
            tree: None,
            fallback_language: "en".to_string(),
            fallback_country: "US".to_string(),
            keep_backup: true,
        }
    }

    pub fn with_fallback_locale(mut self, language: &str, country: &str) -> Self {
        self.fallback_language = language.to_string();
        self.fallback_country = country.to_string();
        self
    }

    pub fn keep_backup(mut self, keep: bool) -> Self {
        self.keep_backup = keep;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the project and remember its element tree for the next write.
    ///
    /// Fails with [`FormatError::LockConflict`] while yWriter has the project open.
    pub fn read(&mut self) -> Result<Project, FormatError> {
        let bytes = read_file(&self.path)?;
        if is_locked(&self.path) {
            return Err(FormatError::LockConflict(norm_path(&self.path)));
        }
        let source = decode(&bytes)?;
        let root = XmlElement::parse(&source)?;
        let project = read_project(&root);
        debug!(
            path = %norm_path(&self.path),
            chapters = project.chapters.len(),
            scenes = project.scenes.len(),
            "project read"
        );
        self.tree = Some(root);
        Ok(project)
    }

    /// Write `project`, updating the tree of the previous read if there was one.
    ///
    /// Fails with [`FormatError::LockConflict`] while yWriter has the project open.
    pub fn write(&mut self, project: &Project) -> Result<(), FormatError> {
        if is_locked(&self.path) {
            return Err(FormatError::LockConflict(norm_path(&self.path)));
        }
        // The stored tree is only replaced once the file is written.
        let mut root = self.tree.clone().unwrap_or_else(new_tree);
        let text = render(
            project,
            &mut root,
            &self.fallback_language,
            &self.fallback_country,
        )?;
        write_with_backup(&self.path, text.as_bytes(), self.keep_backup)?;
        info!(path = %norm_path(&self.path), "project written");
        self.tree = Some(root);
        Ok(())
    }
}

fn decode(bytes: &[u8]) -> Result<String, FormatError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| FormatError::ParseError(format!("project file is not UTF-8: {e}")))
}

fn render(
    project: &Project,
    root: &mut XmlElement,
    fallback_language: &str,
    fallback_country: &str,
) -> Result<String, FormatError> {
    let mut project = project.clone();
    if project.languages.is_none() {
        project.get_languages();
    }
    build_tree(&mut project, root, fallback_language, fallback_country);
    let xml = root.to_xml()?;
    Ok(postprocess(&xml, !project.chapters.is_empty()))
}

/// yWriter 7 project as a registry format.
pub struct Yw7Format;

impl Format for Yw7Format {
    fn name(&self) -> &str {
        "yw7"
    }

    fn description(&self) -> &str {
        "yWriter 7 project"
    }

    fn suffix(&self) -> &str {
        ""
    }

    fn extension(&self) -> &str {
        EXTENSION
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &[u8]) -> Result<Project, FormatError> {
        let root = XmlElement::parse(&decode(source)?)?;
        Ok(read_project(&root))
    }

    fn serialize(
        &self,
        project: &Project,
        ctx: &ExportContext,
    ) -> Result<SerializedDocument, FormatError> {
        let mut root = new_tree();
        let text = render(
            project,
            &mut root,
            &ctx.fallback_language,
            &ctx.fallback_country,
        )?;
        Ok(SerializedDocument::Text(text))
    }
}
