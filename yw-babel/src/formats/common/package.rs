//! ODF packages
//!
//! An OpenDocument file is a zip archive. The `mimetype` entry comes first and is stored
//! uncompressed; the XML parts follow, deflated.

use crate::error::FormatError;
use crate::format::ExportContext;
use crate::model::Project;
use crate::templates::{substitute, Mapping};
use crate::common::markup::escape_xml;
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Static parts of an ODF document type.
pub struct OdfAssets {
    pub mimetype: &'static str,
    pub manifest: &'static str,
    pub manifest_rdf: Option<&'static str>,
    pub settings: &'static str,
    pub styles: &'static str,
    pub meta: &'static str,
}

pub const ODT_ASSETS: OdfAssets = OdfAssets {
    mimetype: include_str!("../../../assets/odt/mimetype"),
    manifest: include_str!("../../../assets/odt/manifest.xml"),
    manifest_rdf: Some(include_str!("../../../assets/odt/manifest.rdf")),
    settings: include_str!("../../../assets/odt/settings.xml"),
    styles: include_str!("../../../assets/odt/styles.xml"),
    meta: include_str!("../../../assets/odt/meta.xml"),
};

pub const ODS_ASSETS: OdfAssets = OdfAssets {
    mimetype: include_str!("../../../assets/ods/mimetype"),
    manifest: include_str!("../../../assets/ods/manifest.xml"),
    manifest_rdf: None,
    settings: include_str!("../../../assets/ods/settings.xml"),
    styles: include_str!("../../../assets/ods/styles.xml"),
    meta: include_str!("../../../assets/ods/meta.xml"),
};

impl OdfAssets {
    /// Zip `content` together with the static parts.
    ///
    /// The project must have its locale checked; styles take the document language from it.
    pub fn package(
        &self,
        project: &Project,
        ctx: &ExportContext,
        content: &str,
    ) -> Result<Vec<u8>, FormatError> {
        let mut locale = Mapping::new();
        locale.insert("Language", project.language_code.clone().unwrap_or_default());
        locale.insert("Country", project.country_code.clone().unwrap_or_default());
        let styles = substitute(self.styles, &locale);

        let mut meta = Mapping::new();
        meta.insert("Author", escape_xml(project.author_name.as_deref().unwrap_or_default()));
        meta.insert("Title", escape_xml(project.title.as_deref().unwrap_or_default()));
        meta.insert(
            "Summary",
            format!("<![CDATA[{}]]>", project.desc.as_deref().unwrap_or_default()),
        );
        meta.insert("Datetime", ctx.datetime.clone());
        let meta = substitute(self.meta, &meta);

        let mut parts: Vec<(&str, &str)> = Vec::new();
        if let Some(rdf) = self.manifest_rdf {
            parts.push(("manifest.rdf", rdf));
        }
        parts.push(("content.xml", content));
        parts.push(("meta.xml", &meta));
        parts.push(("settings.xml", self.settings));
        parts.push(("styles.xml", &styles));
        parts.push(("META-INF/manifest.xml", self.manifest));
        write_package(self.mimetype.trim_end(), &parts)
    }
}

fn write_error(e: impl std::fmt::Display) -> FormatError {
    FormatError::WriteError(format!("cannot build document package: {e}"))
}

/// Build a zip archive with the `mimetype` entry first.
pub fn write_package(mimetype: &str, parts: &[(&str, &str)]) -> Result<Vec<u8>, FormatError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = FileOptions::<()>::default().compression_method(CompressionMethod::Stored);
    let deflated = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("mimetype", stored).map_err(write_error)?;
    zip.write_all(mimetype.as_bytes()).map_err(write_error)?;
    for (name, text) in parts {
        zip.start_file(*name, deflated).map_err(write_error)?;
        zip.write_all(text.as_bytes()).map_err(write_error)?;
    }
    let cursor = zip.finish().map_err(write_error)?;
    Ok(cursor.into_inner())
}

/// Read one part of a package; `None` if the archive has no such entry.
pub fn read_part(bytes: &[u8], name: &str) -> Result<Option<String>, FormatError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| FormatError::ParseError(format!("not an ODF package: {e}")))?;
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(FormatError::ParseError(format!("cannot read {name}: {e}"))),
    };
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|e| FormatError::ParseError(format!("cannot read {name}: {e}")))?;
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mimetype_is_first_and_stored() {
        let bytes = write_package("application/x-test", &[("content.xml", "<a/>")]).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        drop(first);
        assert_eq!(read_part(&bytes, "content.xml").unwrap().as_deref(), Some("<a/>"));
        assert_eq!(read_part(&bytes, "missing.xml").unwrap(), None);
    }

    #[test]
    fn test_package_fills_meta_and_styles() {
        let mut project = Project::new();
        project.title = Some("Salt & Pepper".into());
        project.author_name = Some("Jo".into());
        project.desc = Some("A tale".into());
        project.language_code = Some("de".into());
        project.country_code = Some("CH".into());
        let ctx = ExportContext {
            datetime: "2024-01-02T03:04:05".into(),
            ..ExportContext::default()
        };
        let bytes = ODT_ASSETS.package(&project, &ctx, "<content/>").unwrap();

        let meta = read_part(&bytes, "meta.xml").unwrap().unwrap();
        assert!(meta.contains("<dc:title>Salt &amp; Pepper</dc:title>"));
        assert!(meta.contains("<![CDATA[A tale]]>"));
        assert!(meta.contains("2024-01-02T03:04:05Z"));
        let styles = read_part(&bytes, "styles.xml").unwrap().unwrap();
        assert!(styles.contains("fo:language=\"de\" fo:country=\"CH\""));
        assert!(read_part(&bytes, "manifest.rdf").unwrap().is_some());
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let err = read_part(b"not a zip", "content.xml").unwrap_err();
        assert!(matches!(err, FormatError::ParseError(_)));
    }
}
