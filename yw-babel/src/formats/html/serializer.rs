//! HTML serialization
//!
//! Produces a single self-contained HTML5 file with the stylesheet embedded.

use super::templates::writer;
use super::HtmlDocument;
use crate::common::markup::{mark_html_quotations, HtmlText};
use crate::error::FormatError;
use crate::format::ExportContext;
use crate::formats::common::export_copy;
use crate::model::Project;
use crate::templates::Renderer;
use tracing::debug;

/// Serialize `project` as an HTML document of type `document`.
pub fn serialize_to_html(
    document: HtmlDocument,
    project: &Project,
    ctx: &ExportContext,
) -> Result<String, FormatError> {
    let writer = writer(document).ok_or_else(|| {
        FormatError::UnsupportedFormat(format!(
            "{} documents are not written as HTML",
            document.description()
        ))
    })?;
    let project = export_copy(project, ctx);
    let mut html = Renderer::new(&project, ctx, &writer.templates, &HtmlText)
        .with_hooks(writer.hooks)
        .render();
    if writer.quotations {
        html = mark_html_quotations(&html);
    }
    debug!(document = document.suffix(), bytes = html.len(), "HTML rendered");
    Ok(html)
}
