//! Plumbing shared by the document formats
//!
//! ODF packaging, the reader event stream with its state machine, and the tabular list columns.

pub mod events;
pub mod package;
pub mod table;

use crate::format::ExportContext;
use crate::model::Project;

/// Copy of `project` with languages collected and the locale settled, ready for rendering.
pub fn export_copy(project: &Project, ctx: &ExportContext) -> Project {
    let mut project = project.clone();
    if project.languages.is_none() {
        project.get_languages();
    }
    project.check_locale(&ctx.fallback_language, &ctx.fallback_country);
    project
}
