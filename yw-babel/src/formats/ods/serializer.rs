//! ODS serialization

use super::templates::writer;
use crate::common::markup::OdsCell;
use crate::error::FormatError;
use crate::format::ExportContext;
use crate::formats::common::export_copy;
use crate::formats::common::package::ODS_ASSETS;
use crate::formats::common::table::ListKind;
use crate::model::Project;
use crate::templates::Renderer;
use tracing::debug;

/// Render the `content.xml` of a list.
pub fn render_content(list: ListKind, project: &Project, ctx: &ExportContext) -> String {
    let (templates, hooks) = writer(list);
    Renderer::new(project, ctx, &templates, &OdsCell)
        .with_hooks(hooks)
        .render()
}

/// Serialize one list of `project` as an ODS package.
pub fn serialize_to_ods(
    list: ListKind,
    project: &Project,
    ctx: &ExportContext,
) -> Result<Vec<u8>, FormatError> {
    let project = export_copy(project, ctx);
    let content = render_content(list, &project, ctx);
    debug!(list = list.suffix(), bytes = content.len(), "content.xml rendered");
    ODS_ASSETS.package(&project, ctx, &content)
}
