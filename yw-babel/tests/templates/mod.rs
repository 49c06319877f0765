//! Rendering the sample project with filters

use crate::common::sample_project;
use yw_babel::templates::{Filters, PlainText, Renderer, TemplateSet};
use yw_babel::{ExportContext, Project};

fn calm_scenes(project: &Project, sc_id: &str) -> bool {
    project.scenes[sc_id].title.as_deref() != Some("Storm")
}

fn major_characters(project: &Project, cr_id: &str) -> bool {
    project.characters[cr_id].is_major == Some(true)
}

fn nothing(_project: &Project, _id: &str) -> bool {
    false
}

#[test]
fn test_filtered_scenes_are_not_counted() {
    let project = sample_project();
    let ctx = ExportContext::default();
    let templates = TemplateSet {
        chapter: "<$Title>".into(),
        scene: "($SceneNumber:$Title:$WordsTotal)".into(),
        chapter_end: "</>".into(),
        character: "[$Title]".into(),
        item: "{$Title}".into(),
        ..TemplateSet::default()
    };
    let filters = Filters {
        scene: calm_scenes,
        character: major_characters,
        item: nothing,
        ..Filters::default()
    };
    let text = Renderer::new(&project, &ctx, &templates, &PlainText)
        .with_filters(filters)
        .render();
    assert_eq!(text, "<Landing>(1:Arrival:8)</><Night></>[Ada]");
}
