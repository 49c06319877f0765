//! HTML templates per document type

use super::HtmlDocument;
use crate::common::markup::escape_html;
use crate::model::Project;
use crate::templates::{Hooks, Mapping, TemplateSet};
use std::borrow::Cow;

const HEADER: &str = concat!(
    "<!DOCTYPE html>\n",
    "<html lang=\"$Language-$Country\">\n",
    "<head>\n",
    "<meta charset=\"utf-8\"/>\n",
    "<meta name=\"author\" content=\"$AuthorName\"/>\n",
    "<meta name=\"description\" content=\"$MetaDesc\"/>\n",
    "<title>$Title</title>\n",
    "<style>\n",
    include_str!("../../../assets/html/style.css"),
    "</style>\n",
    "</head>\n",
    "<body>\n",
);

const FOOTER: &str = "</body>\n</html>\n";

const DIVIDER: &str = "<p class=\"divider\">* * *</p>\n";

const SECTION_END: &str = "</div>\n";

/// How one document type is rendered.
pub(super) struct HtmlWriter {
    pub templates: TemplateSet,
    pub hooks: Hooks,
    /// Turn `> ` paragraphs into block quotes.
    pub quotations: bool,
}

impl HtmlWriter {
    fn new(templates: TemplateSet) -> Self {
        HtmlWriter {
            templates: TemplateSet {
                file_header: HEADER.into(),
                file_footer: FOOTER.into(),
                ..templates
            },
            hooks: Hooks {
                project: Some(meta_description),
                ..Hooks::default()
            },
            quotations: false,
        }
    }
}

fn meta_description(project: &Project, mapping: &mut Mapping) {
    let desc = project.desc.as_deref().unwrap_or_default().replace('\n', " ");
    mapping.insert("MetaDesc", escape_html(desc.trim()).replace('"', "&quot;"));
}

fn suppress_title(project: &Project, ch_id: &str, mapping: &mut Mapping) {
    if project.chapters[ch_id].suppress_title == Some(true) {
        mapping.insert("Title", String::new());
    }
}

/// Scene title for an HTML comment, which must not contain `--`.
fn comment_title(project: &Project, sc_id: &str, mapping: &mut Mapping) {
    let title = project.scenes[sc_id].title.as_deref().unwrap_or_default();
    mapping.insert("CommentTitle", title.replace("--", "- -"));
}

fn proof_marks(class: &str, label: &str) -> (String, String, String, String) {
    let class = match class {
        "" => "mark".to_string(),
        class => format!("mark {class}"),
    };
    let part = format!("<p class=\"{class}\">[ChID:$ID{label}]</p>\n<h1>$Title</h1>\n");
    let chapter = format!("<p class=\"{class}\">[ChID:$ID{label}]</p>\n<h2>$Title</h2>\n");
    let scene = format!(
        "<p class=\"{class}\">[ScID:$ID{label}]</p>\n<p>$SceneContent</p>\n<p class=\"{class}\">[/ScID{label}]</p>\n"
    );
    let end = format!("<p class=\"{class}\">[/ChID{label}]</p>\n");
    (part, chapter, scene, end)
}

fn proof() -> HtmlWriter {
    let (part, chapter, scene, chapter_end) = proof_marks("", "");
    let (_, unused_chapter, unused_scene, unused_chapter_end) = proof_marks("unused", " (Unused)");
    let (notes_part, notes_chapter, notes_scene, notes_chapter_end) =
        proof_marks("notes", " (Notes)");
    let (todo_part, todo_chapter, todo_scene, todo_chapter_end) = proof_marks("todo", " (ToDo)");
    HtmlWriter::new(TemplateSet {
        part: part.into(),
        chapter: chapter.into(),
        scene: scene.into(),
        chapter_end: chapter_end.into(),
        unused_chapter: unused_chapter.into(),
        unused_scene: unused_scene.into(),
        unused_chapter_end: unused_chapter_end.into(),
        notes_part: notes_part.into(),
        notes_chapter: notes_chapter.into(),
        notes_scene: notes_scene.into(),
        notes_chapter_end: notes_chapter_end.into(),
        todo_part: todo_part.into(),
        todo_chapter: todo_chapter.into(),
        todo_scene: todo_scene.into(),
        todo_chapter_end: todo_chapter_end.into(),
        scene_divider: DIVIDER.into(),
        ..TemplateSet::default()
    })
}

fn manuscript() -> HtmlWriter {
    let mut writer = HtmlWriter::new(TemplateSet {
        part: Cow::Borrowed("<div id=\"ChID:$ID\">\n<h1>$Title</h1>\n"),
        chapter: Cow::Borrowed("<div id=\"ChID:$ID\">\n<h2>$Title</h2>\n"),
        scene: Cow::Borrowed(
            "<div id=\"ScID:$ID\">\n<!-- ~ $CommentTitle ~ -->\n<p>$SceneContent</p>\n</div>\n",
        ),
        scene_divider: DIVIDER.into(),
        chapter_end: SECTION_END.into(),
        ..TemplateSet::default()
    });
    writer.hooks.chapter = Some(suppress_title);
    writer.hooks.scene = Some(comment_title);
    writer.quotations = true;
    writer
}

fn scene_descriptions() -> HtmlWriter {
    let mut writer = HtmlWriter::new(TemplateSet {
        part: Cow::Borrowed("<div id=\"ChID:$ID\">\n<h1>$Title</h1>\n"),
        chapter: Cow::Borrowed("<div id=\"ChID:$ID\">\n<h2>$Title</h2>\n"),
        scene: Cow::Borrowed(
            "<div id=\"ScID:$ID\"><!-- ~ $CommentTitle ~ --><p>$Desc</p></div>\n",
        ),
        scene_divider: DIVIDER.into(),
        chapter_end: SECTION_END.into(),
        ..TemplateSet::default()
    });
    writer.hooks.scene = Some(comment_title);
    writer
}

fn chapter_descriptions() -> HtmlWriter {
    HtmlWriter::new(TemplateSet {
        part: Cow::Borrowed("<h1>$Title</h1>\n"),
        chapter: Cow::Borrowed("<div id=\"ChID:$ID\">\n<h2>$Title</h2>\n<p>$Desc</p>\n</div>\n"),
        ..TemplateSet::default()
    })
}

fn part_descriptions() -> HtmlWriter {
    HtmlWriter::new(TemplateSet {
        part: Cow::Borrowed("<div id=\"ChID:$ID\">\n<h1>$Title</h1>\n<p>$Desc</p>\n</div>\n"),
        ..TemplateSet::default()
    })
}

/// Writer of `document`; `None` for documents that are only read.
pub(super) fn writer(document: HtmlDocument) -> Option<HtmlWriter> {
    match document {
        HtmlDocument::Manuscript => Some(manuscript()),
        HtmlDocument::Proof => Some(proof()),
        HtmlDocument::SceneDesc => Some(scene_descriptions()),
        HtmlDocument::ChapterDesc => Some(chapter_descriptions()),
        HtmlDocument::PartDesc => Some(part_descriptions()),
        _ => None,
    }
}
