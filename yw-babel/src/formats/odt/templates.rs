//! content.xml templates per document type

use super::OdtDocument;
use crate::common::markup::{escape_xml, odt_automatic_styles, OdtFlavour};
use crate::model::{Kind, Project};
use crate::templates::{ChapterSelection, Hooks, Mapping, TemplateSet};
use std::borrow::Cow;

const HEADER: &str = concat!(
    include_str!("../../../assets/odt/content_header.xml"),
    "<text:p text:style-name=\"Title\">$Title</text:p>\n",
    "<text:p text:style-name=\"Subtitle\">$AuthorName</text:p>\n",
);

const FOOTER: &str = include_str!("../../../assets/odt/content_footer.xml");

const DIVIDER: &str = "<text:p text:style-name=\"Heading_20_4\">* * *</text:p>\n";

const SECTION_END: &str = "</text:section>\n";

/// How one document type is rendered.
pub(super) struct OdtWriter {
    pub templates: TemplateSet,
    pub flavour: OdtFlavour,
    pub hooks: Hooks,
    pub selection: ChapterSelection,
    /// Turn `> ` paragraphs into quotation paragraphs.
    pub quotations: bool,
    /// Turn `/* @fn ... */` comments into notes after rendering.
    pub notes: bool,
}

impl OdtWriter {
    fn new(flavour: OdtFlavour, templates: TemplateSet) -> Self {
        let styles: fn(&Project, &mut Mapping) = match flavour {
            OdtFlavour::Plain => plain_styles,
            OdtFlavour::Proof => proof_styles,
            _ => language_styles,
        };
        OdtWriter {
            templates: TemplateSet {
                file_header: HEADER.into(),
                file_footer: FOOTER.into(),
                ..templates
            },
            flavour,
            hooks: Hooks {
                project: Some(styles),
                ..Hooks::default()
            },
            selection: ChapterSelection::All,
            quotations: matches!(flavour, OdtFlavour::Formatted | OdtFlavour::Export),
            notes: false,
        }
    }
}

fn plain_styles(_project: &Project, mapping: &mut Mapping) {
    mapping.insert("automaticStyles", odt_automatic_styles(&[], false));
}

fn language_styles(project: &Project, mapping: &mut Mapping) {
    let languages = project.languages.as_deref().unwrap_or_default();
    mapping.insert("automaticStyles", odt_automatic_styles(languages, false));
}

fn proof_styles(project: &Project, mapping: &mut Mapping) {
    let languages = project.languages.as_deref().unwrap_or_default();
    mapping.insert("automaticStyles", odt_automatic_styles(languages, true));
}

fn suppress_title(project: &Project, ch_id: &str, mapping: &mut Mapping) {
    if project.chapters[ch_id].suppress_title == Some(true) {
        mapping.insert("Title", String::new());
    }
}

fn annotation_labels(_project: &Project, _sc_id: &str, mapping: &mut Mapping) {
    mapping.insert("sceneTitle", "Scene".to_string());
    mapping.insert("Summary", "Summary".to_string());
    mapping.insert("Manuscript", "Manuscript".to_string());
}

fn quoted_aka(aka: Option<&str>) -> String {
    match aka.filter(|a| !a.is_empty()) {
        Some(aka) => format!(" (\"{}\")", escape_xml(aka)),
        None => String::new(),
    }
}

fn character_names(project: &Project, cr_id: &str, mapping: &mut Mapping) {
    let character = &project.characters[cr_id];
    mapping.insert("AKA", quoted_aka(character.aka.as_deref()));
    let full_name = match character.full_name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) if Some(name) != character.title.as_deref() => format!("/{}", escape_xml(name)),
        _ => String::new(),
    };
    mapping.insert("FullName", full_name);
}

fn location_aka(project: &Project, lc_id: &str, mapping: &mut Mapping) {
    mapping.insert("AKA", quoted_aka(project.locations[lc_id].aka.as_deref()));
}

fn item_aka(project: &Project, it_id: &str, mapping: &mut Mapping) {
    mapping.insert("AKA", quoted_aka(project.items[it_id].aka.as_deref()));
}

fn proof_marks(kind: &str, label: &str) -> (String, String, String, String) {
    let style = match kind {
        "" => "scene_20_mark".to_string(),
        kind => format!("scene_20_mark_20_{kind}"),
    };
    let part = format!(
        "<text:p text:style-name=\"{style}\">[ChID:$ID{label}]</text:p>\n<text:h text:style-name=\"Heading_20_1\" text:outline-level=\"1\">$Title</text:h>\n"
    );
    let chapter = format!(
        "<text:p text:style-name=\"{style}\">[ChID:$ID{label}]</text:p>\n<text:h text:style-name=\"Heading_20_2\" text:outline-level=\"2\">$Title</text:h>\n"
    );
    let scene = format!(
        "<text:p text:style-name=\"{style}\">[ScID:$ID{label}]</text:p>\n<text:p text:style-name=\"Text_20_body\">$SceneContent</text:p>\n<text:p text:style-name=\"{style}\">[/ScID{label}]</text:p>\n"
    );
    let end = format!("<text:p text:style-name=\"{style}\">[/ChID{label}]</text:p>\n");
    (part, chapter, scene, end)
}

fn proof() -> OdtWriter {
    let (part, chapter, scene, chapter_end) = proof_marks("", "");
    let (_, unused_chapter, unused_scene, unused_chapter_end) = proof_marks("unused", " (Unused)");
    let (notes_part, notes_chapter, notes_scene, notes_chapter_end) =
        proof_marks("notes", " (Notes)");
    let (todo_part, todo_chapter, todo_scene, todo_chapter_end) = proof_marks("todo", " (ToDo)");
    let templates = TemplateSet {
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
    };
    OdtWriter::new(OdtFlavour::Proof, templates)
}

fn manuscript() -> OdtWriter {
    let templates = TemplateSet {
        part: Cow::Borrowed(
            "<text:section text:style-name=\"Sect1\" text:name=\"ChID:$ID\">\n\
             <text:h text:style-name=\"Heading_20_1\" text:outline-level=\"1\"><text:a xlink:href=\"../${ProjectName}_parts.odt#ChID:$ID%7Cregion\">$Title</text:a></text:h>\n",
        ),
        chapter: Cow::Borrowed(
            "<text:section text:style-name=\"Sect1\" text:name=\"ChID:$ID\">\n\
             <text:h text:style-name=\"Heading_20_2\" text:outline-level=\"2\"><text:a xlink:href=\"../${ProjectName}_chapters.odt#ChID:$ID%7Cregion\">$Title</text:a></text:h>\n",
        ),
        scene: Cow::Borrowed(
            "<text:section text:style-name=\"Sect1\" text:name=\"ScID:$ID\">\n\
             <text:p text:style-name=\"Text_20_body\"><office:annotation><dc:creator>$sceneTitle</dc:creator><text:p>~ ${Title} ~</text:p><text:p/><text:p><text:a xlink:href=\"../${ProjectName}_scenes.odt#ScID:$ID%7Cregion\">→$Summary</text:a></text:p></office:annotation>$SceneContent</text:p>\n\
             </text:section>\n",
        ),
        appended_scene: Cow::Borrowed(
            "<text:section text:style-name=\"Sect1\" text:name=\"ScID:$ID\">\n\
             <text:p text:style-name=\"First_20_line_20_indent\"><office:annotation>\n\
             <dc:creator>$sceneTitle</dc:creator>\n\
             <text:p>~ ${Title} ~</text:p>\n\
             <text:p/>\n\
             <text:p><text:a xlink:href=\"../${ProjectName}_scenes.odt#ScID:$ID%7Cregion\">→$Summary</text:a></text:p>\n\
             </office:annotation>$SceneContent</text:p>\n\
             </text:section>\n",
        ),
        scene_divider: DIVIDER.into(),
        chapter_end: SECTION_END.into(),
        ..TemplateSet::default()
    };
    let mut writer = OdtWriter::new(OdtFlavour::Formatted, templates);
    writer.hooks.chapter = Some(suppress_title);
    writer.hooks.scene = Some(annotation_labels);
    writer
}

fn scene_descriptions() -> OdtWriter {
    let templates = TemplateSet {
        part: Cow::Borrowed(
            "<text:section text:style-name=\"Sect1\" text:name=\"ChID:$ID\">\n\
             <text:h text:style-name=\"Heading_20_1\" text:outline-level=\"1\"><text:a xlink:href=\"../${ProjectName}_parts.odt#ChID:$ID%7Cregion\">$Title</text:a></text:h>\n",
        ),
        chapter: Cow::Borrowed(
            "<text:section text:style-name=\"Sect1\" text:name=\"ChID:$ID\">\n\
             <text:h text:style-name=\"Heading_20_2\" text:outline-level=\"2\"><text:a xlink:href=\"../${ProjectName}_chapters.odt#ChID:$ID%7Cregion\">$Title</text:a></text:h>\n",
        ),
        scene: Cow::Borrowed(
            "<text:section text:style-name=\"Sect1\" text:name=\"ScID:$ID\">\n\
             <text:p text:style-name=\"Text_20_body\"><office:annotation><dc:creator>$sceneTitle</dc:creator><text:p>~ ${Title} ~</text:p><text:p/><text:p><text:a xlink:href=\"../${ProjectName}_manuscript.odt#ScID:$ID%7Cregion\">→$Manuscript</text:a></text:p></office:annotation>$Desc</text:p>\n\
             </text:section>\n",
        ),
        scene_divider: DIVIDER.into(),
        chapter_end: SECTION_END.into(),
        ..TemplateSet::default()
    };
    let mut writer = OdtWriter::new(OdtFlavour::Plain, templates);
    writer.hooks.scene = Some(annotation_labels);
    writer
}

fn chapter_descriptions() -> OdtWriter {
    let templates = TemplateSet {
        part: Cow::Borrowed(
            "<text:h text:style-name=\"Heading_20_1\" text:outline-level=\"1\"><text:a xlink:href=\"../${ProjectName}_parts.odt#ChID:$ID%7Cregion\">$Title</text:a></text:h>\n",
        ),
        chapter: Cow::Borrowed(
            "<text:section text:style-name=\"Sect1\" text:name=\"ChID:$ID\">\n\
             <text:h text:style-name=\"Heading_20_2\" text:outline-level=\"2\"><text:a xlink:href=\"../${ProjectName}_manuscript.odt#ChID:$ID%7Cregion\">$Title</text:a></text:h>\n\
             <text:p text:style-name=\"Text_20_body\">$Desc</text:p>\n\
             </text:section>\n",
        ),
        ..TemplateSet::default()
    };
    OdtWriter::new(OdtFlavour::Plain, templates)
}

fn part_descriptions() -> OdtWriter {
    let templates = TemplateSet {
        part: Cow::Borrowed(
            "<text:section text:style-name=\"Sect1\" text:name=\"ChID:$ID\">\n\
             <text:h text:style-name=\"Heading_20_1\" text:outline-level=\"1\"><text:a xlink:href=\"../${ProjectName}_manuscript.odt#ChID:$ID%7Cregion\">$Title</text:a></text:h>\n\
             <text:p text:style-name=\"Text_20_body\">$Desc</text:p>\n\
             </text:section>\n",
        ),
        ..TemplateSet::default()
    };
    OdtWriter::new(OdtFlavour::Plain, templates)
}

fn brief_synopsis() -> OdtWriter {
    let templates = TemplateSet {
        part: Cow::Borrowed(
            "<text:h text:style-name=\"Heading_20_1\" text:outline-level=\"1\">$Title</text:h>\n",
        ),
        chapter: Cow::Borrowed(
            "<text:h text:style-name=\"Heading_20_2\" text:outline-level=\"2\">$Title</text:h>\n",
        ),
        scene: Cow::Borrowed("<text:p text:style-name=\"Text_20_body\">$Title</text:p>\n"),
        ..TemplateSet::default()
    };
    OdtWriter::new(OdtFlavour::Plain, templates)
}

fn export() -> OdtWriter {
    let templates = TemplateSet {
        part: Cow::Borrowed(
            "<text:h text:style-name=\"Heading_20_1\" text:outline-level=\"1\">$Title</text:h>\n",
        ),
        chapter: Cow::Borrowed(
            "<text:h text:style-name=\"Heading_20_2\" text:outline-level=\"2\">$Title</text:h>\n",
        ),
        scene: Cow::Borrowed(
            "<text:p text:style-name=\"Text_20_body\"><office:annotation><dc:creator>$sceneTitle</dc:creator><text:p>~ ${Title} ~</text:p></office:annotation>$SceneContent</text:p>\n",
        ),
        appended_scene: Cow::Borrowed(
            "<text:p text:style-name=\"First_20_line_20_indent\"><office:annotation>\n\
             <dc:creator>$sceneTitle</dc:creator>\n\
             <text:p>~ ${Title} ~</text:p>\n\
             </office:annotation>$SceneContent</text:p>\n",
        ),
        scene_divider: DIVIDER.into(),
        ..TemplateSet::default()
    };
    let mut writer = OdtWriter::new(OdtFlavour::Export, templates);
    writer.hooks.chapter = Some(suppress_title);
    writer.hooks.scene = Some(annotation_labels);
    writer.notes = true;
    writer
}

fn characters() -> OdtWriter {
    let section = |name: &str, heading: &str, field: &str| {
        format!(
            "<text:h text:style-name=\"Heading_20_3\" text:outline-level=\"3\">{heading}</text:h>\n\
             <text:section text:style-name=\"Sect1\" text:name=\"CrID_{name}:$ID\">\n\
             <text:p text:style-name=\"Text_20_body\">${field}</text:p>\n\
             </text:section>\n"
        )
    };
    let character = format!(
        "<text:h text:style-name=\"Heading_20_2\" text:outline-level=\"2\">$Title$FullName$AKA</text:h>\n\
         <text:section text:style-name=\"Sect1\" text:name=\"CrID:$ID\">\n\
         {}{}{}{}</text:section>\n",
        section("desc", "Description", "Desc"),
        section("bio", "Bio", "Bio"),
        section("goals", "Goals", "Goals"),
        section("notes", "Notes", "Notes"),
    );
    let templates = TemplateSet {
        character: character.into(),
        ..TemplateSet::default()
    };
    let mut writer = OdtWriter::new(OdtFlavour::Plain, templates);
    writer.hooks.character = Some(character_names);
    writer
}

fn world_elements(prefix: &str) -> TemplateSet {
    let element = format!(
        "<text:h text:style-name=\"Heading_20_2\" text:outline-level=\"2\">$Title$AKA</text:h>\n\
         <text:section text:style-name=\"Sect1\" text:name=\"{prefix}:$ID\">\n\
         <text:p text:style-name=\"Text_20_body\">$Desc</text:p>\n\
         </text:section>\n"
    );
    if prefix == "LcID" {
        TemplateSet {
            location: element.into(),
            ..TemplateSet::default()
        }
    } else {
        TemplateSet {
            item: element.into(),
            ..TemplateSet::default()
        }
    }
}

fn locations() -> OdtWriter {
    let mut writer = OdtWriter::new(OdtFlavour::Plain, world_elements("LcID"));
    writer.hooks.location = Some(location_aka);
    writer
}

fn items() -> OdtWriter {
    let mut writer = OdtWriter::new(OdtFlavour::Plain, world_elements("ItID"));
    writer.hooks.item = Some(item_aka);
    writer
}

/// Chapters of one kind, scenes under third level headings.
fn kind_chapters(kind: Kind) -> OdtWriter {
    let part = "<text:section text:style-name=\"Sect1\" text:name=\"ChID:$ID\">\n\
                <text:h text:style-name=\"Heading_20_1\" text:outline-level=\"1\">$Title</text:h>\n";
    let chapter = "<text:section text:style-name=\"Sect1\" text:name=\"ChID:$ID\">\n\
                   <text:h text:style-name=\"Heading_20_2\" text:outline-level=\"2\">$Title</text:h>\n";
    let scene = "<text:h text:style-name=\"Heading_20_3\" text:outline-level=\"3\">$Title</text:h>\n\
                 <text:section text:style-name=\"Sect1\" text:name=\"ScID:$ID\">\n\
                 <text:p text:style-name=\"Text_20_body\">$SceneContent</text:p>\n\
                 </text:section>\n";
    let templates = if kind == Kind::Todo {
        TemplateSet {
            todo_part: part.into(),
            todo_chapter: chapter.into(),
            todo_scene: scene.into(),
            todo_chapter_end: SECTION_END.into(),
            ..TemplateSet::default()
        }
    } else {
        TemplateSet {
            notes_part: part.into(),
            notes_chapter: chapter.into(),
            notes_scene: scene.into(),
            notes_chapter_end: SECTION_END.into(),
            ..TemplateSet::default()
        }
    };
    let mut writer = OdtWriter::new(OdtFlavour::Formatted, templates);
    writer.selection = ChapterSelection::Only(kind);
    writer
}

pub(super) fn writer(document: OdtDocument) -> OdtWriter {
    match document {
        OdtDocument::Manuscript => manuscript(),
        OdtDocument::Proof => proof(),
        OdtDocument::SceneDesc => scene_descriptions(),
        OdtDocument::ChapterDesc => chapter_descriptions(),
        OdtDocument::PartDesc => part_descriptions(),
        OdtDocument::BriefSynopsis => brief_synopsis(),
        OdtDocument::Export => export(),
        OdtDocument::Characters => characters(),
        OdtDocument::Locations => locations(),
        OdtDocument::Items => items(),
        OdtDocument::Notes => kind_chapters(Kind::Notes),
        OdtDocument::Todo => kind_chapters(Kind::Todo),
    }
}
