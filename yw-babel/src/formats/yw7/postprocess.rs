//! Text pass over serialized yWriter XML
//!
//! yWriter expects free text in CDATA sections and reads them unescaped, so after
//! serialization the text elements are wrapped and the entities resolved again.

const CDATA_TAGS: &[&str] = &[
    "Title",
    "AuthorName",
    "Bio",
    "Desc",
    "FieldTitle1",
    "FieldTitle2",
    "FieldTitle3",
    "FieldTitle4",
    "LaTeXHeaderFile",
    "Tags",
    "AKA",
    "ImageFile",
    "FullName",
    "Goals",
    "Notes",
    "RTFFile",
    "SceneContent",
    "Outcome",
    "Goal",
    "Conflict",
];

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Add the XML declaration, wrap text elements in CDATA and unescape entities.
pub fn postprocess(xml: &str, has_chapters: bool) -> String {
    let mut lines = vec![XML_HEADER.to_string()];
    for line in xml.split('\n') {
        let mut line = line.to_string();
        for tag in CDATA_TAGS {
            line = line
                .replace(&format!("<{tag}>"), &format!("<{tag}><![CDATA["))
                .replace(&format!("</{tag}>"), &format!("]]></{tag}>"));
        }
        lines.push(line);
    }
    let mut text = lines
        .join("\n")
        .replace("[CDATA[ \n", "[CDATA[")
        .replace("\n]]", "]]");
    if !has_chapters {
        text = text
            .replace("<CHAPTERS/>", "<CHAPTERS></CHAPTERS>")
            .replace("<CHAPTERS />", "<CHAPTERS></CHAPTERS>");
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
