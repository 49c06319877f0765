//! ODT parsing
//!
//!     `content.xml` is streamed with quick-xml and translated into [`DocEvent`]s in HTML
//!     vocabulary, so ODT and HTML documents share one set of readers:
//!
//!         text:p (Quotations style)       blockquote
//!         text:p (heading style)          h1..h4
//!         text:p inside text:list-item    li
//!         text:p                          p
//!         text:h                          h<outline level>
//!         text:span (italic/bold style)   em / strong
//!         text:span (language style)      lang
//!         text:section                    div id=<section name>
//!         office:annotation               comment (first paragraph only)
//!         text:s                          s
//!
//!     Formatting is recognized by style: the standard `Emphasis`, `Strong_20_Emphasis` and
//!     `Quotations` styles, plus every automatic style whose text properties are italic, bold or
//!     carry a language.
//!
//!     The document locale comes from the default paragraph style in `styles.xml`; title, author
//!     and description from `meta.xml`, which outliners may leave out.

use crate::error::FormatError;
use crate::formats::common::events::{read_events, DocEvent, ReaderKind};
use crate::formats::common::package::read_part;
use crate::model::Project;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader as XmlReader;
use std::collections::HashMap;

const OFFICE_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";
const STYLE_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:style:1.0";
const FO_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
const META_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:meta:1.0";

fn parse_error(e: impl std::fmt::Display) -> FormatError {
    FormatError::ParseError(format!("cannot parse ODT document: {e}"))
}

/// The parts of an ODT package the readers use.
pub struct OdtPackage {
    pub content: String,
    styles: Option<String>,
    meta: Option<String>,
}

impl OdtPackage {
    pub fn open(bytes: &[u8]) -> Result<Self, FormatError> {
        let content = read_part(bytes, "content.xml")?
            .ok_or_else(|| FormatError::ParseError("ODT package without content.xml".into()))?;
        Ok(OdtPackage {
            content,
            styles: read_part(bytes, "styles.xml")?,
            meta: read_part(bytes, "meta.xml")?,
        })
    }

    /// Read the package with the reader of `kind`.
    pub fn read(&self, kind: ReaderKind) -> Result<Project, FormatError> {
        let mut events = Vec::new();
        if let Some(styles) = &self.styles {
            events.extend(locale_events(styles)?);
        }
        if let Some(meta) = &self.meta {
            events.extend(meta_events(meta)?);
        }
        events.extend(content_events(&self.content)?);
        read_events(kind, events)
    }
}

/// `body` event with the default paragraph locale.
fn locale_events(styles: &str) -> Result<Vec<DocEvent>, FormatError> {
    let doc = roxmltree::Document::parse(styles).map_err(parse_error)?;
    let properties = doc
        .descendants()
        .filter(|n| n.has_tag_name((STYLE_NS, "default-style")))
        .find(|n| n.attribute((STYLE_NS, "family")) == Some("paragraph"))
        .and_then(|n| n.children().find(|c| c.has_tag_name((STYLE_NS, "text-properties"))));
    let Some(properties) = properties else {
        return Ok(Vec::new());
    };
    let language = properties.attribute((FO_NS, "language")).unwrap_or_default();
    let country = properties.attribute((FO_NS, "country")).unwrap_or_default();
    Ok(vec![DocEvent::start(
        "body",
        &[("language", language), ("country", country)],
    )])
}

fn meta_events(meta: &str) -> Result<Vec<DocEvent>, FormatError> {
    let doc = roxmltree::Document::parse(meta).map_err(parse_error)?;
    let Some(office_meta) = doc
        .descendants()
        .find(|n| n.has_tag_name((OFFICE_NS, "meta")))
    else {
        return Ok(Vec::new());
    };
    let text_of = |ns: &str, name: &str| {
        office_meta
            .children()
            .find(|c| c.has_tag_name((ns, name)))
            .and_then(|c| c.text())
            .filter(|t| !t.is_empty())
    };
    let mut events = Vec::new();
    if let Some(title) = text_of(DC_NS, "title") {
        events.push(DocEvent::start("title", &[]));
        events.push(DocEvent::text(title));
        events.push(DocEvent::end("title"));
    }
    if let Some(author) = text_of(META_NS, "initial-creator") {
        events.push(DocEvent::start("meta", &[("name", "author"), ("content", author)]));
    }
    if let Some(desc) = text_of(DC_NS, "description") {
        events.push(DocEvent::start("meta", &[("name", "description"), ("content", desc)]));
    }
    Ok(events)
}

fn attributes(e: &BytesStart) -> Result<HashMap<String, String>, FormatError> {
    let mut attrs = HashMap::new();
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(parse_error)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(parse_error)?.into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn heading_level(style: &str) -> String {
    format!("h{}", style.chars().last().unwrap_or('1'))
}

/// Translates ODF elements into document events.
struct Translator {
    events: Vec<DocEvent>,
    em_styles: Vec<String>,
    strong_styles: Vec<String>,
    quote_styles: Vec<String>,
    language_styles: HashMap<String, String>,
    heading_styles: HashMap<String, String>,
    heading: Option<String>,
    paragraph: bool,
    blockquote: bool,
    list: bool,
    spans: Vec<&'static str>,
    comment_paragraphs: Option<usize>,
    comment: String,
    style: Option<String>,
}

impl Translator {
    fn new() -> Self {
        Translator {
            events: Vec::new(),
            em_styles: vec!["Emphasis".into()],
            strong_styles: vec!["Strong_20_Emphasis".into()],
            quote_styles: vec!["Quotations".into()],
            language_styles: HashMap::new(),
            heading_styles: HashMap::new(),
            heading: None,
            paragraph: false,
            blockquote: false,
            list: false,
            spans: Vec::new(),
            comment_paragraphs: None,
            comment: String::new(),
            style: None,
        }
    }

    fn emit_start(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.events.push(DocEvent::start(tag, attrs));
    }

    fn emit_end(&mut self, tag: &str) {
        self.events.push(DocEvent::end(tag));
    }

    fn open_spans(&mut self, style: &str) {
        if self.em_styles.iter().any(|s| s == style) {
            self.spans.push("em");
            self.emit_start("em", &[]);
        }
        if self.strong_styles.iter().any(|s| s == style) {
            self.spans.push("strong");
            self.emit_start("strong", &[]);
        }
    }

    fn start(&mut self, name: &[u8], attrs: &HashMap<String, String>) {
        let style = attrs.get("text:style-name").map(String::as_str).unwrap_or("");
        match name {
            b"text:p" => {
                let language = self.language_styles.get(style).cloned();
                let param: Vec<(&str, &str)> = match &language {
                    Some(language) => vec![("lang", language.as_str())],
                    None => Vec::new(),
                };
                if let Some(count) = self.comment_paragraphs.as_mut() {
                    *count += 1;
                    return;
                }
                if self.quote_styles.iter().any(|s| s == style) {
                    self.emit_start("blockquote", &param);
                    self.paragraph = true;
                    self.blockquote = true;
                } else if style.starts_with("Heading") {
                    let heading = heading_level(style);
                    self.emit_start(&heading, &[]);
                    self.heading = Some(heading);
                } else if let Some(heading) = self.heading_styles.get(style).cloned() {
                    self.emit_start(&heading, &[]);
                    self.heading = Some(heading);
                } else if self.list {
                    self.emit_start("li", &[]);
                    self.paragraph = true;
                } else {
                    self.emit_start("p", &param);
                    self.paragraph = true;
                }
                self.open_spans(style);
            }
            b"text:span" => {
                self.open_spans(style);
                if let Some(language) = self.language_styles.get(style).cloned() {
                    self.spans.push("lang");
                    self.emit_start("lang", &[("lang", language.as_str())]);
                }
            }
            b"text:section" => {
                let id = attrs.get("text:name").cloned().unwrap_or_default();
                self.emit_start("div", &[("id", id.as_str())]);
            }
            b"office:annotation" => {
                self.comment_paragraphs = Some(0);
                self.comment.clear();
            }
            b"text:h" => {
                let heading = match attrs.get("text:outline-level") {
                    Some(level) => format!("h{level}"),
                    None => heading_level(style),
                };
                self.emit_start(&heading, &[]);
                self.heading = Some(heading);
            }
            b"text:list-item" => self.list = true,
            b"style:style" => {
                let name = attrs.get("style:name").cloned();
                let parent = attrs
                    .get("style:parent-style-name")
                    .map(String::as_str)
                    .unwrap_or("");
                if let Some(name) = &name {
                    if parent.starts_with("Heading") {
                        self.heading_styles.insert(name.clone(), heading_level(parent));
                    } else if parent == "Quotations" {
                        self.quote_styles.push(name.clone());
                    }
                }
                self.style = name;
            }
            b"style:text-properties" => {
                let Some(current) = self.style.clone() else {
                    return;
                };
                if attrs.get("fo:font-style").map(String::as_str) == Some("italic") {
                    self.em_styles.push(current.clone());
                }
                if attrs.get("fo:font-weight").map(String::as_str) == Some("bold") {
                    self.strong_styles.push(current.clone());
                }
                if let Some(language) = attrs.get("fo:language").filter(|l| !l.is_empty()) {
                    let locale = match attrs.get("fo:country").map(String::as_str) {
                        Some("none") | None => language.clone(),
                        Some(country) => format!("{language}-{country}"),
                    };
                    self.language_styles.insert(current, locale);
                }
            }
            b"text:s" => self.emit_start("s", &[]),
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"text:p" => {
                if self.comment_paragraphs.is_some() {
                    return;
                }
                while let Some(span) = self.spans.pop() {
                    self.emit_end(span);
                }
                if self.blockquote {
                    self.emit_end("blockquote");
                    self.blockquote = false;
                } else if let Some(heading) = self.heading.take() {
                    self.emit_end(&heading);
                } else {
                    self.emit_end("p");
                }
                self.paragraph = false;
            }
            b"text:span" => {
                if let Some(span) = self.spans.pop() {
                    self.emit_end(span);
                }
            }
            b"text:section" => self.emit_end("div"),
            b"office:annotation" => {
                let comment = std::mem::take(&mut self.comment);
                self.events.push(DocEvent::Comment(comment));
                self.comment_paragraphs = None;
            }
            b"text:h" => {
                if let Some(heading) = self.heading.take() {
                    self.emit_end(&heading);
                }
            }
            b"text:list-item" => self.list = false,
            b"style:style" => self.style = None,
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        match self.comment_paragraphs {
            Some(1) => self.comment.push_str(text),
            Some(_) => {}
            None if self.paragraph || self.heading.is_some() => {
                self.events.push(DocEvent::text(text));
            }
            None => {}
        }
    }
}

/// Translate `content.xml` into document events.
pub fn content_events(content: &str) -> Result<Vec<DocEvent>, FormatError> {
    let mut reader = XmlReader::from_str(content);
    reader.config_mut().trim_text(false);
    let mut translator = Translator::new();
    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(e) => {
                let attrs = attributes(&e)?;
                translator.start(e.name().as_ref(), &attrs);
            }
            Event::Empty(e) => {
                let attrs = attributes(&e)?;
                translator.start(e.name().as_ref(), &attrs);
                translator.end(e.name().as_ref());
            }
            Event::End(e) => translator.end(e.name().as_ref()),
            Event::Text(e) => {
                let text = e.unescape().map_err(parse_error)?;
                translator.text(&text);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                translator.text(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(translator.events)
}

/// Read an ODT package with the reader of `kind`.
pub fn parse_from_odt(kind: ReaderKind, bytes: &[u8]) -> Result<Project, FormatError> {
    OdtPackage::open(bytes)?.read(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = r#"<office:document-content>
<office:automatic-styles>
<style:style style:name="T1" style:family="text"><style:text-properties fo:language="fr" fo:country="FR"/></style:style>
<style:style style:name="P1" style:family="paragraph" style:parent-style-name="Quotations"/>
</office:automatic-styles>
<office:body><office:text>
<text:section text:name="ChID:1">
<text:h text:outline-level="2">One</text:h>
<text:section text:name="ScID:2">
<text:p text:style-name="Text_20_body"><office:annotation><dc:creator>Scene</dc:creator><text:p>~ Title ~</text:p><text:p/><text:p>link</text:p></office:annotation>A <text:span text:style-name="Emphasis">b</text:span> &amp; <text:span text:style-name="T1">c</text:span></text:p>
<text:p text:style-name="P1">quote<text:s/>d</text:p>
</text:section>
</text:section>
</office:text></office:body>
</office:document-content>"#;

    #[test]
    fn test_content_events() {
        let events = content_events(CONTENT).unwrap();
        assert!(events.contains(&DocEvent::start("div", &[("id", "ScID:2")])));
        assert!(events.contains(&DocEvent::start("h2", &[])));
        assert!(events.contains(&DocEvent::Comment("~ Title ~".into())));
        assert!(events.contains(&DocEvent::start("lang", &[("lang", "fr-FR")])));
        assert!(events.contains(&DocEvent::start("blockquote", &[])));
        assert!(events.contains(&DocEvent::text(" & ")));
        assert!(!events.contains(&DocEvent::text("link")));
    }

    #[test]
    fn test_manuscript_from_content() {
        let project = read_events(ReaderKind::Manuscript, content_events(CONTENT).unwrap()).unwrap();
        assert_eq!(project.chapters["1"].title.as_deref(), Some("One"));
        let scene = &project.scenes["2"];
        assert_eq!(scene.title.as_deref(), Some("Title"));
        assert_eq!(
            scene.content(),
            Some("A [i]b[/i] & [lang=fr-FR]c[/lang=fr-FR]\n> quote d")
        );
        assert_eq!(project.languages, Some(vec!["fr-FR".to_string()]));
    }

    #[test]
    fn test_locale_and_meta() {
        let styles = format!(
            r#"<office:document-styles xmlns:office="{OFFICE_NS}" xmlns:style="{STYLE_NS}" xmlns:fo="{FO_NS}"><office:styles><style:default-style style:family="paragraph"><style:text-properties fo:language="de" fo:country="AT"/></style:default-style></office:styles></office:document-styles>"#
        );
        let meta = format!(
            r#"<office:document-meta xmlns:office="{OFFICE_NS}" xmlns:dc="{DC_NS}" xmlns:meta="{META_NS}"><office:meta><dc:title>Buch</dc:title><meta:initial-creator>Jo</meta:initial-creator></office:meta></office:document-meta>"#
        );
        let mut events = locale_events(&styles).unwrap();
        events.extend(meta_events(&meta).unwrap());
        let project = read_events(ReaderKind::Import, events).unwrap();
        assert_eq!(project.language_code.as_deref(), Some("de"));
        assert_eq!(project.country_code.as_deref(), Some("AT"));
        assert_eq!(project.title.as_deref(), Some("Buch"));
        assert_eq!(project.author_name.as_deref(), Some("Jo"));
    }

    #[test]
    fn test_broken_content_is_parse_error() {
        assert!(matches!(
            content_events("<a><b></a>"),
            Err(FormatError::ParseError(_))
        ));
    }
}
