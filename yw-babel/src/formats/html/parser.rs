//! HTML parsing
//!
//! The document is parsed with html5ever into an rcdom tree, which is walked depth first into
//! [`DocEvent`]s. `i` and `b` are read as `em` and `strong`, a `span` with a `lang` attribute as
//! `lang`. The `lang` attribute of the `html` element sets the document locale.

use crate::error::FormatError;
use crate::formats::common::events::{read_events, DocEvent, ReaderKind};
use crate::model::Project;
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

fn element_tag(name: &str, attrs: &[(String, String)]) -> String {
    match name {
        "i" => "em".to_string(),
        "b" => "strong".to_string(),
        "span" if attrs.iter().any(|(k, _)| k == "lang") => "lang".to_string(),
        _ => name.to_string(),
    }
}

fn locale_event(lang: &str) -> DocEvent {
    let (language, country) = lang.split_once('-').unwrap_or((lang, ""));
    DocEvent::start("body", &[("language", language), ("country", country)])
}

fn walk(node: &Handle, events: &mut Vec<DocEvent>) {
    match &node.data {
        NodeData::Element { name, attrs, .. } => {
            let attrs: Vec<(String, String)> = attrs
                .borrow()
                .iter()
                .map(|a| (a.name.local.to_string(), String::from(&*a.value)))
                .collect();
            let local: &str = &name.local;
            if local == "html" {
                if let Some((_, lang)) = attrs.iter().find(|(k, _)| k == "lang") {
                    events.push(locale_event(lang));
                }
            }
            let tag = element_tag(local, &attrs);
            events.push(DocEvent::Start {
                tag: tag.clone(),
                attrs,
            });
            for child in node.children.borrow().iter() {
                walk(child, events);
            }
            events.push(DocEvent::End { tag });
        }
        NodeData::Text { contents } => {
            events.push(DocEvent::Text(String::from(&**contents.borrow())));
        }
        NodeData::Comment { contents } => {
            events.push(DocEvent::Comment(String::from(&**contents)));
        }
        _ => {
            for child in node.children.borrow().iter() {
                walk(child, events);
            }
        }
    }
}

/// Events of an HTML document in document order.
pub fn document_events(source: &[u8]) -> Result<Vec<DocEvent>, FormatError> {
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut &source[..])
        .map_err(|e| FormatError::ParseError(format!("cannot parse HTML document: {e}")))?;
    let mut events = Vec::new();
    walk(&dom.document, &mut events);
    Ok(events)
}

/// Read an HTML document with the reader of `kind`.
pub fn parse_from_html(kind: ReaderKind, source: &[u8]) -> Result<Project, FormatError> {
    read_events(kind, document_events(source)?)
}
