//! Owned, mutable XML element tree
//!
//! yWriter files are rewritten in place: existing elements are kept and updated so unrelated
//! structure survives a round trip. The tree keeps element names, leaf text and child order;
//! attributes, comments and processing instructions do not occur in yWriter files.

use crate::error::FormatError;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use roxmltree::{Node, NodeType};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: &str) -> Self {
        XmlElement {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_text(name: &str, text: &str) -> Self {
        XmlElement {
            name: name.to_string(),
            text: Some(text.to_string()),
            children: Vec::new(),
        }
    }

    /// Parse a document and return its root element.
    pub fn parse(source: &str) -> Result<Self, FormatError> {
        let source = source.trim_start_matches('\u{feff}');
        let doc = roxmltree::Document::parse(source)
            .map_err(|e| FormatError::ParseError(format!("XML parsing error: {e}")))?;
        Ok(from_node(doc.root_element()))
    }

    /// First direct child named `name`.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// Direct children named `name`, in document order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Text of the first child named `name`; `None` if the child is missing or empty.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.find(name).and_then(|c| c.text.as_deref())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|c| c.name == name)
    }

    /// Remove the first child named `name`.
    pub fn remove(&mut self, name: &str) -> Option<XmlElement> {
        let index = self.position(name)?;
        Some(self.children.remove(index))
    }

    /// Remove every child named `name` and return them in document order.
    pub fn remove_all(&mut self, name: &str) -> Vec<XmlElement> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.children)
            .into_iter()
            .partition(|c| c.name == name);
        self.children = kept;
        removed
    }

    pub fn push(&mut self, child: XmlElement) -> &mut XmlElement {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Append a child with optional text and return it.
    pub fn sub_element(&mut self, name: &str, text: Option<&str>) -> &mut XmlElement {
        self.push(XmlElement {
            name: name.to_string(),
            text: text.map(str::to_string),
            children: Vec::new(),
        })
    }

    /// Insert `child` at `index`, or append when the index is past the end.
    pub fn insert(&mut self, index: usize, child: XmlElement) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
    }

    /// Serialize with two space indentation and without XML declaration.
    ///
    /// Only `&`, `<` and `>` are escaped in text.
    pub fn to_xml(&self) -> Result<String, FormatError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        write_element(&mut writer, self)?;
        String::from_utf8(writer.into_inner())
            .map_err(|e| FormatError::WriteError(format!("invalid UTF-8 in XML output: {e}")))
    }
}

fn from_node(node: Node) -> XmlElement {
    let mut element = XmlElement::new(node.tag_name().name());
    let mut text = String::new();
    let mut has_text = false;
    for child in node.children() {
        match child.node_type() {
            NodeType::Element => element.children.push(from_node(child)),
            NodeType::Text => {
                if let Some(t) = child.text() {
                    text.push_str(t);
                    has_text = true;
                }
            }
            _ => {}
        }
    }
    if element.children.is_empty() && has_text {
        element.text = Some(text);
    }
    element
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), FormatError> {
    let name = element.name.as_str();
    if element.children.is_empty() && element.text.is_none() {
        return write_event(writer, Event::Empty(BytesStart::new(name)));
    }
    write_event(writer, Event::Start(BytesStart::new(name)))?;
    if let Some(text) = &element.text {
        write_event(writer, Event::Text(BytesText::from_escaped(partial_escape(text.as_str()))))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    write_event(writer, Event::End(BytesEnd::new(name)))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event) -> Result<(), FormatError> {
    writer
        .write_event(event)
        .map_err(|e| FormatError::WriteError(format!("XML serialization error: {e}")))
}
