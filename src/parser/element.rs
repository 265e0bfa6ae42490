//! A small owned element tree built from `quick-xml` events.
//!
//! Parsers navigate documents with direct-child and descendant lookups, so the
//! whole member is materialized once rather than tracked through a breadcrumb.

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error(transparent)]
    Attribute(#[from] AttrError),
    #[error("document has no root element")]
    NoRoot,
    #[error("document ended inside <{0}>")]
    Unclosed(String),
}

/// Mixed content of an element, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Local name, without any namespace prefix.
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub content: Vec<Content>,
}

impl Element {
    fn from_start(start: &BytesStart) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Element {
            name,
            attributes,
            content: Vec::new(),
        })
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.content.iter().filter_map(|c| match c {
            Content::Element(e) => Some(e),
            Content::Text(_) => None,
        })
    }

    /// Iterates over direct child elements with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    /// Returns the first direct child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Returns the first element with the given name in document order,
    /// including `self`.
    pub fn descendant(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.elements().find_map(|e| e.descendant(name))
    }

    /// Concatenated text of this element and all its descendants.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.push_text(&mut text);
        text
    }

    fn push_text(&self, out: &mut String) {
        for c in &self.content {
            match c {
                Content::Text(t) => out.push_str(t),
                Content::Element(e) => e.push_text(out),
            }
        }
    }
}

/// What a document declares before its root element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Prolog {
    /// Name from `<!DOCTYPE name ...>`, if declared.
    pub doctype: Option<String>,
    /// Local name of the root element, if the document has one.
    pub root: Option<String>,
}

/// Reads only as far as the root element's start tag.
pub fn read_prolog<R: BufRead>(source: R) -> Result<Prolog, XmlError> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut prolog = Prolog::default();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::DocType(e) => {
                let decl = String::from_utf8_lossy(&e).into_owned();
                prolog.doctype = decl.split_whitespace().next().map(str::to_string);
            }
            Event::Start(e) | Event::Empty(e) => {
                prolog.root = Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                break;
            }
            Event::Eof => break,
            _ => (),
        }
        buf.clear();
    }
    Ok(prolog)
}

/// Reads a whole document into an element tree.
///
/// Text is kept verbatim, including whitespace-only runs, so inline markup
/// does not swallow word boundaries and blank names survive. Indentation
/// between elements ends up as text content that element navigation skips.
pub fn read_document<R: BufRead>(source: R) -> Result<Element, XmlError> {
    let mut reader = Reader::from_reader(source);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => stack.push(Element::from_start(&e)?),
            Event::Empty(e) => {
                let element = Element::from_start(&e)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = e.unescape()?;
                    parent.content.push(Content::Text(text.into_owned()));
                }
            }
            Event::CData(e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    parent.content.push(Content::Text(text));
                }
            }
            Event::Eof => break,
            _ => (),
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }
    root.ok_or(XmlError::NoRoot)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.content.push(Content::Element(element)),
        // Only the first top-level element counts as the root.
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}
