//! Owned XML element tree built on the quick-xml event reader
//!
//! The model layer consumes an already-parsed tree rather than a raw event
//! stream, so the whole input is read eagerly into `Element` values up
//! front. Reports are small enough that this is never a memory concern.

use nessview_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A single parsed XML element: name, attributes, direct text, children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Parse an XML string into its root element
    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(start)) => {
                    stack.push(element_from_start(&start)?);
                }
                Ok(Event::Empty(start)) => {
                    let element = element_from_start(&start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Ok(Event::Text(text)) => {
                    if let Some(element) = stack.last_mut() {
                        let unescaped =
                            text.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                        element.text.push_str(&unescaped);
                    }
                }
                Ok(Event::CData(cdata)) => {
                    if let Some(element) = stack.last_mut() {
                        element
                            .text
                            .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                    }
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("unbalanced closing tag".to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Ok(Event::Eof) => {
                    return Err(Error::Xml("unexpected end of input".to_string()));
                }
                Err(e) => return Err(Error::Xml(e.to_string())),
                _ => {}
            }
            buf.clear();
        }
    }

    /// Element (tag) name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value, if the attribute is present
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Direct text content (empty string when the element has none)
    pub fn text(&self) -> &str {
        &self.text
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given name, in document order
    pub fn children<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        self.children.iter().filter(|c| c.name == name).collect()
    }

    /// First element at a slash-separated path, e.g. `"Policy/policyName"`
    pub fn find(&self, path: &str) -> Option<&Element> {
        let mut current = self;
        for segment in path.split('/') {
            current = current.child(segment)?;
        }
        Some(current)
    }

    /// Every element at a slash-separated path, across all matching
    /// intermediate elements, in document order
    pub fn find_all<'a>(&'a self, path: &str) -> Vec<&'a Element> {
        let mut current = vec![self];
        for segment in path.split('/') {
            let mut next = Vec::new();
            for element in current {
                next.extend(element.children(segment));
            }
            current = next;
        }
        current
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
    let mut attributes = Vec::new();

    for attr in start.attributes().filter_map(|a| a.ok()) {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Xml(e.to_string()))?
            .to_string();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}
