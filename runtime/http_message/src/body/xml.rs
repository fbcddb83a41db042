//! Decoding of XML documents into a structured tree.
//!
//! The root element is mapped to a map:
//!
//! - child elements are keyed by their name; repeated names are collected into a sequence;
//! - attributes live under the `@attributes` key;
//! - an element without attributes or children becomes its text content;
//! - the text content of an element that also has attributes or children lives under `#text`.
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

use super::errors::XmlDecodeError;

const ATTRIBUTES_KEY: &str = "@attributes";
const TEXT_KEY: &str = "#text";

/// Whether the media type is `text/xml`, `application/xml` or another `*/*+xml` type.
pub(super) fn is_xml(mime: &mime::Mime) -> bool {
    (mime.type_() == mime::TEXT || mime.type_() == mime::APPLICATION)
        && (mime.subtype() == mime::XML || mime.suffix().is_some_and(|name| name == mime::XML))
}

pub(super) fn decode(bytes: &[u8]) -> Result<Value, XmlDecodeError> {
    let document = std::str::from_utf8(bytes)?;
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(true);

    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Value> = None;
    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if open.is_empty() && root.is_some() {
                    return Err(XmlDecodeError::MultipleRoots);
                }
                open.push(Element::open(&start)?);
            }
            Event::Empty(start) => {
                if open.is_empty() && root.is_some() {
                    return Err(XmlDecodeError::MultipleRoots);
                }
                let element = Element::open(&start)?;
                close(element, &mut open, &mut root);
            }
            // The reader checks that end tags match their start tags.
            Event::End(_) => {
                if let Some(element) = open.pop() {
                    close(element, &mut open, &mut root);
                }
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut open, &text)?;
            }
            Event::CData(cdata) => {
                let text = String::from_utf8_lossy(&cdata);
                push_text(&mut open, &text)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes carry no data.
            _ => {}
        }
    }

    if let Some(element) = open.pop() {
        return Err(XmlDecodeError::UnclosedElement { name: element.name });
    }
    match root.ok_or(XmlDecodeError::MissingRoot)? {
        Value::String(text) if text.is_empty() => Ok(Value::Object(Map::new())),
        Value::String(text) => {
            let mut map = Map::new();
            map.insert(TEXT_KEY.to_owned(), Value::String(text));
            Ok(Value::Object(map))
        }
        tree => Ok(tree),
    }
}

fn push_text(open: &mut [Element], text: &str) -> Result<(), XmlDecodeError> {
    match open.last_mut() {
        Some(element) => {
            element.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(XmlDecodeError::TextOutsideRoot),
    }
}

fn close(element: Element, open: &mut [Element], root: &mut Option<Value>) {
    let (name, value) = element.into_entry();
    match open.last_mut() {
        Some(parent) => parent.add_child(name, value),
        None => *root = Some(value),
    }
}

struct Element {
    name: String,
    attributes: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, XmlDecodeError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Map::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.insert(key, Value::String(value));
        }
        Ok(Self {
            name,
            attributes,
            children: Map::new(),
            text: String::new(),
        })
    }

    fn add_child(&mut self, name: String, value: Value) {
        // Element values are never sequences, so a sequence marks a repeated name.
        match self.children.get_mut(&name) {
            None => {
                self.children.insert(name, value);
            }
            Some(Value::Array(siblings)) => siblings.push(value),
            Some(existing) => {
                let first = std::mem::take(existing);
                *existing = Value::Array(vec![first, value]);
            }
        }
    }

    fn into_entry(self) -> (String, Value) {
        if self.attributes.is_empty() && self.children.is_empty() {
            return (self.name, Value::String(self.text));
        }
        let mut map = Map::new();
        if !self.attributes.is_empty() {
            map.insert(ATTRIBUTES_KEY.to_owned(), Value::Object(self.attributes));
        }
        map.extend(self.children);
        if !self.text.is_empty() {
            map.insert(TEXT_KEY.to_owned(), Value::String(self.text));
        }
        (self.name, Value::Object(map))
    }
}
