//! XML to generic nested object mapping.
//!
//! Elements map the way xml2json maps them:
//!
//! - an element with only text becomes a string
//! - an empty element becomes `{}`
//! - attributes become keys, and text sits under `$t` next to them
//! - a child element that repeats becomes an array, in document order
//!
//! CDATA sections count as text. Whitespace between elements is dropped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};
use wpexport_core::item::TEXT_KEY;

use crate::error::Error;

#[derive(Debug, Default)]
struct Frame {
    name: String,
    attributes: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart, position: u64) -> Result<Self, Error> {
        let xml_error = |reason: String| Error::Xml { position, reason };

        let mut attributes = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| xml_error(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| xml_error(e.to_string()))?
                .into_owned();
            attributes.insert(key, Value::String(value));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            ..Default::default()
        })
    }

    fn into_value(self) -> Value {
        if self.attributes.is_empty() && self.children.is_empty() {
            return if self.text.is_empty() {
                Value::Object(Map::new())
            } else {
                Value::String(self.text)
            };
        }

        let mut map = self.attributes;
        for (name, value) in self.children {
            insert_child(&mut map, name, value);
        }
        if !self.text.is_empty() {
            map.insert(TEXT_KEY.to_string(), Value::String(self.text));
        }
        Value::Object(map)
    }
}

fn insert_child(map: &mut Map<String, Value>, name: String, value: Value) {
    match map.get_mut(&name) {
        Some(Value::Array(values)) => values.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(name, value);
        }
    }
}

fn close(stack: &mut [Frame], frame: Frame) {
    if let Some(parent) = stack.last_mut() {
        let name = frame.name.clone();
        insert_child(&mut parent.children, name, frame.into_value());
    }
}

/// Parse a whole XML document into a nested object keyed by the root element
pub fn parse_document(xml: &str) -> Result<Value, Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    // The bottom frame is a virtual root collecting the document element.
    let mut stack = vec![Frame::default()];

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader.read_event().map_err(|e| Error::Xml {
            position,
            reason: e.to_string(),
        })?;

        match event {
            Event::Start(start) => stack.push(Frame::open(&start, position)?),
            Event::Empty(start) => {
                let frame = Frame::open(&start, position)?;
                close(&mut stack, frame);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| Error::Xml {
                    position,
                    reason: e.to_string(),
                })?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(end) => {
                if stack.len() < 2 {
                    return Err(Error::UnexpectedClose(
                        String::from_utf8_lossy(end.name().as_ref()).into_owned(),
                    ));
                }
                if let Some(frame) = stack.pop() {
                    close(&mut stack, frame);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() > 1 {
        let name = stack.last().map(|f| f.name.clone()).unwrap_or_default();
        return Err(Error::UnclosedElement(name));
    }

    Ok(stack
        .pop()
        .map(|root| Value::Object(root.children))
        .unwrap_or(Value::Null))
}
