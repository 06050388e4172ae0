//! XML record serializer
//!
//! Produces the shape Rails' `to_xml` gives a record: a root element named
//! after the record, typed scalar elements, `type="array"` containers with
//! singular child elements, `nil="true"` for nulls and dasherized keys.
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <foo>
//!   <id type="integer">1</id>
//!   <created-at nil="true"/>
//! </foo>
//! ```

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use respec_application::RecordSerializer;
use respec_domain::{ResolutionError, Value};

use super::SerializationError;

/// Rails-like XML rendering of a record.
#[derive(Debug, Clone, Copy)]
pub struct XmlSerializer {
    declaration: bool,
    indent: usize,
}

impl Default for XmlSerializer {
    fn default() -> Self {
        Self {
            declaration: true,
            indent: 2,
        }
    }
}

impl XmlSerializer {
    /// Serializer with the XML declaration and 2-space indentation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles the `<?xml ...?>` declaration.
    #[must_use]
    pub const fn with_declaration(mut self, declaration: bool) -> Self {
        self.declaration = declaration;
        self
    }

    /// Indentation width; `0` writes everything on one line.
    #[must_use]
    pub const fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Renders `record` under a root element called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails or produces invalid UTF-8.
    pub fn render(&self, name: &str, record: &Value) -> Result<String, SerializationError> {
        let mut writer = if self.indent == 0 {
            Writer::new(Cursor::new(Vec::new()))
        } else {
            Writer::new_with_indent(Cursor::new(Vec::new()), b' ', self.indent)
        };

        if self.declaration {
            emit(
                &mut writer,
                Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
            )?;
        }
        write_element(&mut writer, &dasherize(name), record)?;

        Ok(String::from_utf8(writer.into_inner().into_inner())?)
    }
}

impl RecordSerializer for XmlSerializer {
    fn serialize(&self, name: &str, record: &Value) -> Result<String, ResolutionError> {
        Ok(self.render(name, record)?)
    }
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn emit(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), SerializationError> {
    writer
        .write_event(event)
        .map_err(|err| SerializationError::Xml(err.to_string()))
}

fn write_element(writer: &mut XmlWriter, tag: &str, value: &Value) -> Result<(), SerializationError> {
    let mut start = BytesStart::new(tag);
    match value {
        Value::Null => {
            start.push_attribute(("nil", "true"));
            emit(writer, Event::Empty(start))
        }
        Value::Bool(b) => {
            start.push_attribute(("type", "boolean"));
            write_text(writer, start, tag, &b.to_string())
        }
        Value::Number(n) => {
            let kind = if n.is_f64() { "float" } else { "integer" };
            start.push_attribute(("type", kind));
            write_text(writer, start, tag, &n.to_string())
        }
        Value::String(s) => write_text(writer, start, tag, s),
        Value::Array(items) => {
            start.push_attribute(("type", "array"));
            if items.is_empty() {
                return emit(writer, Event::Empty(start));
            }
            emit(writer, Event::Start(start))?;
            let child = singularize(tag);
            for item in items {
                write_element(writer, &child, item)?;
            }
            emit(writer, Event::End(BytesEnd::new(tag)))
        }
        Value::Object(fields) => {
            if fields.is_empty() {
                return emit(writer, Event::Empty(start));
            }
            emit(writer, Event::Start(start))?;
            for (key, field) in fields {
                write_element(writer, &dasherize(key), field)?;
            }
            emit(writer, Event::End(BytesEnd::new(tag)))
        }
    }
}

fn write_text(
    writer: &mut XmlWriter,
    start: BytesStart<'_>,
    tag: &str,
    text: &str,
) -> Result<(), SerializationError> {
    emit(writer, Event::Start(start))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(tag)))
}

fn dasherize(name: &str) -> String {
    name.replace('_', "-")
}

/// Element name for the members of an array element.
fn singularize(tag: &str) -> String {
    if let Some(stem) = tag.strip_suffix("ies") {
        format!("{stem}y")
    } else if tag.ends_with("sses") || tag.ends_with("xes") {
        tag[..tag.len() - 2].to_string()
    } else if tag.ends_with('s') && !tag.ends_with("ss") {
        tag[..tag.len() - 1].to_string()
    } else {
        tag.to_string()
    }
}
