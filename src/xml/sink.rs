use std::io::{BufWriter, Write};

use encoding_rs::Encoding;
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::error::{YmlError, YmlResult};

use super::encoding::EncodingWriter;

/// Indentation applied by the XML engine: one byte repeated `size` times per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent {
    pub byte: u8,
    pub size: usize,
}

/// Streaming XML element writer.
///
/// Wraps a `quick_xml::Writer` whose output goes through a [`BufWriter`] and an
/// [`EncodingWriter`], so every event is transcoded into the document encoding
/// as it is written. Nothing is kept in memory beyond the buffers.
pub struct XmlSink<W: Write> {
    writer: Writer<EncodingWriter<BufWriter<W>>>,
}

impl<W: Write> XmlSink<W> {
    pub fn new(inner: W, encoding: &'static Encoding, indent: Option<Indent>) -> Self {
        let output = EncodingWriter::new(BufWriter::new(inner), encoding);
        let writer = match indent {
            Some(indent) => Writer::new_with_indent(output, indent.byte, indent.size),
            None => Writer::new(output),
        };
        Self { writer }
    }

    /// Writes `<?xml version="1.0" encoding=".."?>`.
    pub fn declaration(&mut self, encoding: &str) -> YmlResult<()> {
        self.event(
            Event::Decl(BytesDecl::new("1.0", Some(encoding), None)),
            "declaration",
        )
    }

    pub fn start(&mut self, element: BytesStart<'_>) -> YmlResult<()> {
        self.event(Event::Start(element), "start tag")
    }

    pub fn end(&mut self, name: &str) -> YmlResult<()> {
        self.event(Event::End(BytesEnd::new(name)), "end tag")
    }

    /// Writes a self-closing element.
    pub fn empty(&mut self, element: BytesStart<'_>) -> YmlResult<()> {
        self.event(Event::Empty(element), "empty element")
    }

    /// Writes `<name ...>text</name>`, escaping the text.
    pub fn text_element(&mut self, element: BytesStart<'_>, text: &str) -> YmlResult<()> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        self.start(element)?;
        // An empty text event still keeps the closing tag on the same line.
        self.event(Event::Text(BytesText::new(text)), "text")?;
        self.end(&name)
    }

    /// Flushes all buffered output down to the underlying writer.
    pub fn finish(self) -> YmlResult<()> {
        let buffered = self.writer.into_inner().finish()?;
        buffered
            .into_inner()
            .map_err(|e| YmlError::Io(e.into_error()))?;
        Ok(())
    }

    fn event(&mut self, event: Event<'_>, what: &str) -> YmlResult<()> {
        self.writer
            .write_event(event)
            .map_err(|e| YmlError::XmlWriter(format!("Failed to write XML {}: {}", what, e)))
    }
}
