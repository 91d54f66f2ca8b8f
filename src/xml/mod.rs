//! XML output plumbing: a streaming element writer on top of `quick-xml` and
//! an encoding adapter that turns its UTF-8 output into the document encoding.

pub mod encoding;
pub mod sink;

pub use encoding::EncodingWriter;
pub use sink::{Indent, XmlSink};
