use std::io::{self, Write};

use encoding_rs::{CoderResult, Encoder, Encoding, UTF_8};

const BUFFER_SIZE: usize = 8 * 1024;

/// An `io::Write` adapter that transcodes UTF-8 input into a target encoding.
///
/// Input may be split anywhere, including inside a multi-byte sequence: the
/// incomplete tail is kept until the next write. Characters the target encoding
/// cannot represent are written as decimal numeric character references
/// (`&#26085;`), which XML parsers resolve back to the original character.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use yml_generator::xml::EncodingWriter;
///
/// let mut writer = EncodingWriter::new(Vec::new(), encoding_rs::WINDOWS_1251);
/// writer.write_all("Книги".as_bytes()).unwrap();
/// let bytes = writer.finish().unwrap();
///
/// assert_eq!(bytes, vec![0xCA, 0xED, 0xE8, 0xE3, 0xE8]);
/// ```
pub struct EncodingWriter<W: Write> {
    inner: W,
    encoder: Option<Encoder>,
    pending: Vec<u8>,
    buffer: Vec<u8>,
}

impl<W: Write> EncodingWriter<W> {
    pub fn new(inner: W, encoding: &'static Encoding) -> Self {
        let encoder = if encoding == UTF_8 {
            None
        } else {
            Some(encoding.new_encoder())
        };
        Self {
            inner,
            encoder,
            pending: Vec::new(),
            buffer: vec![0; BUFFER_SIZE],
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Flushes the encoder state and returns the underlying writer.
    ///
    /// Fails with `InvalidData` if the input ended in the middle of a UTF-8 sequence.
    pub fn finish(mut self) -> io::Result<W> {
        if !self.pending.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "stream ended inside a UTF-8 sequence",
            ));
        }
        if let Some(encoder) = self.encoder.as_mut() {
            encode_into(encoder, &mut self.buffer, &mut self.inner, "", true)?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for EncodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(encoder) = self.encoder.as_mut() else {
            return self.inner.write(buf);
        };

        self.pending.extend_from_slice(buf);
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(text) => text.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                self.pending.clear();
                return Err(io::Error::new(io::ErrorKind::InvalidData, e));
            }
        };

        let rest = self.pending.split_off(valid);
        let complete = std::mem::replace(&mut self.pending, rest);
        // Validated above.
        let text = std::str::from_utf8(&complete)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        encode_into(encoder, &mut self.buffer, &mut self.inner, text, false)?;

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn encode_into<W: Write>(
    encoder: &mut Encoder,
    buffer: &mut [u8],
    out: &mut W,
    text: &str,
    last: bool,
) -> io::Result<()> {
    let mut remaining = text;
    loop {
        let (result, read, written, _) = encoder.encode_from_utf8(remaining, buffer, last);
        out.write_all(&buffer[..written])?;
        remaining = &remaining[read..];
        match result {
            CoderResult::InputEmpty => return Ok(()),
            CoderResult::OutputFull => continue,
        }
    }
}
