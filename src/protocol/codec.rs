//! Wire framing for requests and responses.
//!
//! The stock DataStacks server has no message boundaries: it answers each
//! request with a single write and the client reads at most
//! [`LEGACY_READ_SIZE`] bytes. [`Framing::Legacy`] reproduces that. The
//! `Line` and `Length` modes are for servers that delimit their replies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio_util::bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder, LengthDelimitedCodec};

use crate::error::ShellError;

/// Largest response chunk returned by one legacy read.
pub const LEGACY_READ_SIZE: usize = 1024;

/// Longest accepted line in [`Framing::Line`] mode.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Largest accepted frame in [`Framing::Length`] mode.
pub const MAX_FRAME_LENGTH: usize = 8 * 1024 * 1024;

/// How message boundaries are found on the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framing {
    /// Raw bytes out, one read of up to 1024 bytes in.
    #[default]
    Legacy,
    /// Newline-terminated messages in both directions.
    Line,
    /// 4-byte big-endian length prefix in both directions.
    Length,
}

impl FromStr for Framing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" | "raw" => Ok(Framing::Legacy),
            "line" | "lines" => Ok(Framing::Line),
            "length" | "length-prefixed" => Ok(Framing::Length),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Framing::Legacy => "legacy",
            Framing::Line => "line",
            Framing::Length => "length",
        };
        f.write_str(name)
    }
}

/// Codec covering every [`Framing`] mode.
#[derive(Debug)]
pub struct WireCodec {
    framing: Framing,
    length: LengthDelimitedCodec,
}

impl WireCodec {
    /// Create a codec for the given framing.
    pub fn new(framing: Framing) -> Self {
        Self {
            framing,
            length: LengthDelimitedCodec::builder()
                .max_frame_length(MAX_FRAME_LENGTH)
                .new_codec(),
        }
    }

    /// The framing in use.
    pub fn framing(&self) -> Framing {
        self.framing
    }

    fn decode_line(buf: &mut BytesMut) -> Result<Option<BytesMut>, ShellError> {
        match buf.iter().position(|b| *b == b'\n') {
            Some(pos) if pos > MAX_LINE_LENGTH => Err(line_too_long()),
            Some(pos) => {
                let mut line = buf.split_to(pos + 1);
                line.truncate(pos);
                if line.last() == Some(&b'\r') {
                    line.truncate(pos - 1);
                }
                Ok(Some(line))
            }
            None if buf.len() > MAX_LINE_LENGTH => Err(line_too_long()),
            None => Ok(None),
        }
    }
}

fn line_too_long() -> ShellError {
    ShellError::Frame(format!("line exceeds {} bytes", MAX_LINE_LENGTH))
}

impl Default for WireCodec {
    fn default() -> Self {
        Self::new(Framing::default())
    }
}

impl Decoder for WireCodec {
    type Item = BytesMut;
    type Error = ShellError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.framing {
            Framing::Legacy => {
                if buf.is_empty() {
                    return Ok(None);
                }
                // Anything past the first chunk stays buffered for the next read
                let n = buf.len().min(LEGACY_READ_SIZE);
                Ok(Some(buf.split_to(n)))
            }
            Framing::Line => Self::decode_line(buf),
            Framing::Length => self
                .length
                .decode(buf)
                .map_err(|e| ShellError::Frame(e.to_string())),
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(buf)? {
            Some(frame) => Ok(Some(frame)),
            // Server closed after an unterminated line: hand it over as-is
            None if self.framing == Framing::Line && !buf.is_empty() => {
                Ok(Some(buf.split_to(buf.len())))
            }
            None if buf.is_empty() => Ok(None),
            None => Err(ShellError::Frame(format!(
                "{} bytes of incomplete frame at end of stream",
                buf.len()
            ))),
        }
    }
}

impl Encoder<Bytes> for WireCodec {
    type Error = ShellError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match self.framing {
            Framing::Legacy => {
                dst.extend_from_slice(&item);
                Ok(())
            }
            Framing::Line => {
                dst.reserve(item.len() + 1);
                dst.extend_from_slice(&item);
                dst.put_u8(b'\n');
                Ok(())
            }
            Framing::Length => self
                .length
                .encode(item, dst)
                .map_err(|e| ShellError::Frame(e.to_string())),
        }
    }
}
