//! Symmetric text codec for persisted calibration data.
//!
//! Every persisted type implements [`Codec`], which pairs an encoder that
//! writes whitespace-separated tokens with a decoder that reads them back in
//! exactly the same order. The layout is positional: there are no field names
//! on the wire, so `encode` and `decode` of a type must always visit fields in
//! the same sequence.
//!
//! # Format
//!
//! - Integers are written as decimal tokens separated by a single space.
//! - A newline separates field groups and terminates each top-level record.
//! - Booleans are `0` or `1`.
//! - Byte buffers are a length token followed (when non-empty) by a single
//!   lowercase hex token.
//! - Lists of records are prefixed with their element count.
//!
//! The decoder treats any ASCII whitespace as a token boundary, so a stream of
//! records can be read with [`decode_records`] until the input is exhausted.
//!
//! # Example
//!
//! ```
//! use calcache::codec::{decode_records, encode_records};
//!
//! let values: Vec<u32> = vec![3, 1, 4];
//! let mut out = Vec::new();
//! encode_records(&values, &mut out).unwrap();
//!
//! let text = String::from_utf8(out).unwrap();
//! let decoded: Vec<u32> = decode_records(&text).unwrap();
//! assert_eq!(decoded, values);
//! ```

use std::fmt::Display;
use std::io::{self, Write};
use std::iter::Peekable;
use std::str::{FromStr, SplitAsciiWhitespace};

use thiserror::Error;

/// Errors that can occur while decoding a token stream.
///
/// Positions are zero-based token indices into the stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The stream ended before a complete value was read.
    #[error("stream truncated at token {position}: expected {expected}")]
    Truncated {
        position: usize,
        expected: &'static str,
    },

    /// A token could not be parsed as the expected primitive.
    #[error("invalid {expected} token {token:?} at token {position}")]
    InvalidToken {
        position: usize,
        expected: &'static str,
        token: String,
    },

    /// An enumeration code outside the set known to this build.
    #[error("unknown {kind} code {code} at token {position}")]
    UnknownCode {
        position: usize,
        kind: &'static str,
        code: u32,
    },

    /// A flag mask carrying bits this build does not define.
    #[error("undefined {kind} bits {bits:#x} at token {position}")]
    UnknownFlags {
        position: usize,
        kind: &'static str,
        bits: u32,
    },

    /// A byte buffer whose payload does not match its declared length.
    #[error("buffer length mismatch at token {position}: declared {declared} bytes, found {actual}")]
    BufferLengthMismatch {
        position: usize,
        declared: usize,
        actual: usize,
    },

    /// A timestamp that cannot be represented.
    #[error("invalid timestamp {seconds} at token {position}")]
    InvalidTimestamp { position: usize, seconds: i64 },

    /// Average buffers that disagree with the declared average size.
    #[error(
        "inconsistent calibration buffers at token {position}: average size {average_size}, \
         white {white} bytes, dark {dark} bytes"
    )]
    InconsistentBuffers {
        position: usize,
        average_size: usize,
        white: usize,
        dark: usize,
    },

    /// The raw bytes are not valid UTF-8 text.
    #[error("stream is not valid UTF-8 (at byte {valid_up_to})")]
    NotUtf8 { valid_up_to: usize },
}

/// A value that can be written to and read back from the token stream.
///
/// Implementations must satisfy the round-trip law: decoding the output of
/// `encode` yields a value equal to the original.
pub trait Codec: Sized {
    /// Writes this value as tokens.
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> io::Result<()>;

    /// Reads a value, consuming exactly the tokens `encode` produced.
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError>;
}

/// Token writer over any [`Write`] sink.
pub struct Encoder<W: Write> {
    writer: W,
    line_start: bool,
}

impl<W: Write> Encoder<W> {
    /// Create an encoder positioned at the start of a line.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            line_start: true,
        }
    }

    /// Write a single token.
    pub fn token(&mut self, value: impl Display) -> io::Result<()> {
        if !self.line_start {
            self.writer.write_all(b" ")?;
        }
        write!(self.writer, "{value}")?;
        self.line_start = false;
        Ok(())
    }

    /// Write a field-group or record separator.
    pub fn newline(&mut self) -> io::Result<()> {
        self.writer.write_all(b"\n")?;
        self.line_start = true;
        Ok(())
    }

    /// Encode a nested value.
    pub fn put<T: Codec>(&mut self, value: &T) -> io::Result<()> {
        value.encode(self)
    }

    /// Encode a length-prefixed byte buffer.
    pub fn bytes(&mut self, data: &[u8]) -> io::Result<()> {
        self.token(data.len())?;
        if !data.is_empty() {
            self.token(hex::encode(data))?;
        }
        Ok(())
    }

    /// Encode a count-prefixed list of records.
    pub fn seq<T: Codec>(&mut self, items: &[T]) -> io::Result<()> {
        self.token(items.len())?;
        for item in items {
            item.encode(self)?;
        }
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Token reader over an in-memory string.
pub struct Decoder<'a> {
    tokens: Peekable<SplitAsciiWhitespace<'a>>,
    consumed: usize,
}

impl<'a> Decoder<'a> {
    /// Create a decoder positioned at the first token of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: input.split_ascii_whitespace().peekable(),
            consumed: 0,
        }
    }

    /// Create a decoder over raw bytes, rejecting non-UTF-8 input.
    pub fn from_bytes(input: &'a [u8]) -> Result<Self, DecodeError> {
        let text = std::str::from_utf8(input).map_err(|e| DecodeError::NotUtf8 {
            valid_up_to: e.valid_up_to(),
        })?;
        Ok(Self::new(text))
    }

    /// Number of tokens consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.consumed
    }

    /// Returns true once every token has been consumed.
    pub fn is_exhausted(&mut self) -> bool {
        self.tokens.peek().is_none()
    }

    /// Index of the most recently consumed token.
    fn last_position(&self) -> usize {
        self.consumed.saturating_sub(1)
    }

    /// Take the next raw token.
    pub fn next_token(&mut self, expected: &'static str) -> Result<&'a str, DecodeError> {
        let token = self.tokens.next().ok_or(DecodeError::Truncated {
            position: self.consumed,
            expected,
        })?;
        self.consumed += 1;
        Ok(token)
    }

    /// Take the next token and parse it with [`FromStr`].
    pub fn parse<T: FromStr>(&mut self, expected: &'static str) -> Result<T, DecodeError> {
        let token = self.next_token(expected)?;
        token.parse().map_err(|_| DecodeError::InvalidToken {
            position: self.last_position(),
            expected,
            token: token.to_string(),
        })
    }

    /// Decode a nested value.
    pub fn take<T: Codec>(&mut self) -> Result<T, DecodeError> {
        T::decode(self)
    }

    /// Decode a length-prefixed byte buffer.
    pub fn bytes(&mut self) -> Result<Vec<u8>, DecodeError> {
        let declared: usize = self.parse("buffer length")?;
        if declared == 0 {
            return Ok(Vec::new());
        }

        let token = self.next_token("buffer payload")?;
        let position = self.last_position();
        let data = hex::decode(token).map_err(|_| DecodeError::InvalidToken {
            position,
            expected: "hex buffer payload",
            token: abbreviate(token),
        })?;

        if data.len() != declared {
            return Err(DecodeError::BufferLengthMismatch {
                position,
                declared,
                actual: data.len(),
            });
        }
        Ok(data)
    }

    /// Decode a count-prefixed list of records.
    pub fn seq<T: Codec>(&mut self) -> Result<Vec<T>, DecodeError> {
        let count: usize = self.parse("element count")?;
        // The count is untrusted; let the vector grow as elements actually decode.
        let mut items = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }

    /// Error for an enumeration code that was just read.
    pub fn unknown_code(&self, kind: &'static str, code: u32) -> DecodeError {
        DecodeError::UnknownCode {
            position: self.last_position(),
            kind,
            code,
        }
    }

    /// Error for undefined flag bits in the mask that was just read.
    pub fn unknown_flags(&self, kind: &'static str, bits: u32) -> DecodeError {
        DecodeError::UnknownFlags {
            position: self.last_position(),
            kind,
            bits,
        }
    }

    /// Error for a timestamp that was just read.
    pub fn invalid_timestamp(&self, seconds: i64) -> DecodeError {
        DecodeError::InvalidTimestamp {
            position: self.last_position(),
            seconds,
        }
    }
}

/// Keep error messages readable when a payload token is huge.
pub(crate) fn abbreviate(token: &str) -> String {
    const LIMIT: usize = 32;
    if token.len() <= LIMIT {
        token.to_string()
    } else {
        let mut end = LIMIT;
        while !token.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &token[..end])
    }
}

macro_rules! primitive_codec {
    ($($ty:ty => $expected:literal),+ $(,)?) => {
        $(
            impl Codec for $ty {
                fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> io::Result<()> {
                    enc.token(self)
                }

                fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
                    dec.parse($expected)
                }
            }
        )+
    };
}

primitive_codec!(
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    usize => "unsigned size",
    i32 => "i32",
    i64 => "i64",
);

impl Codec for bool {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> io::Result<()> {
        enc.token(u8::from(*self))
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        match dec.next_token("bool")? {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(DecodeError::InvalidToken {
                position: dec.last_position(),
                expected: "bool",
                token: other.to_string(),
            }),
        }
    }
}

impl<T: Codec + Copy + Default, const N: usize> Codec for [T; N] {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> io::Result<()> {
        for item in self {
            item.encode(enc)?;
        }
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let mut out = [T::default(); N];
        for slot in &mut out {
            *slot = T::decode(dec)?;
        }
        Ok(out)
    }
}

/// Encode a stream of top-level records, each terminated by a newline.
pub fn encode_records<T: Codec, W: Write>(records: &[T], writer: W) -> io::Result<W> {
    let mut enc = Encoder::new(writer);
    for record in records {
        record.encode(&mut enc)?;
        enc.newline()?;
    }
    enc.finish()
}

/// Decode top-level records until the input is exhausted.
///
/// Fails on the first malformed record; no partial result is returned.
pub fn decode_records<T: Codec>(input: &str) -> Result<Vec<T>, DecodeError> {
    decode_remaining(&mut Decoder::new(input))
}

/// Decode top-level records from the decoder's current position to the end.
pub fn decode_remaining<T: Codec>(dec: &mut Decoder<'_>) -> Result<Vec<T>, DecodeError> {
    let mut records = Vec::new();
    while !dec.is_exhausted() {
        records.push(T::decode(dec)?);
    }
    Ok(records)
}
