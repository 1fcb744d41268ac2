use std::fmt;
use std::io::Cursor;
use std::str;
use std::string::FromUtf8Error;

use bytes::{Buf, Bytes};
use thiserror::Error as ThisError;

static CRLF: &[u8; 2] = b"\r\n";

/// Upper bound on nested arrays/maps. The wire format itself imposes no
/// limit, but unbounded recursion on adversarial input would exhaust the
/// stack before it exhausts the buffer.
const MAX_PARSE_DEPTH: usize = 64;

/// Upper bound on declared array/map element counts. The count prefix
/// arrives before any element bytes, so it must never size an allocation
/// or a read loop on its own.
const MAX_FRAME_COUNT: usize = 1024 * 1024;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("not enough data is available to parse an entire frame")]
    Incomplete,
    #[error("unknown command/type marker: {0:#04x}")]
    UnknownMarker(u8),
    #[error("protocol error; {0}")]
    Protocol(String),
}

/// One wire value. Every frame read off a connection is exactly one of
/// these cases; `Null` is the `$-1` absent-value sentinel.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    Null,
    Array(Vec<Frame>),
    Map(Vec<(Frame, Frame)>),
}

impl Frame {
    /// Parse one complete frame from the cursor. `Error::Incomplete` means
    /// more data must be buffered before a frame boundary is reachable; a
    /// partially decoded composite is never returned.
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Self, Error> {
        Self::parse_at(src, 0)
    }

    fn parse_at(src: &mut Cursor<&[u8]>, depth: usize) -> Result<Self, Error> {
        if depth > MAX_PARSE_DEPTH {
            return Err(Error::Protocol("frame nesting too deep".to_string()));
        }

        // The first byte of a frame always identifies its type; the
        // remaining bytes are the type's contents.
        let first_byte = get_byte(src)?;
        let data_type = DataType::try_from(first_byte)?;

        match data_type {
            DataType::SimpleString => {
                let bytes = get_line(src)?.to_vec();
                let string = String::from_utf8(bytes)?;
                Ok(Frame::Simple(string))
            }
            DataType::SimpleError => {
                let bytes = get_line(src)?.to_vec();
                let string = String::from_utf8(bytes)?;
                Ok(Frame::Error(string))
            }
            DataType::Integer => {
                let integer = parse_decimal::<i64>(get_line(src)?)?;
                Ok(Frame::Integer(integer))
            }
            // $<length>\r\n<data>\r\n
            DataType::BulkString => {
                let length = parse_decimal::<i64>(get_line(src)?)?;

                if length == -1 {
                    return Ok(Frame::Null);
                }
                if length < 0 {
                    return Err(Error::Protocol(format!(
                        "invalid bulk string length {length}"
                    )));
                }

                // The payload is read by length, not by scanning for CRLF,
                // so it may itself contain CRLF bytes.
                let length = length as usize;
                if src.remaining() < length + CRLF.len() {
                    return Err(Error::Incomplete);
                }

                let start = src.position() as usize;
                let data = Bytes::copy_from_slice(&src.get_ref()[start..start + length]);
                src.advance(length);

                let terminator = [get_byte(src)?, get_byte(src)?];
                if terminator != *CRLF {
                    return Err(Error::Protocol(
                        "bulk string missing CRLF terminator".to_string(),
                    ));
                }

                Ok(Frame::Bulk(data))
            }
            // *<number-of-elements>\r\n<element-1>...<element-n>
            DataType::Array => {
                let length = parse_decimal::<i64>(get_line(src)?)?;

                if length < 0 {
                    return Err(Error::Protocol(format!("invalid array length {length}")));
                }
                if length as usize > MAX_FRAME_COUNT {
                    return Err(Error::Protocol(format!(
                        "array length {length} exceeds limit"
                    )));
                }

                let mut frames = Vec::with_capacity(length as usize);
                for _ in 0..length {
                    frames.push(Self::parse_at(src, depth + 1)?);
                }

                Ok(Frame::Array(frames))
            }
            // %<number-of-pairs>\r\n<key-1><value-1>...<key-n><value-n>
            DataType::Map => {
                let length = parse_decimal::<i64>(get_line(src)?)?;

                if length < 0 {
                    return Err(Error::Protocol(format!("invalid map length {length}")));
                }
                if length as usize > MAX_FRAME_COUNT {
                    return Err(Error::Protocol(format!("map length {length} exceeds limit")));
                }

                let mut pairs = Vec::with_capacity(length as usize);
                for _ in 0..length {
                    let key = Self::parse_at(src, depth + 1)?;
                    let value = Self::parse_at(src, depth + 1)?;
                    pairs.push((key, value));
                }

                Ok(Frame::Map(pairs))
            }
        }
    }

    /// Serialize the frame into its wire form. The match is exhaustive over
    /// the closed enum, so there is no "unrecognized type" path at runtime.
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Frame::Simple(s) => {
                let mut bytes = Vec::with_capacity(1 + s.len() + CRLF.len());
                bytes.push(u8::from(DataType::SimpleString));
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Error(s) => {
                let mut bytes = Vec::with_capacity(1 + s.len() + CRLF.len());
                bytes.push(u8::from(DataType::SimpleError));
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Integer(i) => {
                let digits = i.to_string();
                let mut bytes = Vec::with_capacity(1 + digits.len() + CRLF.len());
                bytes.push(u8::from(DataType::Integer));
                bytes.extend_from_slice(digits.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Bulk(data) => {
                let length = data.len().to_string();
                let mut bytes =
                    Vec::with_capacity(1 + length.len() + CRLF.len() + data.len() + CRLF.len());
                bytes.push(u8::from(DataType::BulkString));
                bytes.extend_from_slice(length.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes.extend_from_slice(data);
                bytes.extend_from_slice(CRLF);
                bytes
            }
            // The absent value is the length -1 bulk string.
            Frame::Null => b"$-1\r\n".to_vec(),
            Frame::Array(items) => {
                let length = items.len().to_string();
                let mut bytes = Vec::with_capacity(1 + length.len() + CRLF.len());
                bytes.push(u8::from(DataType::Array));
                bytes.extend_from_slice(length.as_bytes());
                bytes.extend_from_slice(CRLF);
                for item in items {
                    bytes.extend(item.serialize());
                }
                bytes
            }
            Frame::Map(pairs) => {
                let length = pairs.len().to_string();
                let mut bytes = Vec::with_capacity(1 + length.len() + CRLF.len());
                bytes.push(u8::from(DataType::Map));
                bytes.extend_from_slice(length.as_bytes());
                bytes.extend_from_slice(CRLF);
                for (key, value) in pairs {
                    bytes.extend(key.serialize());
                    bytes.extend(value.serialize());
                }
                bytes
            }
        }
    }
}

// Human-oriented rendering, used by the interactive prompt.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "{}", s),
            Frame::Error(s) => write!(f, "(error) {}", s),
            Frame::Integer(i) => write!(f, "(integer) {}", i),
            Frame::Bulk(bytes) => write!(f, "\"{}\"", String::from_utf8_lossy(bytes)),
            Frame::Null => write!(f, "(nil)"),
            Frame::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {}", i + 1, item)?;
                }
                Ok(())
            }
            Frame::Map(pairs) => {
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{} => {}", key, value)?;
                }
                Ok(())
            }
        }
    }
}

fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let end = src.get_ref().len();

    let line_end = src.get_ref()[start..end]
        .windows(CRLF.len())
        .position(|window| window == CRLF)
        .map(|index| start + index)
        .ok_or(Error::Incomplete)?;

    src.set_position((line_end + CRLF.len()) as u64);

    Ok(&src.get_ref()[start..line_end])
}

fn get_byte(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }
    Ok(src.get_u8())
}

fn parse_decimal<T: str::FromStr>(line: &[u8]) -> Result<T, Error> {
    str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            Error::Protocol(format!(
                "invalid decimal line {:?}",
                String::from_utf8_lossy(line)
            ))
        })
}

/// The closed marker table. Exactly these six bytes begin a frame; any
/// other first byte is a protocol error.
#[derive(Debug)]
enum DataType {
    SimpleString, // '+'
    SimpleError,  // '-'
    Integer,      // ':'
    BulkString,   // '$'
    Array,        // '*'
    Map,          // '%'
}

impl TryFrom<u8> for DataType {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            b'+' => Ok(Self::SimpleString),
            b'-' => Ok(Self::SimpleError),
            b':' => Ok(Self::Integer),
            b'$' => Ok(Self::BulkString),
            b'*' => Ok(Self::Array),
            b'%' => Ok(Self::Map),
            _ => Err(Error::UnknownMarker(byte)),
        }
    }
}

impl From<DataType> for u8 {
    fn from(value: DataType) -> Self {
        match value {
            DataType::SimpleString => b'+',
            DataType::SimpleError => b'-',
            DataType::Integer => b':',
            DataType::BulkString => b'$',
            DataType::Array => b'*',
            DataType::Map => b'%',
        }
    }
}

impl From<FromUtf8Error> for Error {
    fn from(_src: FromUtf8Error) -> Error {
        Error::Protocol("invalid UTF-8 in frame".to_string())
    }
}
