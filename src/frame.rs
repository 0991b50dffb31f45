// https://redis.io/docs/reference/protocol-spec

use std::fmt;
use std::io::Cursor;
use std::str;

use bytes::{Buf, Bytes};
use thiserror::Error as ThisError;

static CRLF: &[u8; 2] = b"\r\n";

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("not enough data is available to parse an entire frame")]
    Incomplete,
    #[error("invalid frame data type: {0}")]
    InvalidDataType(u8),
    #[error("invalid frame format: {0}")]
    Malformed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    /// Null bulk string, `$-1\r\n`.
    Null,
    Array(Vec<Frame>),
    /// Null array, `*-1\r\n`. Doubles as the empty list/set reply.
    NullArray,
    /// A line written without a leading type byte, `<text>\r\n`. TYPE
    /// answers with this shape.
    Bare(String),
}

impl Frame {
    /// Parses a single frame out of `src`, leaving the cursor just past it.
    /// `Error::Incomplete` means more data has to arrive first; every other
    /// error means the peer sent something that is not RESP.
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Self, Error> {
        // The first byte in a RESP-serialized payload always identifies its
        // type. Subsequent bytes constitute the type's contents.
        match get_byte(src)? {
            b'+' => {
                let line = get_line(src)?.to_vec();
                Ok(Frame::Simple(string_from(line)?))
            }
            b'-' => {
                let line = get_line(src)?.to_vec();
                Ok(Frame::Error(string_from(line)?))
            }
            b':' => {
                let line = get_line(src)?;
                Ok(Frame::Integer(parse_decimal(line)?))
            }
            // $<length>\r\n<data>\r\n
            b'$' => {
                let length = parse_decimal(get_line(src)?)?;
                if length == -1 {
                    return Ok(Frame::Null);
                }
                if length < 0 {
                    return Err(Error::Malformed(format!("invalid bulk length {}", length)));
                }
                let data = get_data(src, length as usize)?;
                Ok(Frame::Bulk(data))
            }
            // *<number-of-elements>\r\n<element-1>...<element-n>
            b'*' => {
                let length = parse_decimal(get_line(src)?)?;
                if length == -1 {
                    return Ok(Frame::NullArray);
                }
                if length < 0 {
                    return Err(Error::Malformed(format!("invalid array length {}", length)));
                }
                let mut frames = Vec::new();
                for _ in 0..length {
                    frames.push(Frame::parse(src)?);
                }
                Ok(Frame::Array(frames))
            }
            byte => Err(Error::InvalidDataType(byte)),
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Frame::Simple(s) => {
                let mut bytes = Vec::with_capacity(1 + s.len() + CRLF.len());
                bytes.push(b'+');
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Error(s) => {
                let mut bytes = Vec::with_capacity(1 + s.len() + CRLF.len());
                bytes.push(b'-');
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Integer(i) => {
                let digits = i.to_string();
                let mut bytes = Vec::with_capacity(1 + digits.len() + CRLF.len());
                bytes.push(b':');
                bytes.extend_from_slice(digits.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Bulk(data) => {
                let digits = data.len().to_string();
                let mut bytes =
                    Vec::with_capacity(1 + digits.len() + CRLF.len() * 2 + data.len());
                bytes.push(b'$');
                bytes.extend_from_slice(digits.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes.extend_from_slice(data);
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Null => b"$-1\r\n".to_vec(),
            Frame::Array(frames) => {
                let digits = frames.len().to_string();
                let mut bytes = Vec::with_capacity(1 + digits.len() + CRLF.len());
                bytes.push(b'*');
                bytes.extend_from_slice(digits.as_bytes());
                bytes.extend_from_slice(CRLF);
                for frame in frames {
                    bytes.extend(frame.serialize());
                }
                bytes
            }
            Frame::NullArray => b"*-1\r\n".to_vec(),
            Frame::Bare(s) => {
                let mut bytes = Vec::with_capacity(s.len() + CRLF.len());
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
        }
    }
}

impl From<Frame> for Vec<u8> {
    fn from(frame: Frame) -> Self {
        frame.serialize()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "+{}", s),
            Frame::Error(s) => write!(f, "-{}", s),
            Frame::Integer(i) => write!(f, ":{}", i),
            Frame::Bulk(bytes) => write!(f, "${}", String::from_utf8_lossy(bytes)),
            Frame::Null => write!(f, "$-1"),
            Frame::Array(frames) => {
                write!(f, "*{}\r\n", frames.len())?;
                for frame in frames {
                    write!(f, "{}\r\n", frame)?;
                }
                Ok(())
            }
            Frame::NullArray => write!(f, "*-1"),
            Frame::Bare(s) => write!(f, "{}", s),
        }
    }
}

fn get_byte(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }
    Ok(src.get_u8())
}

/// Returns the bytes up to the next CRLF and advances the cursor past it.
fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let end = src.get_ref().len();

    let line_end = src.get_ref()[start..end]
        .windows(CRLF.len())
        .position(|window| window == CRLF)
        .ok_or(Error::Incomplete)
        .map(|index| start + index)?;

    src.set_position((line_end + CRLF.len()) as u64);

    Ok(&src.get_ref()[start..line_end])
}

/// Reads exactly `length` payload bytes plus the trailing CRLF. The payload
/// is opaque and may itself contain CR, LF or NUL.
fn get_data(src: &mut Cursor<&[u8]>, length: usize) -> Result<Bytes, Error> {
    let start = src.position() as usize;
    let total = src.get_ref().len();

    if total < start + length + CRLF.len() {
        return Err(Error::Incomplete);
    }
    if &src.get_ref()[start + length..start + length + CRLF.len()] != CRLF {
        return Err(Error::Malformed(
            "bulk string is not CRLF terminated".to_string(),
        ));
    }

    let data = Bytes::copy_from_slice(&src.get_ref()[start..start + length]);
    src.set_position((start + length + CRLF.len()) as u64);

    Ok(data)
}

fn parse_decimal(line: &[u8]) -> Result<i64, Error> {
    str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| {
            Error::Malformed(format!(
                "expected a decimal line, got {:?}",
                String::from_utf8_lossy(line)
            ))
        })
}

fn string_from(bytes: Vec<u8>) -> Result<String, Error> {
    String::from_utf8(bytes).map_err(|_| Error::Malformed("invalid UTF-8 line".to_string()))
}
