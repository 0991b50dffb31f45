use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{parse_i64, reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::KeyType;

/// Elements of the list at `key` with index in the inclusive normalized
/// range. A negative start counts as its absolute value; a negative end is
/// size-relative.
#[derive(Debug, PartialEq)]
pub struct Lrange {
    pub key: Bytes,
    pub start: Bytes,
    pub end: Bytes,
}

impl Executable for Lrange {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let store = server.store.lock();
        let db = store.db(session.db_index);

        match db.key_type(&self.key) {
            Some(KeyType::String) | Some(KeyType::Set) => return Ok(reply::wrong_type()),
            None => return Ok(Frame::NullArray),
            Some(KeyType::List) => {}
        }

        let (Some(start), Some(end)) = (parse_i64(&self.start), parse_i64(&self.end)) else {
            return Ok(reply::not_an_integer());
        };

        let elements = db.lrange(&self.key, start, end);
        let reply = if elements.is_empty() {
            Frame::NullArray
        } else {
            Frame::Array(elements.into_iter().map(Frame::Bulk).collect())
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for Lrange {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 3 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        let start = parser.next_bytes()?;
        let end = parser.next_bytes()?;
        Ok(Self { key, start, end })
    }
}
