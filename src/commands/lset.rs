use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{parse_i64, reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::KeyType;

/// Replaces the element at `index`. A missing key replies no-such-key; an
/// out-of-range index replies the integer error.
#[derive(Debug, PartialEq)]
pub struct Lset {
    pub key: Bytes,
    pub index: Bytes,
    pub value: Bytes,
}

impl Executable for Lset {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let mut store = server.store.lock();
        let db = store.db_mut(session.db_index);

        match db.key_type(&self.key) {
            Some(KeyType::String) | Some(KeyType::Set) => return Ok(reply::wrong_type()),
            None => return Ok(reply::no_such_key()),
            Some(KeyType::List) => {}
        }

        let Some(index) = parse_i64(&self.index) else {
            return Ok(reply::not_an_integer());
        };

        let reply = if db.lset(&self.key, index, self.value) {
            reply::ok()
        } else {
            reply::not_an_integer()
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for Lset {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 3 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        let index = parser.next_bytes()?;
        let value = parser.next_bytes()?;
        Ok(Self { key, index, value })
    }
}
