use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{parse_i64, reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::KeyType;

/// The element at `index`; negative indexes count from the tail. Null bulk
/// when the index is out of range or the key is absent.
#[derive(Debug, PartialEq)]
pub struct Lindex {
    pub key: Bytes,
    pub index: Bytes,
}

impl Executable for Lindex {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let store = server.store.lock();
        let db = store.db(session.db_index);

        match db.key_type(&self.key) {
            Some(KeyType::String) | Some(KeyType::Set) => return Ok(reply::wrong_type()),
            None => return Ok(Frame::Null),
            Some(KeyType::List) => {}
        }

        let Some(index) = parse_i64(&self.index) else {
            return Ok(reply::not_an_integer());
        };

        let reply = match db.lindex(&self.key, index) {
            Some(element) => Frame::Bulk(element),
            None => Frame::Null,
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for Lindex {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 2 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        let index = parser.next_bytes()?;
        Ok(Self { key, index })
    }
}
