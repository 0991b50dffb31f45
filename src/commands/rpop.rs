use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::KeyType;

/// Pops the tail of the list at `key`; the key is deleted when its last
/// element goes. Null bulk when the key is absent.
#[derive(Debug, PartialEq)]
pub struct Rpop {
    pub key: Bytes,
}

impl Executable for Rpop {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let mut store = server.store.lock();
        let db = store.db_mut(session.db_index);

        match db.key_type(&self.key) {
            Some(KeyType::String) | Some(KeyType::Set) => return Ok(reply::wrong_type()),
            None => return Ok(Frame::Null),
            Some(KeyType::List) => {}
        }

        let reply = match db.rpop(&self.key) {
            Some(element) => Frame::Bulk(element),
            None => Frame::Null,
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for Rpop {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 1 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        Ok(Self { key })
    }
}
