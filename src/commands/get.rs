use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::KeyType;

/// Bulk reply of the string at `key`; null bulk when absent, wrong-type
/// when the key holds a list or set.
#[derive(Debug, PartialEq)]
pub struct Get {
    pub key: Bytes,
}

impl Executable for Get {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let store = server.store.lock();
        let db = store.db(session.db_index);

        let reply = match db.key_type(&self.key) {
            Some(KeyType::List) | Some(KeyType::Set) => reply::wrong_type(),
            None => Frame::Null,
            Some(KeyType::String) => match db.get(&self.key) {
                Some(value) => Frame::Bulk(value.clone()),
                None => Frame::Null,
            },
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for Get {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 1 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        Ok(Self { key })
    }
}
