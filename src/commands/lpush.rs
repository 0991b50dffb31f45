use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::KeyType;

/// Prepends a value to the list at `key`, creating the list if absent.
/// Integer reply of the new length.
#[derive(Debug, PartialEq)]
pub struct Lpush {
    pub key: Bytes,
    pub value: Bytes,
}

impl Executable for Lpush {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let mut store = server.store.lock();
        let db = store.db_mut(session.db_index);

        let reply = match db.key_type(&self.key) {
            None | Some(KeyType::List) => {
                Frame::Integer(db.lpush(self.key, self.value) as i64)
            }
            Some(_) => reply::wrong_type(),
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for Lpush {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 2 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        let value = parser.next_bytes()?;
        Ok(Self { key, value })
    }
}
