use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::KeyType;

/// Decrements the integer stored at `key` by one. A missing key is created
/// holding "-1", and -1 is the reply.
#[derive(Debug, PartialEq)]
pub struct Decr {
    pub key: Bytes,
}

impl Executable for Decr {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let mut store = server.store.lock();
        let db = store.db_mut(session.db_index);

        if matches!(
            db.key_type(&self.key),
            Some(KeyType::List) | Some(KeyType::Set)
        ) {
            return Ok(reply::wrong_type());
        }

        let reply = match db.increment(&self.key, -1, -1) {
            Some(value) => Frame::Integer(value),
            None => reply::not_an_integer(),
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for Decr {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 1 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        Ok(Self { key })
    }
}
