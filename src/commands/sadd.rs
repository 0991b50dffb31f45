use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::KeyType;

/// Adds a member to the set at `key`, creating the set if absent. Integer
/// reply: 1 added, 0 already a member, -2 when the key holds another type.
#[derive(Debug, PartialEq)]
pub struct Sadd {
    pub key: Bytes,
    pub member: Bytes,
}

impl Executable for Sadd {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let mut store = server.store.lock();
        let db = store.db_mut(session.db_index);

        let reply = match db.key_type(&self.key) {
            None | Some(KeyType::Set) => Frame::Integer(db.sadd(self.key, self.member) as i64),
            Some(_) => Frame::Integer(-2),
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for Sadd {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 2 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        let member = parser.next_bytes()?;
        Ok(Self { key, member })
    }
}
