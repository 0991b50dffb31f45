use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::KeyType;

/// Cardinality of the set at `key`; 0 when absent, -2 when the key holds
/// another type.
#[derive(Debug, PartialEq)]
pub struct Scard {
    pub key: Bytes,
}

impl Executable for Scard {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let store = server.store.lock();
        let db = store.db(session.db_index);

        let reply = match db.key_type(&self.key) {
            None | Some(KeyType::Set) => Frame::Integer(db.scard(&self.key) as i64),
            Some(_) => Frame::Integer(-2),
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for Scard {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 1 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        Ok(Self { key })
    }
}
