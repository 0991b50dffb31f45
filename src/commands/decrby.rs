use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{parse_i64, reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::KeyType;

/// Decrements the integer stored at `key` by `delta`. A missing key is
/// created holding the negated delta.
#[derive(Debug, PartialEq)]
pub struct DecrBy {
    pub key: Bytes,
    pub delta: Bytes,
}

impl Executable for DecrBy {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let mut store = server.store.lock();
        let db = store.db_mut(session.db_index);

        if matches!(
            db.key_type(&self.key),
            Some(KeyType::List) | Some(KeyType::Set)
        ) {
            return Ok(reply::wrong_type());
        }

        let Some(delta) = parse_i64(&self.delta).and_then(i64::checked_neg) else {
            return Ok(reply::not_an_integer());
        };

        let reply = match db.increment(&self.key, delta, delta) {
            Some(value) => Frame::Integer(value),
            None => reply::not_an_integer(),
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for DecrBy {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 2 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        let delta = parser.next_bytes()?;
        Ok(Self { key, delta })
    }
}
