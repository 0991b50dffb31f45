use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// Stores the value only when the key is absent from the type index.
/// 1 when the write happened, 0 when the key already exists under any type.
#[derive(Debug, PartialEq)]
pub struct SetNx {
    pub key: Bytes,
    pub value: Bytes,
}

impl Executable for SetNx {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let mut store = server.store.lock();
        let db = store.db_mut(session.db_index);

        if db.key_type(&self.key).is_some() {
            return Ok(Frame::Integer(0));
        }
        db.set(self.key, self.value);
        Ok(Frame::Integer(1))
    }
}

impl TryFrom<&mut CommandParser> for SetNx {
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
