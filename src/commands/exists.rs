use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// 1 when the key is present in the type index, 0 otherwise.
#[derive(Debug, PartialEq)]
pub struct Exists {
    pub key: Bytes,
}

impl Executable for Exists {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let store = server.store.lock();
        let present = store.db(session.db_index).key_type(&self.key).is_some();
        Ok(Frame::Integer(present as i64))
    }
}

impl TryFrom<&mut CommandParser> for Exists {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 1 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        Ok(Self { key })
    }
}
