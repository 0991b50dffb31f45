use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// Deletes a key of any type. 1 when it was present, 0 otherwise.
#[derive(Debug, PartialEq)]
pub struct Del {
    pub key: Bytes,
}

impl Executable for Del {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let mut store = server.store.lock();
        let removed = store.db_mut(session.db_index).remove(&self.key);
        Ok(Frame::Integer(removed as i64))
    }
}

impl TryFrom<&mut CommandParser> for Del {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 1 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        Ok(Self { key })
    }
}
