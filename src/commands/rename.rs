use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// Moves the entry at `src` to `dst`, overwriting `dst` regardless of its
/// type. A missing `src` is a no-op that still replies OK.
#[derive(Debug, PartialEq)]
pub struct Rename {
    pub src: Bytes,
    pub dst: Bytes,
}

impl Executable for Rename {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        if self.src == self.dst {
            return Ok(Frame::Error("Keys Must be Different".to_string()));
        }
        let mut store = server.store.lock();
        store.db_mut(session.db_index).rename(&self.src, self.dst);
        Ok(reply::ok())
    }
}

impl TryFrom<&mut CommandParser> for Rename {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 2 {
            return Err(parser.wrong_arity());
        }
        let src = parser.next_bytes()?;
        let dst = parser.next_bytes()?;
        Ok(Self { src, dst })
    }
}
