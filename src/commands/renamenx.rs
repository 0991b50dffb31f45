use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// Rename that refuses to overwrite. Integer reply: 1 renamed, 0 if `dst`
/// exists, -1 if `src` is missing, -3 if the names are equal.
#[derive(Debug, PartialEq)]
pub struct RenameNx {
    pub src: Bytes,
    pub dst: Bytes,
}

impl Executable for RenameNx {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        if self.src == self.dst {
            return Ok(Frame::Integer(-3));
        }

        let mut store = server.store.lock();
        let db = store.db_mut(session.db_index);

        if db.key_type(&self.dst).is_some() {
            return Ok(Frame::Integer(0));
        }
        if db.key_type(&self.src).is_none() {
            return Ok(Frame::Integer(-1));
        }

        db.rename(&self.src, self.dst);
        Ok(Frame::Integer(1))
    }
}

impl TryFrom<&mut CommandParser> for RenameNx {
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
