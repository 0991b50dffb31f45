use std::sync::Arc;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// Number of keys in the selected database.
#[derive(Debug, PartialEq)]
pub struct DbSize;

impl Executable for DbSize {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let store = server.store.lock();
        Ok(Frame::Integer(store.db(session.db_index).len() as i64))
    }
}

impl TryFrom<&mut CommandParser> for DbSize {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 0 {
            return Err(parser.wrong_arity());
        }
        Ok(Self)
    }
}
