use std::sync::Arc;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// An arbitrary key of the selected database; null bulk when it is empty.
#[derive(Debug, PartialEq)]
pub struct RandomKey;

impl Executable for RandomKey {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let store = server.store.lock();
        let reply = match store.db(session.db_index).random_key() {
            Some(key) => Frame::Bulk(key),
            None => Frame::Null,
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for RandomKey {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 0 {
            return Err(parser.wrong_arity());
        }
        Ok(Self)
    }
}
