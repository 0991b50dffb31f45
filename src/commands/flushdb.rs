use std::sync::Arc;

use crate::commands::executable::Executable;
use crate::commands::{reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// Replaces the selected database with an empty one.
#[derive(Debug, PartialEq)]
pub struct FlushDb;

impl Executable for FlushDb {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        server.store.lock().flush_db(session.db_index);
        Ok(reply::ok())
    }
}

impl TryFrom<&mut CommandParser> for FlushDb {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
