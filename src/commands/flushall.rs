use std::sync::Arc;

use crate::commands::executable::Executable;
use crate::commands::{reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// Replaces every database with an empty one.
#[derive(Debug, PartialEq)]
pub struct FlushAll;

impl Executable for FlushAll {
    fn exec(self, server: &Arc<Shared>, _session: &mut Session) -> crate::Result<Frame> {
        server.store.lock().flush_all();
        Ok(reply::ok())
    }
}

impl TryFrom<&mut CommandParser> for FlushAll {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
