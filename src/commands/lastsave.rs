use std::sync::Arc;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// Unix seconds of the last successful snapshot, 0 if none has completed.
#[derive(Debug, PartialEq)]
pub struct LastSave;

impl Executable for LastSave {
    fn exec(self, server: &Arc<Shared>, _session: &mut Session) -> crate::Result<Frame> {
        Ok(Frame::Integer(server.stats.last_save()))
    }
}

impl TryFrom<&mut CommandParser> for LastSave {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
