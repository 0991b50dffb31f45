use std::sync::Arc;

use crate::commands::executable::Executable;
use crate::commands::{reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// Synchronous snapshot of all databases.
#[derive(Debug, PartialEq)]
pub struct Save;

impl Executable for Save {
    fn exec(self, server: &Arc<Shared>, _session: &mut Session) -> crate::Result<Frame> {
        server.save()?;
        Ok(reply::ok())
    }
}

impl TryFrom<&mut CommandParser> for Save {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 0 {
            return Err(parser.wrong_arity());
        }
        Ok(Self)
    }
}
