use std::sync::Arc;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// Replies PONG, or echoes the single optional argument.
#[derive(Debug, PartialEq)]
pub struct Ping {
    pub message: Option<String>,
}

impl Executable for Ping {
    fn exec(self, _server: &Arc<Shared>, _session: &mut Session) -> crate::Result<Frame> {
        let reply = match self.message {
            Some(message) => Frame::Simple(message),
            None => Frame::Simple("PONG".to_string()),
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for Ping {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        match parser.remaining() {
            0 => Ok(Self { message: None }),
            1 => Ok(Self {
                message: Some(parser.next_string()?),
            }),
            _ => Err(parser.wrong_arity()),
        }
    }
}
