use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{parse_i64, reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::NUM_DATABASES;

/// Switches this connection to the database with the given zero-based
/// index. Non-integer or out-of-range indexes reply the integer error.
#[derive(Debug, PartialEq)]
pub struct Select {
    pub index: Bytes,
}

impl Executable for Select {
    fn exec(self, _server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let Some(index) = parse_i64(&self.index) else {
            return Ok(reply::not_an_integer());
        };
        if !(0..NUM_DATABASES as i64).contains(&index) {
            return Ok(reply::not_an_integer());
        }
        session.db_index = index as usize;
        Ok(reply::ok())
    }
}

impl TryFrom<&mut CommandParser> for Select {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 1 {
            return Err(parser.wrong_arity());
        }
        let index = parser.next_bytes()?;
        Ok(Self { index })
    }
}
