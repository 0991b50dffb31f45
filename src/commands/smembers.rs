use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// Byte-sorted members of the set at `key`; the empty list when the key
/// holds no set.
#[derive(Debug, PartialEq)]
pub struct Smembers {
    pub key: Bytes,
}

impl Executable for Smembers {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let store = server.store.lock();
        let reply = match store.db(session.db_index).smembers(&self.key) {
            Some(members) => Frame::Array(members.into_iter().map(Frame::Bulk).collect()),
            None => Frame::NullArray,
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for Smembers {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 1 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        Ok(Self { key })
    }
}
