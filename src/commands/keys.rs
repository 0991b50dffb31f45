use std::sync::Arc;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// Byte-sorted keys of the selected database matching a shell glob
/// (`*` any, `?` one, `[class]`).
#[derive(Debug, PartialEq)]
pub struct Keys {
    pub pattern: String,
}

impl Executable for Keys {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let store = server.store.lock();
        let db = store.db(session.db_index);

        let reply = match db.keys_matching(&self.pattern) {
            Err(_) => Frame::Error(format!("ERR Invalid Glob Pattern '{}'", self.pattern)),
            Ok(keys) if keys.is_empty() => Frame::NullArray,
            Ok(keys) => Frame::Array(keys.into_iter().map(Frame::Bulk).collect()),
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for Keys {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 1 {
            return Err(parser.wrong_arity());
        }
        let pattern = parser.next_string()?;
        Ok(Self { pattern })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use bytes::Bytes;

    use super::*;
    use crate::commands::Command;

    #[tokio::test]
    async fn matching_keys_are_sorted() {
        let server = Arc::new(Shared::new(PathBuf::from("unused.db")));
        let mut session = Session { id: 0, db_index: 0 };

        {
            let mut store = server.store.lock();
            let db = store.db_mut(0);
            db.set(Bytes::from("b"), Bytes::from("2"));
            db.set(Bytes::from("a"), Bytes::from("1"));
        }

        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("KEYS")),
            Frame::Bulk(Bytes::from("*")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        let result = cmd.exec(&server, &mut session).unwrap();

        assert_eq!(
            result,
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("a")),
                Frame::Bulk(Bytes::from("b")),
            ])
        );
    }

    #[tokio::test]
    async fn empty_result_is_a_null_array() {
        let server = Arc::new(Shared::new(PathBuf::from("unused.db")));
        let mut session = Session { id: 0, db_index: 0 };

        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("KEYS")),
            Frame::Bulk(Bytes::from("*")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(cmd.exec(&server, &mut session).unwrap(), Frame::NullArray);
    }

    #[tokio::test]
    async fn invalid_pattern_is_an_error() {
        let server = Arc::new(Shared::new(PathBuf::from("unused.db")));
        let mut session = Session { id: 0, db_index: 0 };

        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("KEYS")),
            Frame::Bulk(Bytes::from("[")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(
            cmd.exec(&server, &mut session).unwrap(),
            Frame::Error("ERR Invalid Glob Pattern '['".to_string())
        );
    }
}
