use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{parse_i64, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::NUM_DATABASES;

/// Moves a key from the selected database into another one. Integer reply:
/// 1 moved, 0 if absent from the source or present in the target, -3 when
/// the target is the selected database, -4 when the index does not parse or
/// is out of range.
#[derive(Debug, PartialEq)]
pub struct Move {
    pub key: Bytes,
    pub db: Bytes,
}

impl Executable for Move {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let Some(target) = parse_i64(&self.db) else {
            return Ok(Frame::Integer(-4));
        };
        if target == session.db_index as i64 {
            return Ok(Frame::Integer(-3));
        }
        if !(0..NUM_DATABASES as i64).contains(&target) {
            return Ok(Frame::Integer(-4));
        }

        let mut store = server.store.lock();
        let moved = store.move_key(session.db_index, target as usize, &self.key);
        Ok(Frame::Integer(moved as i64))
    }
}

impl TryFrom<&mut CommandParser> for Move {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 2 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        let db = parser.next_bytes()?;
        Ok(Self { key, db })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::commands::Command;
    use crate::store::KeyType;

    fn move_cmd(key: &str, db: &str) -> Command {
        Command::try_from(Frame::Array(vec![
            Frame::Bulk(Bytes::from("MOVE")),
            Frame::Bulk(Bytes::copy_from_slice(key.as_bytes())),
            Frame::Bulk(Bytes::copy_from_slice(db.as_bytes())),
        ]))
        .unwrap()
    }

    #[tokio::test]
    async fn moves_between_databases() {
        let server = Arc::new(Shared::new(PathBuf::from("unused.db")));
        let mut session = Session { id: 0, db_index: 0 };

        server
            .store
            .lock()
            .db_mut(0)
            .sadd(Bytes::from("k"), Bytes::from("1"));

        let result = move_cmd("k", "1").exec(&server, &mut session).unwrap();
        assert_eq!(result, Frame::Integer(1));

        let store = server.store.lock();
        assert_eq!(store.db(0).key_type(b"k"), None);
        assert_eq!(store.db(1).key_type(b"k"), Some(KeyType::Set));
    }

    #[tokio::test]
    async fn sentinel_replies() {
        let server = Arc::new(Shared::new(PathBuf::from("unused.db")));
        let mut session = Session { id: 0, db_index: 0 };

        // target is the selected database
        let result = move_cmd("k", "0").exec(&server, &mut session).unwrap();
        assert_eq!(result, Frame::Integer(-3));

        // out of range / not an integer
        for db in ["10", "-1", "abc"] {
            let result = move_cmd("k", db).exec(&server, &mut session).unwrap();
            assert_eq!(result, Frame::Integer(-4));
        }

        // missing key
        let result = move_cmd("k", "1").exec(&server, &mut session).unwrap();
        assert_eq!(result, Frame::Integer(0));
    }
}
