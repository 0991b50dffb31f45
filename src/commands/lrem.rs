use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{parse_i64, reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::KeyType;

/// Removes elements equal to `value`: from the head up to `count` when
/// positive, from the tail up to `|count|` when negative, all when zero.
/// Integer reply of the number removed; -1 when the key is absent, -2 when
/// it holds the wrong type.
#[derive(Debug, PartialEq)]
pub struct Lrem {
    pub key: Bytes,
    pub count: Bytes,
    pub value: Bytes,
}

impl Executable for Lrem {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let mut store = server.store.lock();
        let db = store.db_mut(session.db_index);

        match db.key_type(&self.key) {
            Some(KeyType::String) | Some(KeyType::Set) => return Ok(Frame::Integer(-2)),
            None => return Ok(Frame::Integer(-1)),
            Some(KeyType::List) => {}
        }

        let Some(count) = parse_i64(&self.count) else {
            return Ok(reply::not_an_integer());
        };

        let removed = db.lrem(&self.key, count, &self.value);
        Ok(Frame::Integer(removed as i64))
    }
}

impl TryFrom<&mut CommandParser> for Lrem {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 3 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        let count = parser.next_bytes()?;
        let value = parser.next_bytes()?;
        Ok(Self { key, count, value })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::commands::Command;

    fn lrem(key: &str, count: &str, value: &str) -> Command {
        Command::try_from(Frame::Array(vec![
            Frame::Bulk(Bytes::from("LREM")),
            Frame::Bulk(Bytes::copy_from_slice(key.as_bytes())),
            Frame::Bulk(Bytes::copy_from_slice(count.as_bytes())),
            Frame::Bulk(Bytes::copy_from_slice(value.as_bytes())),
        ]))
        .unwrap()
    }

    #[tokio::test]
    async fn sentinels_for_missing_and_wrong_type() {
        let server = Arc::new(Shared::new(PathBuf::from("unused.db")));
        let mut session = Session { id: 0, db_index: 0 };

        let result = lrem("missing", "0", "v").exec(&server, &mut session).unwrap();
        assert_eq!(result, Frame::Integer(-1));

        server
            .store
            .lock()
            .db_mut(0)
            .set(Bytes::from("s"), Bytes::from("v"));

        let result = lrem("s", "0", "v").exec(&server, &mut session).unwrap();
        assert_eq!(result, Frame::Integer(-2));
    }

    #[tokio::test]
    async fn removes_matching_elements() {
        let server = Arc::new(Shared::new(PathBuf::from("unused.db")));
        let mut session = Session { id: 0, db_index: 0 };

        {
            let mut store = server.store.lock();
            let db = store.db_mut(0);
            for element in ["x", "y", "x"] {
                db.rpush(Bytes::from("k"), Bytes::copy_from_slice(element.as_bytes()));
            }
        }

        let result = lrem("k", "0", "x").exec(&server, &mut session).unwrap();
        assert_eq!(result, Frame::Integer(2));

        assert_eq!(
            server.store.lock().db(0).lrange(b"k", 0, -1),
            vec![Bytes::from("y")]
        );
    }
}
