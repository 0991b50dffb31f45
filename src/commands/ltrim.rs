use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{parse_i64, reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::KeyType;

/// Keeps only the elements in the normalized inclusive range. An inverted
/// range deletes the key and replies the empty list.
#[derive(Debug, PartialEq)]
pub struct Ltrim {
    pub key: Bytes,
    pub start: Bytes,
    pub end: Bytes,
}

impl Executable for Ltrim {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let mut store = server.store.lock();
        let db = store.db_mut(session.db_index);

        match db.key_type(&self.key) {
            Some(KeyType::String) | Some(KeyType::Set) => return Ok(reply::wrong_type()),
            None => return Ok(Frame::NullArray),
            Some(KeyType::List) => {}
        }

        let (Some(start), Some(end)) = (parse_i64(&self.start), parse_i64(&self.end)) else {
            return Ok(reply::not_an_integer());
        };

        let reply = if db.ltrim(&self.key, start, end) {
            reply::ok()
        } else {
            Frame::NullArray
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for Ltrim {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 3 {
            return Err(parser.wrong_arity());
        }
        let key = parser.next_bytes()?;
        let start = parser.next_bytes()?;
        let end = parser.next_bytes()?;
        Ok(Self { key, start, end })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::commands::Command;

    fn ltrim(key: &str, start: &str, end: &str) -> Command {
        Command::try_from(Frame::Array(vec![
            Frame::Bulk(Bytes::from("LTRIM")),
            Frame::Bulk(Bytes::copy_from_slice(key.as_bytes())),
            Frame::Bulk(Bytes::copy_from_slice(start.as_bytes())),
            Frame::Bulk(Bytes::copy_from_slice(end.as_bytes())),
        ]))
        .unwrap()
    }

    #[tokio::test]
    async fn inverted_range_deletes_the_key() {
        let server = Arc::new(Shared::new(PathBuf::from("unused.db")));
        let mut session = Session { id: 0, db_index: 0 };

        {
            let mut store = server.store.lock();
            let db = store.db_mut(0);
            db.rpush(Bytes::from("k"), Bytes::from("a"));
            db.rpush(Bytes::from("k"), Bytes::from("b"));
        }

        let result = ltrim("k", "100", "0").exec(&server, &mut session).unwrap();

        assert_eq!(result, Frame::NullArray);
        assert_eq!(server.store.lock().db(0).key_type(b"k"), None);
    }

    #[tokio::test]
    async fn in_range_trim_replies_ok() {
        let server = Arc::new(Shared::new(PathBuf::from("unused.db")));
        let mut session = Session { id: 0, db_index: 0 };

        {
            let mut store = server.store.lock();
            let db = store.db_mut(0);
            for element in ["a", "b", "c"] {
                db.rpush(Bytes::from("k"), Bytes::copy_from_slice(element.as_bytes()));
            }
        }

        let result = ltrim("k", "0", "1").exec(&server, &mut session).unwrap();

        assert_eq!(result, Frame::Simple("OK".to_string()));
        assert_eq!(
            server.store.lock().db(0).lrange(b"k", 0, -1),
            vec![Bytes::from("a"), Bytes::from("b")]
        );
    }
}
