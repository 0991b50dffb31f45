use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::KeyType;

/// Byte-sorted members present in every named set. Any absent key makes
/// the intersection the empty list; any non-set key is a wrong-type error.
#[derive(Debug, PartialEq)]
pub struct Sinter {
    pub keys: Vec<Bytes>,
}

impl Executable for Sinter {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let store = server.store.lock();
        let db = store.db(session.db_index);

        for key in &self.keys {
            match db.key_type(key) {
                None => return Ok(Frame::NullArray),
                Some(KeyType::Set) => {}
                Some(_) => return Ok(reply::wrong_type()),
            }
        }

        let members = db.sinter(&self.keys);
        let reply = if members.is_empty() {
            Frame::NullArray
        } else {
            Frame::Array(members.into_iter().map(Frame::Bulk).collect())
        };
        Ok(reply)
    }
}

impl TryFrom<&mut CommandParser> for Sinter {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() == 0 {
            return Err(parser.wrong_arity());
        }
        let mut keys = Vec::with_capacity(parser.remaining());
        while parser.remaining() > 0 {
            keys.push(parser.next_bytes()?);
        }
        Ok(Self { keys })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::commands::Command;

    fn sinter(keys: &[&str]) -> Command {
        let mut frames = vec![Frame::Bulk(Bytes::from("SINTER"))];
        frames.extend(
            keys.iter()
                .map(|key| Frame::Bulk(Bytes::copy_from_slice(key.as_bytes()))),
        );
        Command::try_from(Frame::Array(frames)).unwrap()
    }

    #[tokio::test]
    async fn intersects_and_sorts() {
        let server = Arc::new(Shared::new(PathBuf::from("unused.db")));
        let mut session = Session { id: 0, db_index: 0 };

        {
            let mut store = server.store.lock();
            let db = store.db_mut(0);
            for member in ["c", "a", "b"] {
                db.sadd(Bytes::from("s1"), Bytes::copy_from_slice(member.as_bytes()));
            }
            for member in ["b", "c", "z"] {
                db.sadd(Bytes::from("s2"), Bytes::copy_from_slice(member.as_bytes()));
            }
        }

        let result = sinter(&["s1", "s2"]).exec(&server, &mut session).unwrap();

        assert_eq!(
            result,
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("b")),
                Frame::Bulk(Bytes::from("c")),
            ])
        );
    }

    #[tokio::test]
    async fn absent_key_empties_the_intersection() {
        let server = Arc::new(Shared::new(PathBuf::from("unused.db")));
        let mut session = Session { id: 0, db_index: 0 };

        server
            .store
            .lock()
            .db_mut(0)
            .sadd(Bytes::from("s1"), Bytes::from("a"));

        let result = sinter(&["s1", "missing"])
            .exec(&server, &mut session)
            .unwrap();

        assert_eq!(result, Frame::NullArray);
    }

    #[tokio::test]
    async fn non_set_key_is_a_wrong_type() {
        let server = Arc::new(Shared::new(PathBuf::from("unused.db")));
        let mut session = Session { id: 0, db_index: 0 };

        {
            let mut store = server.store.lock();
            let db = store.db_mut(0);
            db.sadd(Bytes::from("s1"), Bytes::from("a"));
            db.set(Bytes::from("str"), Bytes::from("v"));
        }

        let result = sinter(&["s1", "str"]).exec(&server, &mut session).unwrap();

        assert_eq!(
            result,
            Frame::Error(
                "WRONGTYPE Operation against a key holding the wrong kind of value".to_string()
            )
        );
    }
}
