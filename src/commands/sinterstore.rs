use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};
use crate::store::KeyType;

/// Computes the intersection of the named sets and stores it at
/// `destination`, replacing any prior set there. A destination holding a
/// string or list is a wrong-type error. An empty intersection leaves the
/// destination absent.
#[derive(Debug, PartialEq)]
pub struct SinterStore {
    pub destination: Bytes,
    pub keys: Vec<Bytes>,
}

impl Executable for SinterStore {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        let mut store = server.store.lock();
        let db = store.db_mut(session.db_index);

        if matches!(
            db.key_type(&self.destination),
            Some(KeyType::String) | Some(KeyType::List)
        ) {
            return Ok(reply::wrong_type());
        }

        for key in &self.keys {
            match db.key_type(key) {
                None => return Ok(Frame::NullArray),
                Some(KeyType::Set) => {}
                Some(_) => return Ok(reply::wrong_type()),
            }
        }

        let members = db.sinter(&self.keys);
        db.store_set(self.destination, members);
        Ok(reply::ok())
    }
}

impl TryFrom<&mut CommandParser> for SinterStore {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() < 2 {
            return Err(parser.wrong_arity());
        }
        let destination = parser.next_bytes()?;
        let mut keys = Vec::with_capacity(parser.remaining());
        while parser.remaining() > 0 {
            keys.push(parser.next_bytes()?);
        }
        Ok(Self { destination, keys })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::commands::Command;

    fn sinterstore(args: &[&str]) -> Command {
        let mut frames = vec![Frame::Bulk(Bytes::from("SINTERSTORE"))];
        frames.extend(
            args.iter()
                .map(|arg| Frame::Bulk(Bytes::copy_from_slice(arg.as_bytes()))),
        );
        Command::try_from(Frame::Array(frames)).unwrap()
    }

    #[tokio::test]
    async fn stores_the_intersection() {
        let server = Arc::new(Shared::new(PathBuf::from("unused.db")));
        let mut session = Session { id: 0, db_index: 0 };

        {
            let mut store = server.store.lock();
            let db = store.db_mut(0);
            for member in ["a", "b"] {
                db.sadd(Bytes::from("s1"), Bytes::copy_from_slice(member.as_bytes()));
            }
            for member in ["b", "c"] {
                db.sadd(Bytes::from("s2"), Bytes::copy_from_slice(member.as_bytes()));
            }
        }

        let result = sinterstore(&["dst", "s1", "s2"])
            .exec(&server, &mut session)
            .unwrap();

        assert_eq!(result, Frame::Simple("OK".to_string()));
        assert_eq!(
            server.store.lock().db(0).smembers(b"dst"),
            Some(vec![Bytes::from("b")])
        );
    }

    #[tokio::test]
    async fn empty_intersection_leaves_destination_absent() {
        let server = Arc::new(Shared::new(PathBuf::from("unused.db")));
        let mut session = Session { id: 0, db_index: 0 };

        {
            let mut store = server.store.lock();
            let db = store.db_mut(0);
            db.sadd(Bytes::from("s1"), Bytes::from("a"));
            db.sadd(Bytes::from("s2"), Bytes::from("z"));
        }

        let result = sinterstore(&["dst", "s1", "s2"])
            .exec(&server, &mut session)
            .unwrap();

        assert_eq!(result, Frame::Simple("OK".to_string()));
        assert_eq!(server.store.lock().db(0).key_type(b"dst"), None);
    }

    #[tokio::test]
    async fn string_destination_is_a_wrong_type() {
        let server = Arc::new(Shared::new(PathBuf::from("unused.db")));
        let mut session = Session { id: 0, db_index: 0 };

        {
            let mut store = server.store.lock();
            let db = store.db_mut(0);
            db.set(Bytes::from("dst"), Bytes::from("v"));
            db.sadd(Bytes::from("s1"), Bytes::from("a"));
        }

        let result = sinterstore(&["dst", "s1"])
            .exec(&server, &mut session)
            .unwrap();

        assert_eq!(
            result,
            Frame::Error(
                "WRONGTYPE Operation against a key holding the wrong kind of value".to_string()
            )
        );
    }
}
