pub mod executable;
pub mod reply;

pub mod bgsave;
pub mod dbsize;
pub mod decr;
pub mod decrby;
pub mod del;
pub mod exists;
pub mod flushall;
pub mod flushdb;
pub mod get;
pub mod incr;
pub mod incrby;
pub mod info;
pub mod keys;
pub mod lastsave;
pub mod lindex;
pub mod llen;
pub mod lpop;
pub mod lpush;
pub mod lrange;
pub mod lrem;
pub mod lset;
pub mod ltrim;
pub mod move_;
pub mod ping;
pub mod quit;
pub mod randomkey;
pub mod rename;
pub mod renamenx;
pub mod rpop;
pub mod rpush;
pub mod sadd;
pub mod save;
pub mod scard;
pub mod select;
pub mod set;
pub mod setnx;
pub mod shutdown;
pub mod sinter;
pub mod sinterstore;
pub mod sismember;
pub mod smembers;
pub mod srem;
pub mod type_;

use std::str;
use std::sync::Arc;
use std::vec;

use bytes::Bytes;
use thiserror::Error as ThisError;

use crate::commands::executable::Executable;
use crate::frame::Frame;
use crate::server::{Session, Shared};

use bgsave::BgSave;
use dbsize::DbSize;
use decr::Decr;
use decrby::DecrBy;
use del::Del;
use exists::Exists;
use flushall::FlushAll;
use flushdb::FlushDb;
use get::Get;
use incr::Incr;
use incrby::IncrBy;
use info::Info;
use keys::Keys;
use lastsave::LastSave;
use lindex::Lindex;
use llen::Llen;
use lpop::Lpop;
use lpush::Lpush;
use lrange::Lrange;
use lrem::Lrem;
use lset::Lset;
use ltrim::Ltrim;
use move_::Move;
use ping::Ping;
use quit::Quit;
use randomkey::RandomKey;
use rename::Rename;
use renamenx::RenameNx;
use rpop::Rpop;
use rpush::Rpush;
use sadd::Sadd;
use save::Save;
use scard::Scard;
use select::Select;
use set::Set;
use setnx::SetNx;
use shutdown::Shutdown;
use sinter::Sinter;
use sinterstore::SinterStore;
use sismember::Sismember;
use smembers::Smembers;
use srem::Srem;
use type_::Type;

#[derive(Debug, PartialEq)]
pub enum Command {
    BgSave(BgSave),
    DbSize(DbSize),
    Decr(Decr),
    DecrBy(DecrBy),
    Del(Del),
    Exists(Exists),
    FlushAll(FlushAll),
    FlushDb(FlushDb),
    Get(Get),
    Incr(Incr),
    IncrBy(IncrBy),
    Info(Info),
    Keys(Keys),
    LastSave(LastSave),
    Lindex(Lindex),
    Llen(Llen),
    Lpop(Lpop),
    Lpush(Lpush),
    Lrange(Lrange),
    Lrem(Lrem),
    Lset(Lset),
    Ltrim(Ltrim),
    Move(Move),
    Ping(Ping),
    Quit(Quit),
    RandomKey(RandomKey),
    Rename(Rename),
    RenameNx(RenameNx),
    Rpop(Rpop),
    Rpush(Rpush),
    Sadd(Sadd),
    Save(Save),
    Scard(Scard),
    Select(Select),
    Set(Set),
    SetNx(SetNx),
    Shutdown(Shutdown),
    Sinter(Sinter),
    SinterStore(SinterStore),
    Sismember(Sismember),
    Smembers(Smembers),
    Srem(Srem),
    Type(Type),
}

impl Executable for Command {
    fn exec(self, server: &Arc<Shared>, session: &mut Session) -> crate::Result<Frame> {
        match self {
            Command::BgSave(cmd) => cmd.exec(server, session),
            Command::DbSize(cmd) => cmd.exec(server, session),
            Command::Decr(cmd) => cmd.exec(server, session),
            Command::DecrBy(cmd) => cmd.exec(server, session),
            Command::Del(cmd) => cmd.exec(server, session),
            Command::Exists(cmd) => cmd.exec(server, session),
            Command::FlushAll(cmd) => cmd.exec(server, session),
            Command::FlushDb(cmd) => cmd.exec(server, session),
            Command::Get(cmd) => cmd.exec(server, session),
            Command::Incr(cmd) => cmd.exec(server, session),
            Command::IncrBy(cmd) => cmd.exec(server, session),
            Command::Info(cmd) => cmd.exec(server, session),
            Command::Keys(cmd) => cmd.exec(server, session),
            Command::LastSave(cmd) => cmd.exec(server, session),
            Command::Lindex(cmd) => cmd.exec(server, session),
            Command::Llen(cmd) => cmd.exec(server, session),
            Command::Lpop(cmd) => cmd.exec(server, session),
            Command::Lpush(cmd) => cmd.exec(server, session),
            Command::Lrange(cmd) => cmd.exec(server, session),
            Command::Lrem(cmd) => cmd.exec(server, session),
            Command::Lset(cmd) => cmd.exec(server, session),
            Command::Ltrim(cmd) => cmd.exec(server, session),
            Command::Move(cmd) => cmd.exec(server, session),
            Command::Ping(cmd) => cmd.exec(server, session),
            Command::RandomKey(cmd) => cmd.exec(server, session),
            Command::Rename(cmd) => cmd.exec(server, session),
            Command::RenameNx(cmd) => cmd.exec(server, session),
            Command::Rpop(cmd) => cmd.exec(server, session),
            Command::Rpush(cmd) => cmd.exec(server, session),
            Command::Sadd(cmd) => cmd.exec(server, session),
            Command::Save(cmd) => cmd.exec(server, session),
            Command::Scard(cmd) => cmd.exec(server, session),
            Command::Select(cmd) => cmd.exec(server, session),
            Command::Set(cmd) => cmd.exec(server, session),
            Command::SetNx(cmd) => cmd.exec(server, session),
            Command::Sinter(cmd) => cmd.exec(server, session),
            Command::SinterStore(cmd) => cmd.exec(server, session),
            Command::Sismember(cmd) => cmd.exec(server, session),
            Command::Smembers(cmd) => cmd.exec(server, session),
            Command::Srem(cmd) => cmd.exec(server, session),
            Command::Type(cmd) => cmd.exec(server, session),
            // The connection loop intercepts these before exec.
            Command::Quit(_) | Command::Shutdown(_) => Ok(reply::ok()),
        }
    }
}

impl TryFrom<Frame> for Command {
    type Error = CommandParserError;

    fn try_from(frame: Frame) -> Result<Self, Self::Error> {
        let parser = &mut CommandParser::new(frame)?;
        let name = parser.name().to_string();

        match name.as_str() {
            "BGSAVE" => BgSave::try_from(parser).map(Command::BgSave),
            "DBSIZE" => DbSize::try_from(parser).map(Command::DbSize),
            "DECR" => Decr::try_from(parser).map(Command::Decr),
            "DECRBY" => DecrBy::try_from(parser).map(Command::DecrBy),
            "DEL" => Del::try_from(parser).map(Command::Del),
            "EXISTS" => Exists::try_from(parser).map(Command::Exists),
            "FLUSHALL" => FlushAll::try_from(parser).map(Command::FlushAll),
            "FLUSHDB" => FlushDb::try_from(parser).map(Command::FlushDb),
            "GET" => Get::try_from(parser).map(Command::Get),
            "INCR" => Incr::try_from(parser).map(Command::Incr),
            "INCRBY" => IncrBy::try_from(parser).map(Command::IncrBy),
            "INFO" => Info::try_from(parser).map(Command::Info),
            "KEYS" => Keys::try_from(parser).map(Command::Keys),
            "LASTSAVE" => LastSave::try_from(parser).map(Command::LastSave),
            "LINDEX" => Lindex::try_from(parser).map(Command::Lindex),
            "LLEN" => Llen::try_from(parser).map(Command::Llen),
            "LPOP" => Lpop::try_from(parser).map(Command::Lpop),
            "LPUSH" => Lpush::try_from(parser).map(Command::Lpush),
            "LRANGE" => Lrange::try_from(parser).map(Command::Lrange),
            "LREM" => Lrem::try_from(parser).map(Command::Lrem),
            "LSET" => Lset::try_from(parser).map(Command::Lset),
            "LTRIM" => Ltrim::try_from(parser).map(Command::Ltrim),
            "MOVE" => Move::try_from(parser).map(Command::Move),
            "PING" => Ping::try_from(parser).map(Command::Ping),
            "QUIT" => Quit::try_from(parser).map(Command::Quit),
            "RANDOMKEY" => RandomKey::try_from(parser).map(Command::RandomKey),
            "RENAME" => Rename::try_from(parser).map(Command::Rename),
            "RENAMENX" => RenameNx::try_from(parser).map(Command::RenameNx),
            "RPOP" => Rpop::try_from(parser).map(Command::Rpop),
            "RPUSH" => Rpush::try_from(parser).map(Command::Rpush),
            "SADD" => Sadd::try_from(parser).map(Command::Sadd),
            "SAVE" => Save::try_from(parser).map(Command::Save),
            "SCARD" => Scard::try_from(parser).map(Command::Scard),
            "SELECT" => Select::try_from(parser).map(Command::Select),
            "SET" => Set::try_from(parser).map(Command::Set),
            "SETNX" => SetNx::try_from(parser).map(Command::SetNx),
            "SHUTDOWN" => Shutdown::try_from(parser).map(Command::Shutdown),
            "SINTER" => Sinter::try_from(parser).map(Command::Sinter),
            "SINTERSTORE" => SinterStore::try_from(parser).map(Command::SinterStore),
            "SISMEMBER" => Sismember::try_from(parser).map(Command::Sismember),
            "SMEMBERS" => Smembers::try_from(parser).map(Command::Smembers),
            "SREM" => Srem::try_from(parser).map(Command::Srem),
            "TYPE" => Type::try_from(parser).map(Command::Type),
            _ => Err(CommandParserError::UnknownCommand { command: name }),
        }
    }
}

/// Holds the flattened argument list of one request array: the uppercased
/// command name plus the remaining arguments in order.
pub struct CommandParser {
    name: String,
    args: vec::IntoIter<Bytes>,
}

impl CommandParser {
    pub(crate) fn new(frame: Frame) -> Result<CommandParser, CommandParserError> {
        // Clients send commands as RESP arrays of bulk strings.
        let frames = match frame {
            Frame::Array(array) => array,
            frame => {
                return Err(CommandParserError::InvalidFrame {
                    expected: "array".to_string(),
                    actual: frame,
                })
            }
        };

        let mut args = Vec::with_capacity(frames.len());
        flatten(frames, &mut args)?;

        let mut args = args.into_iter();
        let name = match args.next() {
            Some(name) => str::from_utf8(&name)
                .map_err(CommandParserError::InvalidUtf8String)?
                .to_uppercase(),
            None => return Err(CommandParserError::EndOfStream),
        };

        Ok(CommandParser { name, args })
    }

    /// The command name, uppercased.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arguments not consumed yet.
    pub fn remaining(&self) -> usize {
        self.args.len()
    }

    pub fn wrong_arity(&self) -> CommandParserError {
        CommandParserError::WrongArity {
            command: self.name.clone(),
        }
    }

    pub fn next_bytes(&mut self) -> Result<Bytes, CommandParserError> {
        self.args.next().ok_or(CommandParserError::EndOfStream)
    }

    pub fn next_string(&mut self) -> Result<String, CommandParserError> {
        let bytes = self.next_bytes()?;
        str::from_utf8(&bytes)
            .map(str::to_string)
            .map_err(CommandParserError::InvalidUtf8String)
    }
}

/// Collects the arguments of a request array. Bulk strings contribute their
/// bytes, integers their decimal text; nested arrays are parsed but
/// contribute nothing; everything else is a protocol error.
fn flatten(frames: Vec<Frame>, args: &mut Vec<Bytes>) -> Result<(), CommandParserError> {
    for frame in frames {
        match frame {
            Frame::Bulk(bytes) => args.push(bytes),
            Frame::Integer(i) => args.push(Bytes::from(i.to_string())),
            Frame::Array(_) => {}
            frame => {
                return Err(CommandParserError::InvalidFrame {
                    expected: "bulk string, integer or array".to_string(),
                    actual: frame,
                })
            }
        }
    }
    Ok(())
}

/// Decimal text to a signed integer, as commands parse their numeric
/// arguments at execution time.
pub(crate) fn parse_i64(bytes: &[u8]) -> Option<i64> {
    str::from_utf8(bytes).ok()?.parse().ok()
}

#[derive(Debug, ThisError, PartialEq)]
pub enum CommandParserError {
    #[error("protocol error; invalid frame, expected {expected}, got {actual}")]
    InvalidFrame { expected: String, actual: Frame },
    #[error("protocol error; invalid UTF-8 string")]
    InvalidUtf8String(#[from] str::Utf8Error),
    #[error("protocol error; attempting to extract a value failed due to the frame being fully consumed")]
    EndOfStream,
    #[error("wrong number of arguments for '{command}'")]
    WrongArity { command: String },
    #[error("unknown command '{command}'")]
    UnknownCommand { command: String },
}

impl CommandParserError {
    /// The reply written for a request that failed to parse. Arity mistakes
    /// name the command; everything else collapses to the generic error.
    pub fn to_frame(&self) -> Frame {
        match self {
            CommandParserError::WrongArity { command } => {
                Frame::Error(format!("ERR Invalid Number of Args for '{}'", command))
            }
            _ => Frame::Error("ERR Invalid Command".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(parts: &[&[u8]]) -> Frame {
        Frame::Array(
            parts
                .iter()
                .map(|part| Frame::Bulk(Bytes::copy_from_slice(part)))
                .collect(),
        )
    }

    #[test]
    fn parse_get_command() {
        let cmd = Command::try_from(array(&[b"GET", b"foo"])).unwrap();

        assert_eq!(
            cmd,
            Command::Get(Get {
                key: Bytes::from("foo")
            })
        );
    }

    #[test]
    fn parse_lowercase_command_name() {
        let cmd = Command::try_from(array(&[b"set", b"foo", b"baz"])).unwrap();

        assert_eq!(
            cmd,
            Command::Set(Set {
                key: Bytes::from("foo"),
                value: Bytes::from("baz")
            })
        );
    }

    #[test]
    fn integer_elements_become_decimal_text_arguments() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("SET")),
            Frame::Bulk(Bytes::from("mykey")),
            Frame::Integer(1),
        ]);

        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(
            cmd,
            Command::Set(Set {
                key: Bytes::from("mykey"),
                value: Bytes::from("1")
            })
        );
    }

    #[test]
    fn nested_arrays_contribute_no_arguments() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("PING")),
            Frame::Array(vec![Frame::Bulk(Bytes::from("ignored"))]),
        ]);

        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(cmd, Command::Ping(Ping { message: None }));
    }

    #[test]
    fn null_element_is_a_protocol_error() {
        let frame = Frame::Array(vec![Frame::Bulk(Bytes::from("PING")), Frame::Null]);

        let err = Command::try_from(frame).unwrap_err();

        assert!(matches!(err, CommandParserError::InvalidFrame { .. }));
        assert_eq!(
            err.to_frame(),
            Frame::Error("ERR Invalid Command".to_string())
        );
    }

    #[test]
    fn wrong_arity_names_the_uppercased_command() {
        let err = Command::try_from(array(&[b"setnx", b"only-one-arg"])).unwrap_err();

        assert_eq!(
            err,
            CommandParserError::WrongArity {
                command: "SETNX".to_string()
            }
        );
        assert_eq!(
            err.to_frame(),
            Frame::Error("ERR Invalid Number of Args for 'SETNX'".to_string())
        );
    }

    #[test]
    fn unknown_command() {
        let err = Command::try_from(array(&[b"NOPE"])).unwrap_err();

        assert_eq!(
            err,
            CommandParserError::UnknownCommand {
                command: "NOPE".to_string()
            }
        );
        assert_eq!(
            err.to_frame(),
            Frame::Error("ERR Invalid Command".to_string())
        );
    }

    #[test]
    fn non_array_frame_is_rejected() {
        let err = Command::try_from(Frame::Simple("GET".to_string())).unwrap_err();

        assert!(matches!(err, CommandParserError::InvalidFrame { .. }));
    }
}
