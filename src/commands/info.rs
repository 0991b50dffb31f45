use std::sync::Arc;

use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// Server statistics as a multi-bulk reply, one `name:value\n` line per
/// element. The used-memory figure is read under the engine lock so it
/// matches a consistent view of the keyspace.
#[derive(Debug, PartialEq)]
pub struct Info;

impl Executable for Info {
    fn exec(self, server: &Arc<Shared>, _session: &mut Session) -> crate::Result<Frame> {
        let used_memory = server.store.lock().used_memory();
        let uptime = server.stats.uptime_secs();

        let lines = [
            format!("server_version:{}\n", env!("CARGO_PKG_VERSION")),
            format!("connected_clients:{}\n", server.connected_clients()),
            format!("used_memory:{}\n", used_memory),
            format!("last_save_time:{}\n", server.stats.last_save()),
            format!(
                "total_connections_received:{}\n",
                server.stats.total_connections_received()
            ),
            format!(
                "total_commands_processed:{}\n",
                server.stats.total_commands_processed()
            ),
            format!("uptime_in_seconds:{}\n", uptime),
            format!("uptime_in_days:{}\n", uptime / 86400),
        ];

        Ok(Frame::Array(
            lines
                .into_iter()
                .map(|line| Frame::Bulk(Bytes::from(line)))
                .collect(),
        ))
    }
}

impl TryFrom<&mut CommandParser> for Info {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 0 {
            return Err(parser.wrong_arity());
        }
        Ok(Self)
    }
}
