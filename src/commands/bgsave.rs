use std::sync::Arc;

use tracing::error;

use crate::commands::executable::Executable;
use crate::commands::{reply, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::server::{Session, Shared};

/// Schedules a snapshot on a blocking worker and replies immediately. The
/// worker holds the engine lock while it writes, so the snapshot is still a
/// consistent point-in-time view.
#[derive(Debug, PartialEq)]
pub struct BgSave;

impl Executable for BgSave {
    fn exec(self, server: &Arc<Shared>, _session: &mut Session) -> crate::Result<Frame> {
        let server = Arc::clone(server);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = server.save() {
                // Snapshot I/O failure is fatal, same as a foreground SAVE.
                error!("background snapshot failed: {e}");
                std::process::exit(1);
            }
        });
        Ok(reply::ok())
    }
}

impl TryFrom<&mut CommandParser> for BgSave {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 0 {
            return Err(parser.wrong_arity());
        }
        Ok(Self)
    }
}
