use crate::commands::{CommandParser, CommandParserError};

/// Snapshots all databases, then closes the listener and every connection.
/// Handled by the connection loop; surplus arguments are tolerated.
#[derive(Debug, PartialEq)]
pub struct Shutdown;

impl TryFrom<&mut CommandParser> for Shutdown {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
