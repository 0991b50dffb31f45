use crate::commands::{CommandParser, CommandParserError};

/// Closes this connection. No reply is written; the connection loop tears
/// the socket down as soon as the command parses.
#[derive(Debug, PartialEq)]
pub struct Quit;

impl TryFrom<&mut CommandParser> for Quit {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        if parser.remaining() != 0 {
            return Err(parser.wrong_arity());
        }
        Ok(Self)
    }
}
