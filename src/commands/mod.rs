pub mod delete;
pub mod executable;
pub mod flush;
pub mod get;
pub mod mget;
pub mod mset;
pub mod set;

use std::{str, vec};

use bytes::Bytes;
use thiserror::Error as ThisError;

use crate::commands::executable::Executable;
use crate::frame::Frame;
use crate::store::Store;

use delete::Delete;
use flush::Flush;
use get::Get;
use mget::Mget;
use mset::Mset;
use set::Set;

#[derive(Debug, PartialEq)]
pub enum Command {
    Get(Get),
    Set(Set),
    Delete(Delete),
    Flush(Flush),
    Mget(Mget),
    Mset(Mset),
}

impl Executable for Command {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        match self {
            Command::Get(cmd) => cmd.exec(store),
            Command::Set(cmd) => cmd.exec(store),
            Command::Delete(cmd) => cmd.exec(store),
            Command::Flush(cmd) => cmd.exec(store),
            Command::Mget(cmd) => cmd.exec(store),
            Command::Mset(cmd) => cmd.exec(store),
        }
    }
}

impl TryFrom<Frame> for Command {
    type Error = CommandError;

    fn try_from(frame: Frame) -> Result<Self, Self::Error> {
        // Clients normally send commands as arrays of bulk strings. A bare
        // simple string is accepted as a fallback and split on whitespace,
        // which is what the interactive prompt sends.
        let parts = match frame {
            Frame::Array(parts) => parts,
            Frame::Simple(line) => line
                .split_whitespace()
                .map(|token| Frame::Bulk(Bytes::copy_from_slice(token.as_bytes())))
                .collect(),
            _ => return Err(CommandError::InvalidRequest),
        };

        let parser = &mut CommandParser {
            parts: parts.into_iter(),
        };

        let command_name = parser.parse_command_name()?;

        match &command_name[..] {
            "GET" => Get::try_from(parser).map(Command::Get),
            "SET" => Set::try_from(parser).map(Command::Set),
            "DELETE" => Delete::try_from(parser).map(Command::Delete),
            "FLUSH" => Flush::try_from(parser).map(Command::Flush),
            "MGET" => Mget::try_from(parser).map(Command::Mget),
            "MSET" => Mset::try_from(parser).map(Command::Mset),
            _ => Err(CommandError::UnknownCommand {
                command: command_name,
            }),
        }
    }
}

pub(crate) struct CommandParser {
    parts: vec::IntoIter<Frame>,
}

impl CommandParser {
    fn parse_command_name(&mut self) -> Result<String, CommandError> {
        let command_name = self.parts.next().ok_or(CommandError::MissingCommand)?;

        match command_name {
            Frame::Simple(s) => Ok(s.to_uppercase()),
            Frame::Bulk(bytes) => str::from_utf8(&bytes[..])
                .map(|s| s.to_uppercase())
                .map_err(CommandError::InvalidUtf8String),
            frame => Err(CommandError::InvalidFrame {
                expected: "simple or bulk string".to_string(),
                actual: frame,
            }),
        }
    }

    fn next_string(&mut self) -> Result<String, CommandError> {
        let frame = self.parts.next().ok_or(CommandError::EndOfStream)?;

        match frame {
            // Both `Simple` and `Bulk` representations may be strings.
            Frame::Simple(s) => Ok(s),
            Frame::Bulk(bytes) => str::from_utf8(&bytes[..])
                .map(|s| s.to_string())
                .map_err(CommandError::InvalidUtf8String),
            frame => Err(CommandError::InvalidFrame {
                expected: "simple or bulk string".to_string(),
                actual: frame,
            }),
        }
    }

    fn next_bytes(&mut self) -> Result<Bytes, CommandError> {
        let frame = self.parts.next().ok_or(CommandError::EndOfStream)?;

        match frame {
            Frame::Simple(s) => Ok(Bytes::from(s)),
            Frame::Bulk(bytes) => Ok(bytes),
            frame => Err(CommandError::InvalidFrame {
                expected: "simple or bulk string".to_string(),
                actual: frame,
            }),
        }
    }

    /// Commands with a fixed arity call this after consuming their
    /// arguments; anything left over is an arity error.
    fn expect_end(&mut self, command: &str) -> Result<(), CommandError> {
        match self.parts.next() {
            None => Ok(()),
            Some(_) => Err(CommandError::WrongArity {
                command: command.to_string(),
            }),
        }
    }
}

/// A well-formed frame carrying a request the dispatcher cannot honor.
/// Always recoverable: the connection loop renders it as an error frame and
/// keeps the connection open.
#[derive(Debug, ThisError, PartialEq)]
pub enum CommandError {
    #[error("request must be list or simple string")]
    InvalidRequest,
    #[error("missing command")]
    MissingCommand,
    #[error("unknown command: {command}")]
    UnknownCommand { command: String },
    #[error("wrong number of arguments for '{command}'")]
    WrongArity { command: String },
    #[error("invalid frame, expected {expected}, got {actual:?}")]
    InvalidFrame { expected: String, actual: Frame },
    #[error("invalid UTF-8 string")]
    InvalidUtf8String(#[from] str::Utf8Error),
    #[error("attempted to extract a value from a fully consumed request")]
    EndOfStream,
}
