use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Look up every given key, responding with an array of values in input
/// order, with the null frame standing in for missing keys.
#[derive(Debug, PartialEq)]
pub struct Mget {
    pub keys: Vec<String>,
}

impl Executable for Mget {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        // One lock acquisition for the whole batch, so the result is a
        // consistent snapshot.
        let store = store.lock();
        let values = self
            .keys
            .iter()
            .map(|key| store.get(key).unwrap_or(Frame::Null))
            .collect();

        Ok(Frame::Array(values))
    }
}

impl TryFrom<&mut CommandParser> for Mget {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let mut keys = vec![];

        loop {
            match parser.next_string() {
                Ok(key) => keys.push(key),
                Err(CommandError::EndOfStream) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(Self { keys })
    }
}
