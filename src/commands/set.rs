use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Set `key` to `value`, inserting or overwriting. Always succeeds and
/// responds with the integer 1.
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: String,
    pub value: Frame,
}

impl Executable for Set {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        store.lock().set(self.key, self.value);
        Ok(Frame::Integer(1))
    }
}

impl TryFrom<&mut CommandParser> for Set {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let value = Frame::Bulk(parser.next_bytes()?);
        parser.expect_end("SET")?;

        Ok(Self { key, value })
    }
}
