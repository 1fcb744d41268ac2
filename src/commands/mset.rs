use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Set each key of an alternating key/value argument list. Responds with
/// the number of pairs set. A trailing key without a value is an arity
/// error; the unpaired element is never silently dropped.
#[derive(Debug, PartialEq)]
pub struct Mset {
    pub pairs: Vec<(String, Frame)>,
}

impl Executable for Mset {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let count = self.pairs.len();

        // One lock acquisition for the whole batch, so the writes land as
        // a unit.
        let mut store = store.lock();
        for (key, value) in self.pairs {
            store.set(key, value);
        }

        Ok(Frame::Integer(count as i64))
    }
}

impl TryFrom<&mut CommandParser> for Mset {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let mut pairs = vec![];

        loop {
            let key = match parser.next_string() {
                Ok(key) => key,
                Err(CommandError::EndOfStream) => break,
                Err(err) => return Err(err),
            };

            let value = match parser.next_bytes() {
                Ok(bytes) => Frame::Bulk(bytes),
                Err(CommandError::EndOfStream) => {
                    return Err(CommandError::WrongArity {
                        command: "MSET".to_string(),
                    })
                }
                Err(err) => return Err(err),
            };

            pairs.push((key, value));
        }

        Ok(Self { pairs })
    }
}
