use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Atomically remove every key. Responds with the number of keys that were
/// present immediately before clearing.
#[derive(Debug, PartialEq)]
pub struct Flush;

impl Executable for Flush {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let removed = store.lock().flush();
        Ok(Frame::Integer(removed as i64))
    }
}

impl TryFrom<&mut CommandParser> for Flush {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.expect_end("FLUSH")?;
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use bytes::Bytes;

    #[test]
    fn reports_size_before_clearing() {
        let store = Store::new();
        {
            let mut store = store.lock();
            store.set(String::from("key1"), Frame::Bulk(Bytes::from("1")));
            store.set(String::from("key2"), Frame::Bulk(Bytes::from("2")));
        }

        let frame = Frame::Array(vec![Frame::Bulk(Bytes::from("FLUSH"))]);
        let cmd = Command::try_from(frame).unwrap();
        assert_eq!(cmd, Command::Flush(Flush));

        let res = cmd.exec(store.clone()).unwrap();

        assert_eq!(res, Frame::Integer(2));
        assert_eq!(store.lock().size(), 0);
        assert_eq!(store.lock().get("key1"), None);
    }

    #[test]
    fn empty_store_reports_zero() {
        let store = Store::new();

        let frame = Frame::Array(vec![Frame::Bulk(Bytes::from("FLUSH"))]);
        let res = Command::try_from(frame).unwrap().exec(store).unwrap();

        assert_eq!(res, Frame::Integer(0));
    }

    #[test]
    fn rejects_arguments() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("FLUSH")),
            Frame::Bulk(Bytes::from("now")),
        ]);
        let err = Command::try_from(frame).unwrap_err();

        assert_eq!(
            err,
            CommandError::WrongArity {
                command: String::from("FLUSH")
            }
        );
    }
}
