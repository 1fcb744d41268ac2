use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Remove `key` if present. Responds with 1 when a key was removed and 0
/// when there was nothing to remove.
#[derive(Debug, PartialEq)]
pub struct Delete {
    pub key: String,
}

impl Executable for Delete {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let removed = store.lock().remove(&self.key).is_some();
        Ok(Frame::Integer(i64::from(removed)))
    }
}

impl TryFrom<&mut CommandParser> for Delete {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        parser.expect_end("DELETE")?;
        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use bytes::Bytes;

    fn delete_cmd(key: &str) -> Command {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("DELETE")),
            Frame::Bulk(Bytes::copy_from_slice(key.as_bytes())),
        ]);
        Command::try_from(frame).unwrap()
    }

    #[test]
    fn removes_once_then_reports_zero() {
        let store = Store::new();
        store
            .lock()
            .set(String::from("foo"), Frame::Bulk(Bytes::from("bar")));

        let res = delete_cmd("foo").exec(store.clone()).unwrap();
        assert_eq!(res, Frame::Integer(1));

        let res = delete_cmd("foo").exec(store.clone()).unwrap();
        assert_eq!(res, Frame::Integer(0));

        assert!(!store.lock().exists("foo"));
    }

    #[test]
    fn missing_key_reports_zero() {
        let store = Store::new();

        let res = delete_cmd("nope").exec(store).unwrap();
        assert_eq!(res, Frame::Integer(0));
    }
}
