use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use uuid::Uuid;

use crate::codec::FrameCodec;
use crate::frame::Frame;
use crate::Error;

/// One client connection: a framed stream of requests in, responses out.
pub struct Connection {
    pub id: Uuid,
    frames: Framed<TcpStream, FrameCodec>,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Connection {
        Connection {
            id: Uuid::new_v4(),
            frames: Framed::new(stream, FrameCodec),
        }
    }

    /// Read the next frame. `Ok(None)` means the peer closed the connection
    /// cleanly between frames; an EOF in the middle of a frame is an error.
    pub async fn read_frame(&mut self) -> Result<Option<Frame>, Error> {
        match self.frames.next().await {
            Some(Ok(frame)) => Ok(Some(frame)),
            Some(Err(err)) => Err(err),
            None => Ok(None),
        }
    }

    /// Encode, write and flush one frame.
    pub async fn write_frame(&mut self, frame: Frame) -> Result<(), Error> {
        self.frames.send(frame).await
    }
}
