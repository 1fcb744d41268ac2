use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, instrument};

use crate::commands::executable::Executable;
use crate::commands::Command;
use crate::connection::Connection;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Accept connections on `host:port` and serve each one on its own task.
/// At most `max_connections` connections are served at once; further
/// clients queue for a slot rather than being turned away.
pub async fn run(host: &str, port: u16, max_connections: usize) -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let listener = TcpListener::bind((host, port)).await?;
    let store = Store::new();
    let limit = Arc::new(Semaphore::new(max_connections));

    info!("Server listening on {}", listener.local_addr()?);

    loop {
        let permit = limit.clone().acquire_owned().await?;
        let (socket, client_address) = listener.accept().await?;
        let store = store.clone();
        info!("Accepted connection from {:?}", client_address);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, client_address, store).await {
                error!("Connection error: {}", e);
            }
            drop(permit);
        });
    }
}

/// Drive one connection's request/response loop until the client
/// disconnects. Command errors become error frames and the loop continues;
/// malformed wire data or an I/O failure terminates the connection.
#[instrument(
    name = "connection",
    skip(stream, store),
    fields(connection_id, client_address)
)]
async fn handle_connection(
    stream: TcpStream,
    client_address: SocketAddr,
    store: Store,
) -> Result<(), Error> {
    let mut conn = Connection::new(stream);

    tracing::Span::current()
        .record("connection_id", conn.id.to_string())
        .record("client_address", client_address.to_string());

    while let Some(frame) = conn.read_frame().await? {
        debug!("Received frame from client: {:?}", frame);

        let response = match Command::try_from(frame).and_then(|cmd| cmd.exec(store.clone())) {
            Ok(frame) => frame,
            Err(err) => Frame::Error(err.to_string()),
        };

        debug!("Sending response to client: {:?}", response);
        conn.write_frame(response).await?;
    }

    info!("Connection closed");
    Ok(())
}
