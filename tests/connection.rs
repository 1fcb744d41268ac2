use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{self, UnboundedSender};

use memds::connection::Connection;
use memds::frame::Frame;

async fn create_tcp_connection() -> Result<(UnboundedSender<Vec<u8>>, TcpStream), std::io::Error> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let local_addr = listener.local_addr()?;

    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            while let Some(data) = rx.recv().await {
                // Write the received channel data to the socket.
                if socket.write_all(&data).await.is_err() {
                    break;
                }
            }
        }
    });

    // Connect to the server as a client to complete the setup.
    let stream = TcpStream::connect(local_addr).await?;

    Ok((tx, stream))
}

#[tokio::test]
async fn test_parse_simple_string() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    tcp_stream_tx.send(b"+OK\r\n".to_vec()).unwrap();

    let actual = connection.read_frame().await.unwrap();
    let expected = Some(Frame::Simple("OK".to_string()));

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_parse_simple_error() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    tcp_stream_tx.send(b"-Error message\r\n".to_vec()).unwrap();

    let actual = connection.read_frame().await.unwrap();
    let expected = Some(Frame::Error(String::from("Error message")));

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_parse_integer() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    tcp_stream_tx.send(b":1000\r\n".to_vec()).unwrap();

    let actual = connection.read_frame().await.unwrap();
    let expected = Some(Frame::Integer(1000));

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_parse_bulk_string() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    tcp_stream_tx.send(b"$5\r\nhello\r\n".to_vec()).unwrap();

    let actual = connection.read_frame().await.unwrap();
    let expected = Some(Frame::Bulk(Bytes::from("hello")));

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_parse_null_bulk_string() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    tcp_stream_tx.send(b"$-1\r\n".to_vec()).unwrap();

    let actual = connection.read_frame().await.unwrap();
    let expected = Some(Frame::Null);

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_parse_array() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    let bytes = b"*3\r\n$3\r\nSET\r\n$5\r\nmykey\r\n$7\r\nmyvalue\r\n";

    tcp_stream_tx.send(bytes.to_vec()).unwrap();

    let actual = connection.read_frame().await.unwrap();
    let expected = Some(Frame::Array(vec![
        Frame::Bulk(Bytes::from("SET")),
        Frame::Bulk(Bytes::from("mykey")),
        Frame::Bulk(Bytes::from("myvalue")),
    ]));

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_parse_map() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    let bytes = b"%2\r\n$3\r\nfoo\r\n:1\r\n$3\r\nbar\r\n:2\r\n";

    tcp_stream_tx.send(bytes.to_vec()).unwrap();

    let actual = connection.read_frame().await.unwrap();
    let expected = Some(Frame::Map(vec![
        (Frame::Bulk(Bytes::from("foo")), Frame::Integer(1)),
        (Frame::Bulk(Bytes::from("bar")), Frame::Integer(2)),
    ]));

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_parse_multiple_frames_sequentially() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    tcp_stream_tx.send(b"+OK\r\n".to_vec()).unwrap();
    tcp_stream_tx.send(b"$5\r\nhello\r\n".to_vec()).unwrap();
    tcp_stream_tx
        .send(b"*2\r\n$3\r\nGET\r\n$5\r\nmykey\r\n".to_vec())
        .unwrap();
    tcp_stream_tx.send(b":1000\r\n".to_vec()).unwrap();

    let actual = connection.read_frame().await.unwrap();
    assert_eq!(actual, Some(Frame::Simple("OK".to_string())));

    let actual = connection.read_frame().await.unwrap();
    assert_eq!(actual, Some(Frame::Bulk(Bytes::from("hello"))));

    let actual = connection.read_frame().await.unwrap();
    assert_eq!(
        actual,
        Some(Frame::Array(vec![
            Frame::Bulk(Bytes::from("GET")),
            Frame::Bulk(Bytes::from("mykey")),
        ]))
    );

    let actual = connection.read_frame().await.unwrap();
    assert_eq!(actual, Some(Frame::Integer(1000)));
}

#[tokio::test]
async fn test_parse_incomplete_frame() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    // Command split into three parts to simulate partial/incomplete data sending.
    // "*3\r\n$3\r\nSET\r\n$5\r\nmykey\r\n$7\r\nmyvalue\r\n";
    let part1 = b"*3\r\n$3\r\nSE";
    let part2 = b"T\r\n$5\r\nmyke";
    let part3 = b"y\r\n$7\r\nmyvalue\r\n";

    tokio::spawn(async move {
        let parts = vec![part1.to_vec(), part2.to_vec(), part3.to_vec()];
        for part in parts {
            tcp_stream_tx.send(part).unwrap();
            // Simulate a delay in sending/receiving the data.
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        }
    });

    let actual = connection.read_frame().await.unwrap();
    let expected = Some(Frame::Array(vec![
        Frame::Bulk(Bytes::from("SET")),
        Frame::Bulk(Bytes::from("mykey")),
        Frame::Bulk(Bytes::from("myvalue")),
    ]));
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_clean_disconnect() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    tcp_stream_tx.send(b"+OK\r\n".to_vec()).unwrap();

    let actual = connection.read_frame().await.unwrap();
    assert_eq!(actual, Some(Frame::Simple("OK".to_string())));

    // Dropping the sender closes the peer socket between frames.
    drop(tcp_stream_tx);

    let actual = connection.read_frame().await.unwrap();
    assert_eq!(actual, None);
}

#[tokio::test]
async fn test_disconnect_mid_frame_is_an_error() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    // Half an array frame, then the peer goes away.
    tcp_stream_tx.send(b"*2\r\n$3\r\nfoo".to_vec()).unwrap();
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    drop(tcp_stream_tx);

    let actual = connection.read_frame().await;
    assert!(actual.is_err());
}

#[tokio::test]
async fn test_write_frame() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let local_addr = listener.local_addr().unwrap();

    let stream = TcpStream::connect(local_addr).await.unwrap();
    let mut connection = Connection::new(stream);
    let (mut peer, _) = listener.accept().await.unwrap();

    let frame = Frame::Array(vec![
        Frame::Bulk(Bytes::from("SET")),
        Frame::Bulk(Bytes::from("mykey")),
        Frame::Null,
    ]);
    connection.write_frame(frame).await.unwrap();

    let mut received = vec![0u8; 64];
    let n = peer.read(&mut received).await.unwrap();

    assert_eq!(
        &received[..n],
        b"*3\r\n$3\r\nSET\r\n$5\r\nmykey\r\n$-1\r\n"
    );
}
