//! In-process servers for executor and runner tests

use crate::protocol::respond;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve well-behaved exchanges until the test runtime shuts down
pub async fn spawn_responder() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = respond(&mut stream).await;
            });
        }
    });
    addr
}

/// Accept connections and never answer
pub async fn spawn_silent() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    addr
}

/// Answer every download with data whose trailing hash is wrong
pub async fn spawn_corrupting() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _tag = stream.read_u8().await?;
                let size = stream.read_u32().await?;
                stream.write_u32(size).await?;
                stream.write_all(&vec![0xAB; size as usize]).await?;
                stream.write_all(&[0u8; 32]).await?;
                stream.flush().await?;
                // Keep the connection open until the client hangs up
                let mut sink = [0u8; 1];
                let _ = stream.read(&mut sink).await;
                Ok::<_, std::io::Error>(())
            });
        }
    });
    addr
}

/// An address on which nothing is listening
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
