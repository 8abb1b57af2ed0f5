//! Server side of a single exchange
//!
//! Accepting connections and dispatching them is the server process's
//! business; this module only answers one request on a stream it is handed.

use super::{digest, random_payload, MessageType, HASH_LEN, MAX_DATA_SIZE, UPLOAD_ACCEPTED, UPLOAD_REJECTED};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// What a responder did for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    Download { size: u32 },
    Upload { size: u32, accepted: bool },
}

/// Read one request from `stream` and answer it.
///
/// Unknown message types and sizes above [`MAX_DATA_SIZE`] are refused with
/// an `InvalidData` error before any payload is read or written.
pub async fn respond<S>(stream: &mut S) -> io::Result<Served>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let tag = stream.read_u8().await?;
    let message_type = MessageType::try_from(tag)
        .map_err(|tag| invalid_data(format!("unknown message type {}", tag)))?;

    let size = stream.read_u32().await?;
    if size > MAX_DATA_SIZE {
        return Err(invalid_data(format!(
            "requested size {} exceeds maximum {}",
            size, MAX_DATA_SIZE
        )));
    }

    match message_type {
        MessageType::Download => {
            let data = random_payload(size).map_err(io::Error::other)?;
            stream.write_u32(size).await?;
            stream.write_all(&data).await?;
            stream.write_all(&digest(&data)).await?;
            stream.flush().await?;
            Ok(Served::Download { size })
        }
        MessageType::Upload => {
            let mut data = vec![0u8; size as usize];
            stream.read_exact(&mut data).await?;
            let mut hash = [0u8; HASH_LEN];
            stream.read_exact(&mut hash).await?;

            let accepted = digest(&data) == hash;
            let code = if accepted { UPLOAD_ACCEPTED } else { UPLOAD_REJECTED };
            stream.write_all(&[code]).await?;
            stream.flush().await?;
            Ok(Served::Upload { size, accepted })
        }
    }
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{download, upload, upload_payload};
    use crate::error::AttemptError;
    use tokio::io::duplex;

    #[tokio::test]
    async fn test_download_round_trip() {
        let (mut client, mut server) = duplex(64 * 1024);
        let server = tokio::spawn(async move { respond(&mut server).await });

        download(&mut client, 100_000).await.unwrap();
        assert_eq!(server.await.unwrap().unwrap(), Served::Download { size: 100_000 });
    }

    #[tokio::test]
    async fn test_upload_round_trip() {
        let (mut client, mut server) = duplex(64 * 1024);
        let server = tokio::spawn(async move { respond(&mut server).await });

        upload(&mut client, 200_000).await.unwrap();
        assert_eq!(
            server.await.unwrap().unwrap(),
            Served::Upload { size: 200_000, accepted: true }
        );
    }

    #[tokio::test]
    async fn test_upload_with_corrupt_hash_is_rejected() {
        let (mut client, mut server) = duplex(1024);
        let server = tokio::spawn(async move { respond(&mut server).await });

        let payload = vec![5u8; 10];
        let mut corrupt = digest(&payload);
        corrupt[31] ^= 1;

        client.write_u8(MessageType::Upload.tag()).await.unwrap();
        client.write_u32(10).await.unwrap();
        client.write_all(&payload).await.unwrap();
        client.write_all(&corrupt).await.unwrap();
        assert_eq!(client.read_u8().await.unwrap(), UPLOAD_REJECTED);

        assert_eq!(
            server.await.unwrap().unwrap(),
            Served::Upload { size: 10, accepted: false }
        );
    }

    #[tokio::test]
    async fn test_upload_payload_against_responder() {
        let (mut client, mut server) = duplex(1024);
        let server = tokio::spawn(async move { respond(&mut server).await });

        let result = upload_payload(&mut client, b"hello").await;
        assert!(result.is_ok());
        assert!(server.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_unknown_message_type() {
        let (mut client, mut server) = duplex(64);
        client.write_all(&[9, 0, 0, 0, 1]).await.unwrap();

        let err = respond(&mut server).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_oversized_request_refused() {
        let (mut client, mut server) = duplex(64);
        let server = tokio::spawn(async move { respond(&mut server).await });

        let result = download(&mut client, MAX_DATA_SIZE + 1).await;
        let served = server.await.unwrap();
        assert_eq!(served.unwrap_err().kind(), io::ErrorKind::InvalidData);
        // The responder hangs up without answering
        assert!(matches!(result, Err(AttemptError::Transport { .. })));
    }
}
