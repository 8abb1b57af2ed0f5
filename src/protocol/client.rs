//! Client side of a single exchange
//!
//! Each function drives exactly one request/response over a stream that the
//! caller has already opened. The returned duration covers only the exchange
//! itself, never connection setup.

use super::{digest, MessageType, HASH_LEN, UPLOAD_ACCEPTED};
use crate::error::AttemptError;
use rand::{rngs::OsRng, RngCore};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Request `size` bytes and verify them against the trailing hash.
///
/// The server must echo the requested size exactly. The hash is checked
/// after the clock stops, so a [`AttemptError::HashMismatch`] still carries
/// the measured duration.
pub async fn download<S>(stream: &mut S, size: u32) -> Result<Duration, AttemptError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let start = Instant::now();

    stream
        .write_all(&[MessageType::Download.tag()])
        .await
        .map_err(|e| AttemptError::transport("writing message type", e))?;
    stream
        .write_u32(size)
        .await
        .map_err(|e| AttemptError::transport("writing size", e))?;
    stream
        .flush()
        .await
        .map_err(|e| AttemptError::transport("flushing request", e))?;

    let response_size = stream
        .read_u32()
        .await
        .map_err(|e| AttemptError::transport("reading response size", e))?;
    if response_size != size {
        return Err(AttemptError::SizeMismatch {
            expected: size,
            actual: response_size,
        });
    }

    let mut data = vec![0u8; size as usize];
    stream
        .read_exact(&mut data)
        .await
        .map_err(|e| AttemptError::transport("reading data", e))?;

    let mut received_hash = [0u8; HASH_LEN];
    stream
        .read_exact(&mut received_hash)
        .await
        .map_err(|e| AttemptError::transport("reading hash", e))?;

    let elapsed = start.elapsed();

    if digest(&data) != received_hash {
        return Err(AttemptError::HashMismatch { elapsed });
    }

    Ok(elapsed)
}

/// Send `size` fresh random bytes and wait for the server's verdict
pub async fn upload<S>(stream: &mut S, size: u32) -> Result<Duration, AttemptError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let payload = random_payload(size)?;
    upload_payload(stream, &payload).await
}

/// Send a prepared payload and wait for the server's verdict.
///
/// Hashing happens before the clock starts; the clock stops once the
/// result byte arrives.
pub async fn upload_payload<S>(stream: &mut S, payload: &[u8]) -> Result<Duration, AttemptError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let size = u32::try_from(payload.len()).map_err(|_| {
        AttemptError::transport(
            "writing size",
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "payload exceeds u32 length"),
        )
    })?;
    let hash = digest(payload);

    let start = Instant::now();

    stream
        .write_all(&[MessageType::Upload.tag()])
        .await
        .map_err(|e| AttemptError::transport("writing message type", e))?;
    stream
        .write_u32(size)
        .await
        .map_err(|e| AttemptError::transport("writing size", e))?;
    stream
        .write_all(payload)
        .await
        .map_err(|e| AttemptError::transport("writing data", e))?;
    stream
        .write_all(&hash)
        .await
        .map_err(|e| AttemptError::transport("writing hash", e))?;
    stream
        .flush()
        .await
        .map_err(|e| AttemptError::transport("flushing request", e))?;

    let code = stream
        .read_u8()
        .await
        .map_err(|e| AttemptError::transport("reading result", e))?;

    let elapsed = start.elapsed();

    if code != UPLOAD_ACCEPTED {
        return Err(AttemptError::ServerRejected { code, elapsed });
    }

    Ok(elapsed)
}

/// Fill a buffer from the operating system's CSPRNG.
///
/// A failing entropy source fails the attempt rather than sending a
/// partially filled buffer.
pub fn random_payload(size: u32) -> Result<Vec<u8>, AttemptError> {
    let mut payload = vec![0u8; size as usize];
    OsRng
        .try_fill_bytes(&mut payload)
        .map_err(|e| AttemptError::RandomSource(e.to_string()))?;
    Ok(payload)
}
