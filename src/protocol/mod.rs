//! Wire protocol shared by the client and its counterpart server
//!
//! One exchange per connection, all integers big-endian and fixed width:
//!
//! ```text
//! download  C->S  [type=1][size:u32]
//!           S->C  [size:u32][data; size][sha256; 32]
//! upload    C->S  [type=2][size:u32][data; size][sha256; 32]
//!           S->C  [result:u8]   1 = accepted
//! ```

pub mod client;
pub mod responder;

pub use client::{download, random_payload, upload, upload_payload};
pub use responder::{respond, Served};

use sha2::{Digest, Sha256};
use std::fmt;

/// Largest payload either side will send or accept (16 MiB)
pub const MAX_DATA_SIZE: u32 = 16 * 1024 * 1024;

/// Length of a SHA-256 digest on the wire
pub const HASH_LEN: usize = 32;

/// Result byte sent by the server for an upload whose hash verified
pub const UPLOAD_ACCEPTED: u8 = 1;

/// Result byte sent by the server for an upload whose hash did not verify
pub const UPLOAD_REJECTED: u8 = 0;

/// First byte of every request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    Download = 1,
    Upload = 2,
}

impl MessageType {
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MessageType {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(Self::Download),
            2 => Ok(Self::Upload),
            other => Err(other),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Download => write!(f, "download"),
            Self::Upload => write!(f, "upload"),
        }
    }
}

/// SHA-256 of a payload as it travels on the wire
pub fn digest(data: &[u8]) -> [u8; HASH_LEN] {
    Sha256::digest(data).into()
}
