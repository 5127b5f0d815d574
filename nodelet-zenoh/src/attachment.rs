//! Message attachment encoding/decoding.
//!
//! Every query and reply carries a fixed-size metadata attachment, as
//! specified by the rmw_zenoh design. Servers echo the client's sequence
//! number and GID back so the client can match replies to requests.
//!
//! # Attachment Format (33 bytes)
//!
//! | Offset | Size | Content |
//! |--------|------|---------|
//! | 0 | 8 | Sequence number (i64 LE) |
//! | 8 | 8 | Timestamp in nanoseconds since UNIX epoch (i64 LE) |
//! | 16 | 1 | GID length (always 16) |
//! | 17 | 16 | Client/Server GID (16 bytes) |

use crate::error::{Error, Result};
use std::time::{SystemTime, UNIX_EPOCH};

/// Size of the attachment in bytes.
pub const ATTACHMENT_SIZE: usize = 33;

/// Size of the GID (Global Identifier).
pub const GID_SIZE: usize = 16;

/// Attachment data for requests and replies.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Sequence number of the request.
    pub sequence_number: i64,
    /// Timestamp in nanoseconds since UNIX epoch.
    pub timestamp_ns: i64,
    /// Global identifier of the originating client.
    pub gid: [u8; GID_SIZE],
}

impl Default for Attachment {
    fn default() -> Self {
        Self::new(0, [0; GID_SIZE])
    }
}

impl Attachment {
    /// Create a new attachment with the current timestamp.
    pub fn new(sequence_number: i64, gid: [u8; GID_SIZE]) -> Self {
        let timestamp_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as i64)
            .unwrap_or(0);

        Self {
            sequence_number,
            timestamp_ns,
            gid,
        }
    }

    /// Encode the attachment to bytes.
    pub fn to_bytes(&self) -> [u8; ATTACHMENT_SIZE] {
        let mut bytes = [0u8; ATTACHMENT_SIZE];
        bytes[0..8].copy_from_slice(&self.sequence_number.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.timestamp_ns.to_le_bytes());
        bytes[16] = GID_SIZE as u8;
        bytes[17..33].copy_from_slice(&self.gid);
        bytes
    }

    /// Decode an attachment from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttachment`] if the bytes are too short or
    /// the GID length byte is wrong.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ATTACHMENT_SIZE {
            return Err(Error::InvalidAttachment(format!(
                "attachment too short: expected {} bytes, got {}",
                ATTACHMENT_SIZE,
                bytes.len()
            )));
        }

        let sequence_number = i64::from_le_bytes(
            bytes[0..8]
                .try_into()
                .map_err(|_| Error::InvalidAttachment("invalid sequence number".into()))?,
        );
        let timestamp_ns = i64::from_le_bytes(
            bytes[8..16]
                .try_into()
                .map_err(|_| Error::InvalidAttachment("invalid timestamp".into()))?,
        );
        let gid_len = bytes[16] as usize;

        if gid_len != GID_SIZE {
            return Err(Error::InvalidAttachment(format!(
                "invalid GID length: expected {}, got {}",
                GID_SIZE, gid_len
            )));
        }

        let mut gid = [0u8; GID_SIZE];
        gid.copy_from_slice(&bytes[17..33]);

        Ok(Self {
            sequence_number,
            timestamp_ns,
            gid,
        })
    }
}

/// Generate a random GID using UUID v4.
pub fn generate_gid() -> [u8; GID_SIZE] {
    *uuid::Uuid::new_v4().as_bytes()
}
