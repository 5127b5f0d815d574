//! Type support traits and CDR encoding.
//!
//! Messages cross the wire as plain CDR v1 with a 4-byte encapsulation
//! header, matching the payloads produced by `rmw_zenoh_cpp`.
//!
//! # Wire Format
//!
//! ```text
//! +------------------+----------------------+
//! | Header (4 bytes) | CDR payload (N bytes)|
//! +------------------+----------------------+
//! ```
//!
//! Header bytes 0-1 are the representation identifier (`0x00 0x01` for
//! CDR little endian), bytes 2-3 are reserved options (`0x00 0x00`).

use crate::error::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};

/// Size of the CDR encapsulation header in bytes.
pub const ENCAPSULATION_HEADER_SIZE: usize = 4;

/// CDR little endian encapsulation header.
pub const CDR_LE_HEADER: [u8; ENCAPSULATION_HEADER_SIZE] = [0x00, 0x01, 0x00, 0x00];

/// CDR big endian encapsulation header.
pub const CDR_BE_HEADER: [u8; ENCAPSULATION_HEADER_SIZE] = [0x00, 0x00, 0x00, 0x00];

/// Serialize a message to CDR little endian bytes with an encapsulation header.
///
/// # Errors
///
/// Returns [`Error::Cdr`] if serialization fails.
pub fn cdr_serialize<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let payload = cdr_encoding::to_vec::<T, byteorder::LittleEndian>(value)
        .map_err(|e| Error::Cdr(e.to_string()))?;
    let mut bytes = CDR_LE_HEADER.to_vec();
    bytes.extend(payload);
    Ok(bytes)
}

/// Deserialize a message from CDR bytes, honoring the encapsulation header.
///
/// Both little and big endian plain CDR v1 payloads are accepted.
///
/// # Errors
///
/// Returns [`Error::Cdr`] if the header is missing, the encoding is not
/// plain CDR v1, or deserialization fails.
pub fn cdr_deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    if bytes.len() < ENCAPSULATION_HEADER_SIZE {
        return Err(Error::Cdr(format!(
            "CDR encapsulation header requires {} bytes, got {}",
            ENCAPSULATION_HEADER_SIZE,
            bytes.len()
        )));
    }
    let payload = &bytes[ENCAPSULATION_HEADER_SIZE..];
    match [bytes[0], bytes[1]] {
        [0x00, 0x01] => {
            let (value, _) = cdr_encoding::from_bytes::<T, byteorder::LittleEndian>(payload)
                .map_err(|e| Error::Cdr(e.to_string()))?;
            Ok(value)
        }
        [0x00, 0x00] => {
            let (value, _) = cdr_encoding::from_bytes::<T, byteorder::BigEndian>(payload)
                .map_err(|e| Error::Cdr(e.to_string()))?;
            Ok(value)
        }
        id => Err(Error::Cdr(format!(
            "unsupported CDR representation identifier: {:#04x} {:#04x}",
            id[0], id[1]
        ))),
    }
}

/// Trait for message types that can cross the Zenoh transport.
///
/// Provides CDR serialization plus the DDS type name and RIHS01 type hash
/// used in key expressions.
pub trait TypeSupport: 'static + Send + Sync {
    /// Serialize this message to CDR-encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cdr`] if serialization fails.
    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// Deserialize a message from CDR-encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cdr`] if deserialization fails.
    fn from_bytes(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized;

    /// Returns the type name in DDS format.
    ///
    /// Example: `"nodelet_interfaces::srv::dds_::NodeletLoad_Request_"`
    fn type_name() -> &'static str;

    /// Returns the RIHS01 type hash for this message type.
    ///
    /// The format is `RIHS01_<64_character_hex_sha256>`.
    fn type_hash() -> &'static str;
}

/// Trait for service types: a request and response message pair.
pub trait ServiceMsg: 'static + Send + Sync {
    /// The request message type.
    type Request: TypeSupport;

    /// The response message type.
    type Response: TypeSupport;

    /// Returns the service type name in DDS format.
    ///
    /// Example: `"nodelet_interfaces::srv::dds_::NodeletLoad_"`
    fn type_name() -> &'static str;

    /// Returns the RIHS01 type hash for the service type.
    fn type_hash() -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        count: i32,
        label: String,
    }

    #[test]
    fn test_cdr_roundtrip() {
        let msg = Sample {
            count: 7,
            label: "manager".to_string(),
        };
        let bytes = cdr_serialize(&msg).unwrap();
        assert_eq!(&bytes[..4], &CDR_LE_HEADER);
        let decoded: Sample = cdr_deserialize(&bytes).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_cdr_deserialize_too_short() {
        let result = cdr_deserialize::<Sample>(&[0x00, 0x01]);
        assert!(matches!(result, Err(Error::Cdr(_))));
    }

    #[test]
    fn test_cdr_deserialize_unsupported_encoding() {
        // PL_CDR_LE is not plain CDR v1
        let bytes = [0x00, 0x03, 0x00, 0x00, 0x00];
        let result = cdr_deserialize::<Sample>(&bytes);
        assert!(matches!(result, Err(Error::Cdr(_))));
    }
}
