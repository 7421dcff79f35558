//! File header: fixed signature followed by the 4-byte type.
//!
//! ```text
//! offset  0   1   2   3   4   5   6   7
//!        's' 'i' 'o' 01  │ type (4 bytes, BE) │
//! ```
//!
//! The type is an opaque identifier.  By convention it is the CRC-32 of a
//! content-type descriptor (see [`SioType::from_content_type`]).

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::{Result, SioError};

pub const SIGNATURE: &[u8; 4] = b"sio\x01";
pub const HEADER_SIZE: usize = 8;

// ── SioType ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SioType(pub [u8; 4]);

impl SioType {
    /// Build from up to four bytes, left-padding with zeros.
    /// Returns `None` for slices longer than four bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > 4 {
            return None;
        }
        let mut out = [0u8; 4];
        out[4 - bytes.len()..].copy_from_slice(bytes);
        Some(SioType(out))
    }

    /// Type identifier for a content-type descriptor: big-endian CRC-32 of
    /// its UTF-8 bytes.
    pub fn from_content_type(descriptor: &str) -> Self {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(descriptor.as_bytes());
        SioType::from(hasher.finalize())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<u32> for SioType {
    fn from(v: u32) -> Self {
        SioType(v.to_be_bytes())
    }
}

impl From<SioType> for u32 {
    fn from(t: SioType) -> Self {
        u32::from_be_bytes(t.0)
    }
}

impl fmt::Display for SioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for SioType {
    type Err = String;

    /// Parse up to eight hex digits; short input is left-padded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        if s.is_empty() || s.len() > 8 {
            return Err(format!("type must be 1 to 8 hex digits, got {:?}", s));
        }
        let padded = format!("{:0>8}", s);
        let bytes = hex::decode(&padded).map_err(|e| e.to_string())?;
        SioType::from_slice(&bytes).ok_or_else(|| format!("type out of range: {s}"))
    }
}

impl Serialize for SioType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Header codec ─────────────────────────────────────────────────────────────

/// Validate the signature, then read the type that follows it.
///
/// Stops at the first signature byte that does not match; no type bytes
/// are consumed in that case.
pub fn read_header<R: Read>(mut reader: R) -> Result<SioType> {
    for (position, &want) in SIGNATURE.iter().enumerate() {
        let found = reader.read_u8()?;
        if found != want {
            return Err(SioError::BadSignature { position, found });
        }
    }
    let ty = read_type(reader)?;
    debug!(%ty, "accepted sio header");
    Ok(ty)
}

/// Read the raw 4-byte type field.
pub fn read_type<R: Read>(mut reader: R) -> Result<SioType> {
    Ok(SioType::from(reader.read_u32::<BigEndian>()?))
}

pub fn write_header<W: Write>(ty: SioType, mut writer: W) -> Result<()> {
    writer.write_all(SIGNATURE)?;
    writer.write_u32::<BigEndian>(ty.into())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_layout() {
        let mut out = Vec::new();
        write_header(SioType([0xde, 0xad, 0xbe, 0xef]), &mut out).unwrap();
        assert_eq!(out, vec![b's', b'i', b'o', 0x01, 0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(out.len(), HEADER_SIZE);
        assert_eq!(read_header(Cursor::new(&out)).unwrap(), SioType([0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn signature_mismatch_at_each_position() {
        for position in 0..4 {
            let mut bytes = vec![b's', b'i', b'o', 0x01, 1, 2, 3, 4];
            bytes[position] ^= 0xff;
            let mut cur = Cursor::new(&bytes);
            match read_header(&mut cur) {
                Err(SioError::BadSignature { position: p, found }) => {
                    assert_eq!(p, position);
                    assert_eq!(found, bytes[position]);
                }
                other => panic!("expected BadSignature, got {other:?}"),
            }
            assert_eq!(cur.position(), position as u64 + 1);
        }
    }

    #[test]
    fn short_types_are_left_padded() {
        assert_eq!(SioType::from_slice(&[0x12, 0x34]), Some(SioType([0, 0, 0x12, 0x34])));
        assert_eq!(SioType::from_slice(&[1, 2, 3, 4, 5]), None);
        assert_eq!("1234".parse::<SioType>().unwrap(), SioType([0, 0, 0x12, 0x34]));
        assert_eq!("0xcafebabe".parse::<SioType>().unwrap().to_string(), "cafebabe");
        assert_eq!("0XCAFEBABE".parse::<SioType>().unwrap(), SioType([0xca, 0xfe, 0xba, 0xbe]));
        assert!("0x0x12".parse::<SioType>().is_err());
        assert!("123456789".parse::<SioType>().is_err());
        assert!("zz".parse::<SioType>().is_err());
    }

    #[test]
    fn content_type_hash_is_stable() {
        let a = SioType::from_content_type("application/x-sio");
        let b = SioType::from_content_type("application/x-sio");
        let c = SioType::from_content_type("text/plain");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(u32::from(a), crc32fast::hash(b"application/x-sio"));
    }
}
