//! Single (Tag, Length, Data) frame codec.
//!
//! ```text
//! ┌─────┬──────────────┬───────────────────────┐
//! │ tag │ length (1-3) │ data (length bytes)   │
//! └─────┴──────────────┴───────────────────────┘
//! ```
//!
//! Data is opaque here.  Whether it holds nested frames is the caller's
//! business (see [`crate::entity`]).

use byteorder::{ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};
use tracing::trace;

use crate::error::{Result, SioError};
use crate::tag::Tag;
use crate::varint::{length_size, read_length, write_length, MAX_LENGTH};

/// Read one frame that must open with `expected`.
///
/// Returns `None` for a zero-length frame.  A tag mismatch fails as soon
/// as the tag byte is seen; nothing after it is consumed.
pub fn read_frame<R: Read>(expected: Tag, mut reader: R) -> Result<Option<Vec<u8>>> {
    if expected == Tag::Unit {
        return Err(SioError::ReservedTag);
    }
    let found = reader.read_u8()?;
    if found != expected.byte() {
        return Err(SioError::UnexpectedTag { expected: expected.byte(), found });
    }
    let len = read_length(&mut reader)?;
    trace!(tag = %expected, len, "read frame");
    if len == 0 {
        return Ok(None);
    }
    read_payload(reader, len).map(Some)
}

/// Write one frame.  An empty `data` is written as length 0.
///
/// Nothing reaches `writer` when the tag is reserved or `data` is longer
/// than [`MAX_LENGTH`].
pub fn write_frame<W: Write>(tag: Tag, data: &[u8], mut writer: W) -> Result<()> {
    if tag == Tag::Unit {
        return Err(SioError::ReservedTag);
    }
    if data.len() > MAX_LENGTH {
        return Err(SioError::LengthOverflow(data.len()));
    }
    writer.write_u8(tag.byte())?;
    write_length(data.len(), &mut writer)?;
    if !data.is_empty() {
        writer.write_all(data)?;
    }
    trace!(%tag, len = data.len(), "wrote frame");
    Ok(())
}

/// Encode one frame into a fresh buffer.
pub fn encode_frame(tag: Tag, data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(frame_size(data.len()));
    write_frame(tag, data, &mut out)?;
    Ok(out)
}

/// Total encoded size of a frame carrying `len` data bytes.
pub fn frame_size(len: usize) -> usize {
    1 + length_size(len) + len
}

/// Fill exactly `len` bytes from `reader`, tolerating short reads.
///
/// Exhausting the source first fails with [`SioError::Truncated`]; the
/// partial bytes are not returned.
pub fn read_payload<R: Read>(mut reader: R, len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    let mut filled = 0;
    while filled < len {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(SioError::Truncated { declared: len, available: filled });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    /// Hands out at most one byte per `read` call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    #[test]
    fn field_end_to_end() {
        let bytes = encode_frame(Tag::Field, &[0x01, 0x02, 0x03]).unwrap();
        assert_eq!(bytes, vec![0x1c, 0x03, 0x01, 0x02, 0x03]);
        let data = read_frame(Tag::Field, Cursor::new(&bytes)).unwrap();
        assert_eq!(data, Some(vec![0x01, 0x02, 0x03]));
    }

    #[test]
    fn empty_frame_reads_as_none() {
        let bytes = encode_frame(Tag::Record, &[]).unwrap();
        assert_eq!(bytes, vec![0x1e, 0x00]);
        assert_eq!(read_frame(Tag::Record, Cursor::new(&bytes)).unwrap(), None);
    }

    #[test]
    fn tag_mismatch_stops_after_tag_byte() {
        let bytes = encode_frame(Tag::Group, &[0xaa, 0xbb]).unwrap();
        let mut cur = Cursor::new(&bytes);
        let err = read_frame(Tag::Field, &mut cur).unwrap_err();
        assert!(matches!(err, SioError::UnexpectedTag { expected: 0x1c, found: 0x1d }));
        assert_eq!(cur.position(), 1);
    }

    #[test]
    fn short_reads_are_tolerated() {
        let data: Vec<u8> = (0..300u16).map(|i| i as u8).collect();
        let bytes = encode_frame(Tag::Group, &data).unwrap();
        let got = read_frame(Tag::Group, Trickle(&bytes)).unwrap();
        assert_eq!(got, Some(data));
    }

    #[test]
    fn truncated_payload_is_reported() {
        let err = read_frame(Tag::Field, Cursor::new(vec![0x1c, 0x05, 0x01, 0x02])).unwrap_err();
        assert!(matches!(err, SioError::Truncated { declared: 5, available: 2 }));
    }

    #[test]
    fn oversized_frame_writes_nothing() {
        let big = vec![0u8; MAX_LENGTH + 1];
        let mut sink = Vec::new();
        let err = write_frame(Tag::Field, &big, &mut sink).unwrap_err();
        assert!(matches!(err, SioError::LengthOverflow(n) if n == MAX_LENGTH + 1));
        assert!(sink.is_empty());

        let max = vec![0u8; MAX_LENGTH];
        write_frame(Tag::Field, &max, &mut sink).unwrap();
        assert_eq!(sink.len(), frame_size(MAX_LENGTH));
    }

    #[test]
    fn unit_tag_is_reserved() {
        assert!(matches!(encode_frame(Tag::Unit, b"x"), Err(SioError::ReservedTag)));
        assert!(matches!(
            read_frame(Tag::Unit, Cursor::new(vec![0x1f, 0x00])),
            Err(SioError::ReservedTag)
        ));
    }

    proptest! {
        #[test]
        fn roundtrip(
            tag in prop_oneof![Just(Tag::Field), Just(Tag::Group), Just(Tag::Record)],
            data in proptest::collection::vec(any::<u8>(), 0..20_000),
        ) {
            let bytes = encode_frame(tag, &data).unwrap();
            prop_assert_eq!(bytes.len(), frame_size(data.len()));
            let got = read_frame(tag, Cursor::new(&bytes)).unwrap();
            if data.is_empty() {
                prop_assert_eq!(got, None);
            } else {
                prop_assert_eq!(got, Some(data));
            }
        }
    }
}
