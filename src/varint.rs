//! Frame length codec.
//!
//! A length is 7 bits per byte, most significant group first, with bit 7
//! set on every byte except the last.  At most three bytes are read or
//! written, so the largest representable length is `2^21 - 1`.
//!
//! | Length          | Bytes |
//! |-----------------|-------|
//! | 0 ..= 127       | 1     |
//! | 128 ..= 16383   | 2     |
//! | 16384 ..= 2^21-1| 3     |

use byteorder::{ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::error::{Result, SioError};

/// Largest length a frame can declare.
pub const MAX_LENGTH: usize = (1 << 21) - 1;
/// Encoded width of [`MAX_LENGTH`].
pub const MAX_LENGTH_BYTES: usize = 3;

const CONTINUE: u8 = 0x80;
const PAYLOAD:  u8 = 0x7f;

/// Decode a length.  End of input mid-length surfaces as
/// `io::ErrorKind::UnexpectedEof`.
pub fn read_length<R: Read>(mut reader: R) -> Result<usize> {
    let a = reader.read_u8()?;
    if a & CONTINUE == 0 {
        return Ok((a & PAYLOAD) as usize);
    }
    let b = reader.read_u8()?;
    if b & CONTINUE == 0 {
        return Ok(((a & PAYLOAD) as usize) << 7 | (b & PAYLOAD) as usize);
    }
    // Third byte terminates unconditionally.
    let c = reader.read_u8()?;
    Ok(((a & PAYLOAD) as usize) << 14
        | ((b & PAYLOAD) as usize) << 7
        | (c & PAYLOAD) as usize)
}

/// Encode `value` in the minimal number of bytes.  Returns the number of
/// bytes written.
pub fn write_length<W: Write>(value: usize, mut writer: W) -> Result<usize> {
    if value > MAX_LENGTH {
        return Err(SioError::LengthOverflow(value));
    }
    let a = ((value >> 14) & 0x7f) as u8;
    let b = ((value >> 7) & 0x7f) as u8;
    let c = (value & 0x7f) as u8;
    if a != 0 {
        writer.write_u8(a | CONTINUE)?;
        writer.write_u8(b | CONTINUE)?;
        writer.write_u8(c)?;
        Ok(3)
    } else if b != 0 {
        writer.write_u8(b | CONTINUE)?;
        writer.write_u8(c)?;
        Ok(2)
    } else {
        writer.write_u8(c)?;
        Ok(1)
    }
}

/// Width in bytes of the encoding of `value`, without writing it.
pub fn length_size(value: usize) -> usize {
    if value >> 14 != 0 {
        MAX_LENGTH_BYTES
    } else if value >> 7 != 0 {
        2
    } else {
        1
    }
}
