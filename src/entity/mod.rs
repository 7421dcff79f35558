//! Container entities: one frame's Data held in memory.
//!
//! # Kinds
//! A [`Container`] carries its [`Kind`] explicitly.  The kind is either
//! given at construction (writers) or learned from the first tag read
//! (readers) and never changes afterwards.
//!
//! # Strict vs. best-effort parsing of nested frames
//! [`Container::children`] parses the payload as concatenated frames and
//! fails on the first malformed one.  [`decompose`] is the introspection
//! path: it never fails, and whatever it cannot parse is kept as a raw
//! remainder.  Only the debug walker should rely on the latter.

pub mod file;

use byteorder::ReadBytesExt;
use std::io::{Cursor, Read, Write};
use tracing::{trace, warn};

use crate::error::{Result, SioError};
use crate::frame::{frame_size, read_payload, write_frame};
use crate::tag::{is_valid_tag, Kind, Tag};
use crate::varint::read_length;

pub use file::SioFile;

// ── Container ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Container {
    kind: Option<Kind>,
    data: Vec<u8>,
}

impl Container {
    /// An empty container whose kind will be set by the first read.
    pub fn unread() -> Self {
        Self::default()
    }

    pub fn new(kind: Kind, data: Vec<u8>) -> Self {
        Self { kind: Some(kind), data }
    }

    pub fn field(data: impl Into<Vec<u8>>) -> Self {
        Self::new(Kind::Field, data.into())
    }

    /// A Group whose Data is the concatenated encoding of `children`.
    pub fn group(children: &[Container]) -> Result<Self> {
        Ok(Self::new(Kind::Group, encode_all(children)?))
    }

    /// A Record whose Data is the concatenated encoding of `children`.
    pub fn record(children: &[Container]) -> Result<Self> {
        Ok(Self::new(Kind::Record, encode_all(children)?))
    }

    #[inline]
    pub fn kind(&self) -> Option<Kind> {
        self.kind
    }

    #[inline]
    pub fn tag(&self) -> Option<Tag> {
        self.kind.map(Kind::tag)
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Encoded size of this container as one frame.
    pub fn encoded_len(&self) -> usize {
        frame_size(self.data.len())
    }

    // ── Read ─────────────────────────────────────────────────────────────────

    /// Read one frame of any kind into this container.
    ///
    /// If the container already has a kind, the frame must carry the same
    /// tag.  The payload replaces any data already held.
    pub fn read<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let found = reader.read_u8()?;
        let tag = Tag::try_from(found)?;
        let kind = tag.kind().ok_or(SioError::ReservedTag)?;
        if let Some(own) = self.kind {
            if own != kind {
                return Err(SioError::UnexpectedTag { expected: own.tag().byte(), found });
            }
        }
        let len = read_length(&mut reader)?;
        self.data = read_payload(reader, len)?;
        self.kind = Some(kind);
        trace!(%tag, len, "read container");
        Ok(())
    }

    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let mut c = Self::unread();
        c.read(reader)?;
        Ok(c)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read_from(bytes)
    }

    // ── Write ────────────────────────────────────────────────────────────────

    /// Write this container as one frame.
    ///
    /// # Panics
    /// If the container has no kind: it was never read and never built
    /// with one, so there is no tag to write.
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let kind = match self.kind {
            Some(k) => k,
            None => panic!("container has no kind; cannot determine its tag"),
        };
        write_frame(kind.tag(), &self.data, writer)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write(&mut out)?;
        Ok(out)
    }

    // ── Nested frames ────────────────────────────────────────────────────────

    /// Parse the payload as concatenated frames.  Any malformed frame
    /// fails the whole parse.
    pub fn children(&self) -> Result<Vec<Container>> {
        let mut cur = Cursor::new(self.data.as_slice());
        let mut out = Vec::new();
        while (cur.position() as usize) < self.data.len() {
            out.push(Container::read_from(&mut cur)?);
        }
        Ok(out)
    }

    /// Best-effort split of the payload into nested frames.
    pub fn decompose(&self) -> Decomposition {
        decompose(self.data.as_slice())
    }
}

fn encode_all(children: &[Container]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(children.iter().map(Container::encoded_len).sum());
    for c in children {
        c.write(&mut out)?;
    }
    Ok(out)
}

// ── Decomposition ────────────────────────────────────────────────────────────

/// Result of [`decompose`]: the frames that parsed, in order, followed by
/// the bytes that did not.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decomposition {
    pub children:  Vec<Container>,
    /// Unparsed tail, starting at the first byte that did not open a
    /// valid frame.  `None` when every byte was consumed.
    pub remainder: Option<Vec<u8>>,
}

impl Decomposition {
    pub fn is_complete(&self) -> bool {
        self.remainder.is_none()
    }
}

/// Split everything `source` yields into consecutive frames.
///
/// Never fails.  Parsing stops at the first byte that is not a frame tag
/// or at the first frame that cannot be read whole; from there on the
/// bytes go to [`Decomposition::remainder`] unchanged.  A read error on
/// `source` itself ends the input at the bytes delivered so far.  The
/// source is dropped before returning, on every path.
pub fn decompose<R: Read>(mut source: R) -> Decomposition {
    let mut bytes = Vec::new();
    if let Err(e) = source.read_to_end(&mut bytes) {
        warn!(error = %e, read = bytes.len(), "source failed during decomposition");
    }
    drop(source);
    decompose_slice(&bytes)
}

fn decompose_slice(bytes: &[u8]) -> Decomposition {
    let mut out = Decomposition::default();
    let mut cur = Cursor::new(bytes);
    loop {
        let start = cur.position() as usize;
        let Some(&peek) = bytes.get(start) else { break };
        if !is_valid_tag(peek) {
            trace!(offset = start, byte = peek, "payload tail is not a frame");
            out.remainder = Some(bytes[start..].to_vec());
            break;
        }
        match Container::read_from(&mut cur) {
            Ok(child) => out.children.push(child),
            Err(e) => {
                warn!(offset = start, error = %e, "keeping malformed frame as raw bytes");
                out.remainder = Some(bytes[start..].to_vec());
                break;
            }
        }
    }
    out
}
