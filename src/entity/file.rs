//! File entities: a container preceded by the `sio\x01` header and type.
//!
//! A file's type is either bound up front ([`SioFile::with_type`],
//! [`SioFile::for_content_type`]) or left open ([`SioFile::open`]), in
//! which case the first successful read adopts the type found on the
//! wire.  Once bound, every later read must see the same type.

use std::io::{Read, Write};
use tracing::debug;

use crate::entity::{Container, Decomposition};
use crate::error::{Result, SioError};
use crate::header::{read_header, write_header, SioType, HEADER_SIZE};
use crate::registry::TypeResolver;
use crate::varint::MAX_LENGTH;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SioFile {
    ty:   Option<SioType>,
    body: Container,
}

impl SioFile {
    /// A file that accepts whatever type it reads first.
    pub fn open() -> Self {
        Self::default()
    }

    /// A file that only reads streams of type `ty`.
    pub fn with_type(ty: SioType) -> Self {
        Self { ty: Some(ty), body: Container::unread() }
    }

    /// A file bound to the type `resolver` gives for `descriptor`.
    pub fn for_content_type<T>(resolver: &T, descriptor: &str) -> Result<Self>
    where
        T: TypeResolver + ?Sized,
    {
        Ok(Self::with_type(resolver.resolve(descriptor)?))
    }

    /// A file ready to write: type `ty`, payload `body`.
    pub fn new(ty: SioType, body: Container) -> Self {
        Self { ty: Some(ty), body }
    }

    #[inline]
    pub fn sio_type(&self) -> Option<SioType> {
        self.ty
    }

    #[inline]
    pub fn body(&self) -> &Container {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Container {
        &mut self.body
    }

    pub fn into_body(self) -> Container {
        self.body
    }

    /// Read header and body.  A type mismatch fails before the body is
    /// touched.
    pub fn read<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let found = read_header(&mut reader)?;
        match self.ty {
            Some(expected) if expected != found => {
                return Err(SioError::WrongType { expected, found });
            }
            Some(_) => {}
            None => {
                debug!(ty = %found, "adopting type from stream");
                self.ty = Some(found);
            }
        }
        self.body.read(reader)
    }

    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let mut f = Self::open();
        f.read(reader)?;
        Ok(f)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read_from(bytes)
    }

    /// Write header and body.  Fails with [`SioError::MissingType`] if no
    /// type was ever bound, and with [`SioError::LengthOverflow`] if the
    /// body is too long for one frame; in both cases nothing is written.
    ///
    /// # Panics
    /// If the body has no kind (see [`Container::write`]).
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        let ty = self.ty.ok_or(SioError::MissingType)?;
        let len = self.body.data().len();
        if len > MAX_LENGTH {
            return Err(SioError::LengthOverflow(len));
        }
        write_header(ty, &mut writer)?;
        self.body.write(writer)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.body.encoded_len());
        self.write(&mut out)?;
        Ok(out)
    }

    pub fn decompose(&self) -> Decomposition {
        self.body.decompose()
    }
}
