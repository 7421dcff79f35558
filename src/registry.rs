//! Content-type dereference: descriptor string → [`SioType`].
//!
//! Files that know their content type but not its 4-byte type resolve it
//! through a [`TypeResolver`].  [`TypeRegistry`] is the stock resolver: an
//! explicit interning map owned by the caller and passed by reference, so
//! tests and tools can each run with their own set of known types.

use std::collections::HashMap;

use crate::error::{Result, SioError};
use crate::header::SioType;

pub trait TypeResolver {
    fn resolve(&self, descriptor: &str) -> Result<SioType>;
}

#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, SioType>,
    /// When set, unknown descriptors resolve to their CRC-32 type instead
    /// of failing.
    open: bool,
}

impl TypeRegistry {
    /// A registry that only resolves registered descriptors.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that derives the type of any descriptor it has not seen.
    pub fn open() -> Self {
        Self { types: HashMap::new(), open: true }
    }

    /// Register `descriptor` under its derived type and return that type.
    pub fn register(&mut self, descriptor: &str) -> SioType {
        *self
            .types
            .entry(descriptor.to_string())
            .or_insert_with(|| SioType::from_content_type(descriptor))
    }

    /// Register `descriptor` under an explicit type, replacing any previous
    /// binding.
    pub fn register_as(&mut self, descriptor: &str, ty: SioType) {
        self.types.insert(descriptor.to_string(), ty);
    }

    /// Reverse lookup, for diagnostics.
    pub fn descriptor_of(&self, ty: SioType) -> Option<&str> {
        self.types
            .iter()
            .find(|(_, t)| **t == ty)
            .map(|(d, _)| d.as_str())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, descriptor: &str) -> Result<SioType> {
        match self.types.get(descriptor) {
            Some(ty) => Ok(*ty),
            None if self.open => Ok(SioType::from_content_type(descriptor)),
            None => Err(SioError::UnknownContentType(descriptor.to_string())),
        }
    }
}
