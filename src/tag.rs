//! Tag bytes: the one-byte discriminator that opens every frame.
//!
//! # Frozen values
//! These bytes are permanent wire constants.  `0x1f` (Unit) is recognised
//! as a tag but reserved: no frame is ever written or read with it.

use std::fmt;

use serde::Serialize;

use crate::error::SioError;

// ── Frozen tag bytes ─────────────────────────────────────────────────────────

pub const TAG_FIELD:  u8 = 0x1c;
pub const TAG_GROUP:  u8 = 0x1d;
pub const TAG_RECORD: u8 = 0x1e;
pub const TAG_UNIT:   u8 = 0x1f;

// ── Tag ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tag {
    Field,
    Group,
    Record,
    Unit,
}

impl Tag {
    #[inline]
    pub fn byte(self) -> u8 {
        match self {
            Tag::Field  => TAG_FIELD,
            Tag::Group  => TAG_GROUP,
            Tag::Record => TAG_RECORD,
            Tag::Unit   => TAG_UNIT,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            TAG_FIELD  => Some(Tag::Field),
            TAG_GROUP  => Some(Tag::Group),
            TAG_RECORD => Some(Tag::Record),
            TAG_UNIT   => Some(Tag::Unit),
            _          => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::Field  => "Field",
            Tag::Group  => "Group",
            Tag::Record => "Record",
            Tag::Unit   => "Unit",
        }
    }

    /// The frame kind this tag opens, or `None` for the reserved Unit tag.
    pub fn kind(self) -> Option<Kind> {
        match self {
            Tag::Field  => Some(Kind::Field),
            Tag::Group  => Some(Kind::Group),
            Tag::Record => Some(Kind::Record),
            Tag::Unit   => None,
        }
    }
}

impl TryFrom<u8> for Tag {
    type Error = SioError;

    fn try_from(b: u8) -> Result<Self, Self::Error> {
        Tag::from_byte(b).ok_or(SioError::InvalidTag(b))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Kind ─────────────────────────────────────────────────────────────────────

/// Role of a container entity.  Fixed when the entity is built, and the
/// only source of the tag it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Kind {
    Field,
    Group,
    Record,
}

impl Kind {
    #[inline]
    pub fn tag(self) -> Tag {
        match self {
            Kind::Field  => Tag::Field,
            Kind::Group  => Tag::Group,
            Kind::Record => Tag::Record,
        }
    }
}

impl From<Kind> for Tag {
    fn from(k: Kind) -> Self {
        k.tag()
    }
}

// ── Byte-level helpers ───────────────────────────────────────────────────────

#[inline]
pub fn is_valid_tag(b: u8) -> bool {
    (TAG_FIELD..=TAG_UNIT).contains(&b)
}

pub fn tag_name(b: u8) -> Option<&'static str> {
    Tag::from_byte(b).map(Tag::name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_range_is_exactly_four_bytes() {
        let valid: Vec<u8> = (0u8..=255).filter(|b| is_valid_tag(*b)).collect();
        assert_eq!(valid, vec![0x1c, 0x1d, 0x1e, 0x1f]);
    }

    #[test]
    fn names() {
        assert_eq!(tag_name(0x1c), Some("Field"));
        assert_eq!(tag_name(0x1d), Some("Group"));
        assert_eq!(tag_name(0x1e), Some("Record"));
        assert_eq!(tag_name(0x1f), Some("Unit"));
        assert_eq!(tag_name(0x1b), None);
        assert_eq!(tag_name(0x20), None);
    }

    #[test]
    fn try_from_reports_offending_byte() {
        assert_eq!(Tag::try_from(0x1e).unwrap(), Tag::Record);
        assert!(matches!(Tag::try_from(0x42), Err(SioError::InvalidTag(0x42))));
    }

    #[test]
    fn unit_has_no_kind() {
        assert_eq!(Tag::Unit.kind(), None);
        for k in [Kind::Field, Kind::Group, Kind::Record] {
            assert_eq!(k.tag().kind(), Some(k));
        }
    }
}
