//! Arena identifiers for class descriptors.

use std::fmt;

use crate::base::SourceId;

/// Identifies a class declared in source.
///
/// Combines the source unit that owns the descriptor with the descriptor's
/// index inside that unit. Back-references between classes (enclosing,
/// nested) are stored as `ClassId`s rather than pointers.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ClassId {
    pub source: SourceId,
    pub local: LocalClassId,
}

impl ClassId {
    #[inline]
    pub const fn new(source: SourceId, local: LocalClassId) -> Self {
        Self { source, local }
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({:?}:{})", self.source, self.local.0)
    }
}

/// Index of a class within its source unit, in declaration order
/// (outer classes before the classes nested in them).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct LocalClassId(pub u32);

impl LocalClassId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LocalClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalClassId({})", self.0)
    }
}

impl From<u32> for LocalClassId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}
