//! Identifiers for parsed source units.

use std::fmt;

/// A handle for one source unit within a session.
///
/// `SourceId` is just a u32. The unit itself lives in the session's
/// [`SourceSet`](crate::model::SourceSet); everything else refers to it by id,
/// which keeps back-references from classes and type references non-owning.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct SourceId(pub u32);

impl SourceId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceId({})", self.0)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_equality() {
        assert_eq!(SourceId::new(3), SourceId(3));
        assert_ne!(SourceId::new(3), SourceId::new(4));
    }

    #[test]
    fn test_source_id_display() {
        assert_eq!(SourceId::new(7).to_string(), "source#7");
        assert_eq!(format!("{:?}", SourceId::new(7)), "SourceId(7)");
    }

    #[test]
    fn test_source_id_size() {
        assert_eq!(std::mem::size_of::<SourceId>(), 4);
    }
}
