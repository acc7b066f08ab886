//! Handle entries.

use crate::CanonicalName;

/// The macro a handle is declared with, which fixes its native width.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HandleRepresentation {
    /// `VK_DEFINE_HANDLE`: a pointer to an opaque object.
    Dispatchable,
    /// `VK_DEFINE_NON_DISPATCHABLE_HANDLE`: a 64-bit value on every platform.
    NonDispatchable,
    /// Any other tag, kept verbatim.
    Other(String),
}

impl HandleRepresentation {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "VK_DEFINE_HANDLE" => HandleRepresentation::Dispatchable,
            "VK_DEFINE_NON_DISPATCHABLE_HANDLE" => HandleRepresentation::NonDispatchable,
            other => HandleRepresentation::Other(other.to_string()),
        }
    }

    /// Canonical scalar the unwrapped handle crosses the boundary as.
    pub fn native_scalar(&self) -> Option<&'static str> {
        match self {
            HandleRepresentation::Dispatchable => Some("IntPtr"),
            HandleRepresentation::NonDispatchable => Some("UInt64"),
            HandleRepresentation::Other(_) => None,
        }
    }
}

/// Registry entry for an opaque handle.
///
/// A handle is a logical reference, so it must always be unwrapped before it crosses
/// the boundary and is never directly transferable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleDescriptor {
    pub name: CanonicalName,
    pub raw_name: String,
    pub representation: HandleRepresentation,
}

impl HandleDescriptor {
    pub fn new(
        name: CanonicalName,
        raw_name: impl Into<String>,
        representation: HandleRepresentation,
    ) -> Self {
        Self {
            name,
            raw_name: raw_name.into(),
            representation,
        }
    }

    pub fn is_dispatchable(&self) -> bool {
        self.representation == HandleRepresentation::Dispatchable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn representation_from_tag() {
        assert_eq!(
            HandleRepresentation::from_tag("VK_DEFINE_HANDLE"),
            HandleRepresentation::Dispatchable
        );
        assert_eq!(
            HandleRepresentation::from_tag(" VK_DEFINE_NON_DISPATCHABLE_HANDLE "),
            HandleRepresentation::NonDispatchable
        );
        assert_eq!(
            HandleRepresentation::from_tag("MY_HANDLE"),
            HandleRepresentation::Other("MY_HANDLE".into())
        );
    }

    #[test]
    fn native_scalars() {
        assert_eq!(HandleRepresentation::Dispatchable.native_scalar(), Some("IntPtr"));
        assert_eq!(HandleRepresentation::NonDispatchable.native_scalar(), Some("UInt64"));
        assert_eq!(HandleRepresentation::Other("X".into()).native_scalar(), None);
    }

    #[test]
    fn dispatchable_flag() {
        let handle = HandleDescriptor::new(
            "CommandBuffer".into(),
            "VkCommandBuffer",
            HandleRepresentation::Dispatchable,
        );
        assert!(handle.is_dispatchable());
        assert_eq!(handle.raw_name, "VkCommandBuffer");
    }
}
