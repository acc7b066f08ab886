//! Structure and union entries.
//!
//! A structure carries exactly one [`Transferability`] verdict computed from a single
//! scan of its fields. Whether it needs marshalling and whether it belongs to the
//! directly-transferable set are both read off that verdict, so the two can never
//! disagree.

use std::fmt;

use crate::{CanonicalName, EntityKind, FieldDecl};

/// Why a field forces its structure to be marshalled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarshalCause {
    /// The field is a pointer.
    Pointer,
    /// The field is a fixed or variable length array.
    Array,
    /// The field's type is a handle.
    Handle(CanonicalName),
    /// The field's type is a structure or union that itself needs marshalling.
    MarshalledAggregate(CanonicalName),
    /// The field's type was not known to be transferable when the structure was
    /// classified.
    Unresolved(CanonicalName),
}

impl fmt::Display for MarshalCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarshalCause::Pointer => f.write_str("pointer field"),
            MarshalCause::Array => f.write_str("array field"),
            MarshalCause::Handle(t) => write!(f, "handle type '{t}'"),
            MarshalCause::MarshalledAggregate(t) => write!(f, "marshalled type '{t}'"),
            MarshalCause::Unresolved(t) => write!(f, "unresolved type '{t}'"),
        }
    }
}

/// The first field that taints a structure, and how.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarshalReason {
    pub field: String,
    pub cause: MarshalCause,
}

impl fmt::Display for MarshalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': {}", self.field, self.cause)
    }
}

/// Classification of a structure's memory layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Transferability {
    /// Identical layout on both sides; may be copied byte for byte.
    DirectlyTransferable,
    /// Must be converted field by field.
    RequiresMarshalling(MarshalReason),
}

impl Transferability {
    pub fn is_directly_transferable(&self) -> bool {
        matches!(self, Transferability::DirectlyTransferable)
    }

    pub fn reason(&self) -> Option<&MarshalReason> {
        match self {
            Transferability::DirectlyTransferable => None,
            Transferability::RequiresMarshalling(reason) => Some(reason),
        }
    }
}

/// Registry entry for a structure or union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDescriptor {
    pub name: CanonicalName,
    pub raw_name: String,
    /// [`EntityKind::Struct`] or [`EntityKind::Union`].
    pub kind: EntityKind,
    /// Fields in native layout order.
    pub fields: Vec<FieldDecl>,
    pub transferability: Transferability,
}

impl StructDescriptor {
    pub fn is_directly_transferable(&self) -> bool {
        self.transferability.is_directly_transferable()
    }

    pub fn needs_marshalling(&self) -> bool {
        !self.is_directly_transferable()
    }

    pub fn is_union(&self) -> bool {
        self.kind == EntityKind::Union
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}
