//! Catalog entries.
//!
//! - [`HandleDescriptor`]: opaque reference entities
//! - [`StructDescriptor`]: structures and unions with their ordered fields
//! - [`EntityRef`]: borrowed view returned by catalog lookups

mod field;
mod handle;
mod structure;

pub use field::{ArrayLen, FieldDecl, FieldShape};
pub use handle::{HandleDescriptor, HandleRepresentation};
pub use structure::{MarshalCause, MarshalReason, StructDescriptor, Transferability};

use crate::{CanonicalName, EntityKind};

/// A resolved catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef<'a> {
    Handle(&'a HandleDescriptor),
    Struct(&'a StructDescriptor),
}

impl<'a> EntityRef<'a> {
    pub fn name(&self) -> &'a CanonicalName {
        match self {
            EntityRef::Handle(h) => &h.name,
            EntityRef::Struct(s) => &s.name,
        }
    }

    pub fn raw_name(&self) -> &'a str {
        match self {
            EntityRef::Handle(h) => &h.raw_name,
            EntityRef::Struct(s) => &s.raw_name,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Handle(_) => EntityKind::Handle,
            EntityRef::Struct(s) => s.kind,
        }
    }

    pub fn is_handle(&self) -> bool {
        matches!(self, EntityRef::Handle(_))
    }

    pub fn as_handle(&self) -> Option<&'a HandleDescriptor> {
        match self {
            EntityRef::Handle(h) => Some(h),
            EntityRef::Struct(_) => None,
        }
    }

    pub fn as_struct(&self) -> Option<&'a StructDescriptor> {
        match self {
            EntityRef::Handle(_) => None,
            EntityRef::Struct(s) => Some(s),
        }
    }

    /// Handles never are; structures are when their verdict says so.
    pub fn is_directly_transferable(&self) -> bool {
        match self {
            EntityRef::Handle(_) => false,
            EntityRef::Struct(s) => s.is_directly_transferable(),
        }
    }
}
