//! Core types for vkbind.
//!
//! This crate holds everything the ingestion passes and their consumers share:
//!
//! - [`descriptor`]: the parsed descriptor tree the engine reads
//! - [`CanonicalName`] and [`NamingConfig`]: name canonicalization
//! - [`entries`]: handle and structure entries stored in the catalog
//! - [`Diagnostics`]: non-fatal conditions raised during ingestion
//! - [`error`]: fatal errors

mod canonical_name;
pub mod descriptor;
mod diagnostics;
pub mod entries;
pub mod error;
mod naming;

pub use canonical_name::CanonicalName;
pub use descriptor::{DescriptorNode, Element, EntityKind, RawEntity};
pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticKind, Diagnostics};
pub use entries::{
    ArrayLen, EntityRef, FieldDecl, FieldShape, HandleDescriptor, HandleRepresentation,
    MarshalCause, MarshalReason, StructDescriptor, Transferability,
};
pub use error::{DescriptorError, IngestError, NamingError, OrderViolation};
pub use naming::{NameConvention, NamingConfig, ResolvedName};
