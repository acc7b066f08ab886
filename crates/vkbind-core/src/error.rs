//! Error types for descriptor ingestion.
//!
//! ## Error Hierarchy
//!
//! ```text
//! IngestError (top-level, aborts ingestion)
//! ├── Naming(NamingError)          - a raw name has no canonical representation
//! ├── MalformedEntity              - a declaration lacks what classification needs
//! ├── CyclicOrUnorderedDeclaration - the by-value dependency order is violated
//! └── DuplicateDeclaration         - only under `DuplicatePolicy::Reject`
//!
//! DescriptorError (raised before ingestion, while loading XML)
//! └── Xml(roxmltree::Error)        - the document is not well-formed
//! ```
//!
//! Non-fatal conditions (naming convention warnings, unresolved field types, duplicates
//! under the default policy) are reported as [`Diagnostic`](crate::Diagnostic)s instead.

use thiserror::Error;

use crate::{CanonicalName, EntityKind};

// ============================================================================
// Naming Errors
// ============================================================================

/// Errors raised while canonicalizing a raw descriptor name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// A low-level scalar spelling (`*_t`) has no entry in the primitive table.
    #[error("mapping for the primitive type '{name}' is not supported")]
    UnsupportedPrimitiveType { name: String },
}

// ============================================================================
// Descriptor Errors
// ============================================================================

/// Errors raised while building a descriptor tree from XML text.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("descriptor is not well-formed: {0}")]
    Xml(#[from] roxmltree::Error),
}

// ============================================================================
// Ordering Violations
// ============================================================================

/// How a by-value dependency breaks the processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderViolation {
    /// The dependency is declared, acyclic, but processed after its dependent.
    ForwardReference,
    /// The dependency participates in a cycle with its dependent.
    /// Holds every member of the cycle in processing order.
    Cycle(Vec<CanonicalName>),
}

impl std::fmt::Display for OrderViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderViolation::ForwardReference => f.write_str("dependency is processed later"),
            OrderViolation::Cycle(members) => {
                f.write_str("cycle through ")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" -> ")?;
                    }
                    write!(f, "{m}")?;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// Ingestion Errors
// ============================================================================

/// Fatal errors that abort ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error(transparent)]
    Naming(#[from] NamingError),

    /// A declaration is missing data the classifier cannot do without.
    #[error("malformed {kind} declaration at position {position}: {detail}")]
    MalformedEntity {
        kind: EntityKind,
        position: usize,
        detail: String,
    },

    /// `entity` holds `dependency` by value but `dependency` cannot be classified first.
    #[error("'{entity}' depends on '{dependency}' by value: {violation}")]
    CyclicOrUnorderedDeclaration {
        entity: CanonicalName,
        dependency: CanonicalName,
        violation: OrderViolation,
    },

    /// The same canonical name was declared twice.
    #[error("duplicate declaration: '{name}' is declared as {kind} and already as {previous}")]
    DuplicateDeclaration {
        name: CanonicalName,
        kind: EntityKind,
        previous: EntityKind,
    },
}

impl IngestError {
    pub fn malformed(kind: EntityKind, position: usize, detail: impl Into<String>) -> Self {
        IngestError::MalformedEntity {
            kind,
            position,
            detail: detail.into(),
        }
    }

    /// Whether this error comes from a naming table gap rather than the descriptor.
    pub fn is_configuration_gap(&self) -> bool {
        matches!(self, IngestError::Naming(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naming_error_converts() {
        let err: IngestError = NamingError::UnsupportedPrimitiveType {
            name: "int16_t".into(),
        }
        .into();
        assert!(err.is_configuration_gap());
        assert_eq!(
            err.to_string(),
            "mapping for the primitive type 'int16_t' is not supported"
        );
    }

    #[test]
    fn cycle_display() {
        let err = IngestError::CyclicOrUnorderedDeclaration {
            entity: "A".into(),
            dependency: "B".into(),
            violation: OrderViolation::Cycle(vec!["A".into(), "B".into()]),
        };
        assert_eq!(
            err.to_string(),
            "'A' depends on 'B' by value: cycle through A -> B"
        );
        assert!(!err.is_configuration_gap());
    }

    #[test]
    fn malformed_display() {
        let err = IngestError::malformed(EntityKind::Handle, 3, "missing name");
        assert_eq!(
            err.to_string(),
            "malformed handle declaration at position 3: missing name"
        );
    }
}
