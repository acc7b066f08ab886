//! Ingestion driver.
//!
//! [`EntityInspector`] walks the `types` section of a descriptor and fills a
//! [`CatalogBuilder`]. The passes run strictly in this order:
//!
//! ```text
//! 0. aliases     alias entries of every category, so lookups can follow them
//! 1. handles     every category="handle" entry, document order
//! 2. structures  every category="struct" entry, document order  ┐ classified in one
//! 3. unions      every category="union" entry, document order   ┘ ordered sequence
//! ```
//!
//! Structures may embed handles (all known after pass 1) and earlier structures;
//! unions come last so they may embed any structure. Before anything is classified
//! the by-value dependencies of passes 2 and 3 are checked against that order (see
//! [`OrderingPolicy`](crate::OrderingPolicy)).

use vkbind_core::{
    CanonicalName, Diagnostic, DiagnosticCode, Diagnostics, Element, EntityKind, IngestError,
    NameConvention, ResolvedName,
};
use vkbind_registry::{CatalogBuilder, EntityCatalog};

use crate::config::{DuplicatePolicy, InspectorConfig};

/// Output of one ingestion run.
#[derive(Debug)]
pub struct Ingestion {
    /// The frozen catalog.
    pub catalog: EntityCatalog,
    /// Every non-fatal condition raised while building it.
    pub diagnostics: Diagnostics,
}

/// Single-use ingestion driver.
///
/// Owns the catalog under construction exclusively; [`inspect`](Self::inspect)
/// consumes the inspector and hands the frozen catalog back.
pub struct EntityInspector<'c> {
    pub(crate) config: &'c InspectorConfig,
    pub(crate) catalog: CatalogBuilder,
    pub(crate) diagnostics: Diagnostics,
}

impl<'c> EntityInspector<'c> {
    pub fn new(config: &'c InspectorConfig) -> Self {
        Self {
            config,
            catalog: CatalogBuilder::new(config.naming.transferable_scalars()),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Run every pass over the descriptor rooted at `root`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn inspect(mut self, root: &Element) -> Result<Ingestion, IngestError> {
        let aliases = self.register_aliases(root)?;
        let handles = self.inspect_handles(root)?;
        let structures = self.inspect_structures(root)?;

        tracing::info!(
            aliases,
            handles,
            structures,
            transferable = self.catalog.transferable_count(),
            diagnostics = self.diagnostics.len(),
            "descriptor ingested"
        );

        Ok(Ingestion {
            catalog: self.catalog.finish(),
            diagnostics: self.diagnostics,
        })
    }

    // ==========================================================================
    // Shared helpers
    // ==========================================================================

    /// Canonicalize a raw name, recording a diagnostic if it follows no convention.
    pub(crate) fn canonicalize(
        &mut self,
        raw: &str,
        label: &str,
        owner: &str,
    ) -> Result<CanonicalName, IngestError> {
        let ResolvedName { name, convention } = self.config.naming.resolve(raw, label)?;
        if convention == NameConvention::Unconventional {
            self.diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::NamingConvention,
                    format!(
                        "{label} name '{raw}' doesn't start with {} prefix or end with {} suffix",
                        self.config.naming.type_prefix(),
                        self.config.naming.scalar_suffix()
                    ),
                )
                .in_entity(owner),
            );
        }
        Ok(name)
    }

    /// Apply the duplicate policy after an insert displaced an earlier entry.
    pub(crate) fn report_displaced(
        &mut self,
        name: &CanonicalName,
        raw_name: &str,
        kind: EntityKind,
        previous: Option<EntityKind>,
    ) -> Result<(), IngestError> {
        let Some(previous) = previous else {
            return Ok(());
        };

        match self.config.duplicates {
            DuplicatePolicy::Reject => Err(IngestError::DuplicateDeclaration {
                name: name.clone(),
                kind,
                previous,
            }),
            DuplicatePolicy::Overwrite => {
                tracing::warn!(
                    name = %name,
                    %kind,
                    %previous,
                    "duplicate declaration overwrites earlier entry"
                );
                self.diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticCode::DuplicateDeclaration,
                        format!("'{name}' declared as {kind} replaces an earlier {previous}"),
                    )
                    .in_entity(raw_name),
                );
                Ok(())
            }
        }
    }
}

/// Ingest the descriptor rooted at `root`.
pub fn inspect(root: &Element, config: &InspectorConfig) -> Result<Ingestion, IngestError> {
    EntityInspector::new(config).inspect(root)
}
