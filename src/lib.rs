//! vkbind - descriptor ingestion and layout classification for native API bindings.
//!
//! Reads the `types` section of a graphics API descriptor, gives every handle,
//! structure and union a canonical binding-facing name, and decides which aggregates
//! can cross the managed/native boundary byte for byte.
//!
//! # Example
//!
//! ```
//! use vkbind::descriptor::{TypeDecl, registry};
//! use vkbind::{InspectorConfig, ingest};
//!
//! let root = registry([
//!     TypeDecl::handle("VkDevice", "VK_DEFINE_HANDLE"),
//!     TypeDecl::structure("VkExtent2D")
//!         .member("uint32_t", "width")
//!         .member("uint32_t", "height"),
//!     TypeDecl::structure("VkDeviceQueueInfo")
//!         .member("VkExtent2D", "extent")
//!         .pointer_member("void", "pNext"),
//! ]);
//!
//! let bindings = ingest(&root, &InspectorConfig::default()).unwrap();
//! assert!(bindings.resolve("Device").unwrap().is_handle());
//! assert!(bindings.is_directly_transferable("Extent2D"));
//! assert!(!bindings.is_directly_transferable("DeviceQueueInfo"));
//! ```
//!
//! # Crates
//!
//! - `vkbind-core`: descriptor tree, canonical names, entries, errors, diagnostics
//! - `vkbind-registry`: the entity catalog and the declaration graph
//! - `vkbind-inspector`: the ingestion passes

pub use vkbind_core::{
    ArrayLen, CanonicalName, DescriptorError, Diagnostic, DiagnosticCode, DiagnosticKind,
    Diagnostics, Element, EntityKind, EntityRef, FieldDecl, FieldShape, HandleDescriptor,
    HandleRepresentation, IngestError, MarshalCause, MarshalReason, NameConvention, NamingConfig,
    NamingError, OrderViolation, ResolvedName, StructDescriptor, Transferability, descriptor,
};
pub use vkbind_inspector::{
    DuplicatePolicy, EntityInspector, Ingestion, InspectorConfig, OrderingPolicy, inspect,
};
pub use vkbind_registry::{CatalogBuilder, DeclarationGraph, EntityCatalog};

/// Everything a binding generator needs from one ingested descriptor.
///
/// Holds the frozen catalog together with the naming rules it was built with, so
/// names that show up later (command parameters, for instance) canonicalize exactly
/// like the types they refer to.
#[derive(Debug)]
pub struct Bindings {
    catalog: EntityCatalog,
    naming: NamingConfig,
    diagnostics: Diagnostics,
}

impl Bindings {
    /// Look up a handle, structure or union by canonical name. Aliases are followed.
    pub fn resolve(&self, name: &str) -> Option<EntityRef<'_>> {
        self.catalog.resolve(name)
    }

    pub fn is_directly_transferable(&self, name: &str) -> bool {
        self.catalog.is_directly_transferable(name)
    }

    /// Canonicalize a raw type name with the rules used during ingestion.
    pub fn canonicalize(&self, raw: &str) -> Result<CanonicalName, NamingError> {
        self.naming.canonicalize(raw, "type")
    }

    /// The canonical name an inspected raw descriptor name was given.
    pub fn translation(&self, raw: &str) -> Option<&CanonicalName> {
        self.catalog.translation(raw)
    }

    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn naming(&self) -> &NamingConfig {
        &self.naming
    }

    pub fn into_parts(self) -> (EntityCatalog, Diagnostics) {
        (self.catalog, self.diagnostics)
    }
}

/// Ingest the descriptor rooted at `root`.
///
/// Runs alias registration, then handles, then structures and unions. Fails on the
/// first fatal condition; everything else ends up in [`Bindings::diagnostics`].
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn ingest(root: &Element, config: &InspectorConfig) -> Result<Bindings, IngestError> {
    let Ingestion {
        catalog,
        diagnostics,
    } = inspect(root, config)?;

    if !diagnostics.is_empty() {
        tracing::info!(
            warnings = diagnostics.warning_count(),
            total = diagnostics.len(),
            "ingestion finished with diagnostics"
        );
    }

    Ok(Bindings {
        catalog,
        naming: config.naming.clone(),
        diagnostics,
    })
}
