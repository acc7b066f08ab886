//! EntityCatalog - storage for every entity discovered during ingestion.
//!
//! # Storage Model
//!
//! - **Handles** and **structures** are stored in separate maps keyed by
//!   [`CanonicalName`]. A name lives in at most one of them.
//! - The **directly-transferable set** starts with the scalar seeds of the naming
//!   configuration and gains every structure classified as transferable.
//! - **Aliases** map an alternate canonical name to the name it stands for. Every
//!   lookup follows them.
//! - **Translations** record the raw descriptor spelling of each inspected entity.
//!
//! # Ownership
//!
//! Mutation is only possible through [`CatalogBuilder`], which the ingestion driver owns
//! exclusively. [`CatalogBuilder::finish`] consumes it and returns the read-only
//! [`EntityCatalog`] handed to downstream consumers.
//!
//! # Example
//!
//! ```
//! use vkbind_registry::CatalogBuilder;
//! use vkbind_core::{CanonicalName, HandleDescriptor, HandleRepresentation};
//!
//! let mut builder = CatalogBuilder::new([CanonicalName::new("UInt32")]);
//! builder.insert_handle(HandleDescriptor::new(
//!     "Device".into(),
//!     "VkDevice",
//!     HandleRepresentation::Dispatchable,
//! ));
//! let catalog = builder.finish();
//!
//! assert!(catalog.resolve("Device").unwrap().is_handle());
//! assert!(catalog.is_directly_transferable("UInt32"));
//! assert!(!catalog.is_directly_transferable("Device"));
//! ```

use std::ops::Deref;

use rustc_hash::{FxHashMap, FxHashSet};

use vkbind_core::{CanonicalName, EntityKind, EntityRef, HandleDescriptor, StructDescriptor};

/// Read-only registry of handles, structures and transferable names.
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    handles: FxHashMap<CanonicalName, HandleDescriptor>,
    structs: FxHashMap<CanonicalName, StructDescriptor>,
    transferable: FxHashSet<CanonicalName>,
    aliases: FxHashMap<CanonicalName, CanonicalName>,
    translations: FxHashMap<String, CanonicalName>,

    /// First-declaration order, for deterministic iteration.
    handle_order: Vec<CanonicalName>,
    struct_order: Vec<CanonicalName>,
    handle_seen: FxHashSet<CanonicalName>,
    struct_seen: FxHashSet<CanonicalName>,
}

impl EntityCatalog {
    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Look up an entity by canonical name, following aliases.
    pub fn resolve(&self, name: &str) -> Option<EntityRef<'_>> {
        let name = self.follow_aliases(name);
        if let Some(handle) = self.handles.get(name) {
            return Some(EntityRef::Handle(handle));
        }
        self.structs.get(name).map(EntityRef::Struct)
    }

    /// Whether `name` (or what it aliases) may be copied byte for byte.
    pub fn is_directly_transferable(&self, name: &str) -> bool {
        self.transferable.contains(self.follow_aliases(name))
    }

    pub fn handle(&self, name: &str) -> Option<&HandleDescriptor> {
        self.handles.get(self.follow_aliases(name))
    }

    pub fn structure(&self, name: &str) -> Option<&StructDescriptor> {
        self.structs.get(self.follow_aliases(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// The canonical name `alias` stands for, if it was declared as an alias.
    pub fn alias_target(&self, alias: &str) -> Option<&CanonicalName> {
        self.aliases.get(alias)
    }

    /// The canonical name an inspected raw descriptor name was given.
    pub fn translation(&self, raw: &str) -> Option<&CanonicalName> {
        self.translations.get(raw)
    }

    /// Follow aliases until reaching a declared entity or a name with no alias.
    pub fn follow_aliases<'a>(&'a self, mut name: &'a str) -> &'a str {
        // Bounded so a malformed alias loop cannot spin forever.
        for _ in 0..=self.aliases.len() {
            if self.handles.contains_key(name) || self.structs.contains_key(name) {
                return name;
            }
            match self.aliases.get(name) {
                Some(next) => name = next.as_str(),
                None => return name,
            }
        }
        name
    }

    // ==========================================================================
    // Iteration
    // ==========================================================================

    /// Handles in declaration order.
    pub fn handles(&self) -> impl Iterator<Item = &HandleDescriptor> {
        self.handle_order
            .iter()
            .filter_map(|name| self.handles.get(name))
    }

    /// Structures and unions in declaration order.
    pub fn structures(&self) -> impl Iterator<Item = &StructDescriptor> {
        self.struct_order
            .iter()
            .filter_map(|name| self.structs.get(name))
    }

    /// Every directly-transferable name, seeds included. Unordered.
    pub fn transferable(&self) -> impl Iterator<Item = &CanonicalName> {
        self.transferable.iter()
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&CanonicalName, &CanonicalName)> {
        self.aliases.iter()
    }

    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    pub fn struct_count(&self) -> usize {
        self.structs.len()
    }

    pub fn transferable_count(&self) -> usize {
        self.transferable.len()
    }
}

/// Mutable access to an [`EntityCatalog`] under construction.
///
/// Dereferences to the catalog for lookups, which the structure pass needs while it
/// classifies later declarations against earlier ones.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: EntityCatalog,
}

impl CatalogBuilder {
    /// Start a catalog whose transferable set holds `seeds`.
    pub fn new(seeds: impl IntoIterator<Item = CanonicalName>) -> Self {
        let mut catalog = EntityCatalog::default();
        catalog.transferable.extend(seeds);
        Self { catalog }
    }

    /// Register a handle. Returns the kind of the entry it replaced, if any.
    pub fn insert_handle(&mut self, handle: HandleDescriptor) -> Option<EntityKind> {
        let name = handle.name.clone();
        let displaced = self.displace(&name);

        self.catalog.transferable.remove(&name);
        if self.catalog.handle_seen.insert(name.clone()) {
            self.catalog.handle_order.push(name.clone());
        }
        self.catalog.handles.insert(name, handle);
        displaced
    }

    /// Register a classified structure or union. Returns the kind of the entry it
    /// replaced, if any.
    pub fn insert_struct(&mut self, structure: StructDescriptor) -> Option<EntityKind> {
        let name = structure.name.clone();
        let displaced = self.displace(&name);

        if structure.is_directly_transferable() {
            self.catalog.transferable.insert(name.clone());
        } else {
            self.catalog.transferable.remove(&name);
        }
        if self.catalog.struct_seen.insert(name.clone()) {
            self.catalog.struct_order.push(name.clone());
        }
        self.catalog.structs.insert(name, structure);
        displaced
    }

    /// Declare `alias` as another name for `target`. Returns the previous target.
    pub fn insert_alias(
        &mut self,
        alias: CanonicalName,
        target: CanonicalName,
    ) -> Option<CanonicalName> {
        self.catalog.aliases.insert(alias, target)
    }

    /// Remember which canonical name a raw descriptor name was given.
    pub fn record_translation(&mut self, raw: impl Into<String>, canonical: CanonicalName) {
        self.catalog.translations.insert(raw.into(), canonical);
    }

    /// Freeze the catalog.
    pub fn finish(self) -> EntityCatalog {
        self.catalog
    }

    fn displace(&mut self, name: &CanonicalName) -> Option<EntityKind> {
        if self.catalog.handles.remove(name).is_some() {
            return Some(EntityKind::Handle);
        }
        self.catalog.structs.remove(name).map(|previous| previous.kind)
    }
}

impl Deref for CatalogBuilder {
    type Target = EntityCatalog;

    fn deref(&self) -> &EntityCatalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vkbind_core::{
        FieldDecl, FieldShape, HandleRepresentation, MarshalCause, MarshalReason,
        Transferability,
    };

    fn handle(name: &str) -> HandleDescriptor {
        HandleDescriptor::new(
            name.into(),
            format!("Vk{name}"),
            HandleRepresentation::NonDispatchable,
        )
    }

    fn structure(name: &str, transferable: bool) -> StructDescriptor {
        let transferability = if transferable {
            Transferability::DirectlyTransferable
        } else {
            Transferability::RequiresMarshalling(MarshalReason {
                field: "pNext".into(),
                cause: MarshalCause::Pointer,
            })
        };
        StructDescriptor {
            name: name.into(),
            raw_name: format!("Vk{name}"),
            kind: EntityKind::Struct,
            fields: vec![FieldDecl {
                name: "x".into(),
                raw_type: "uint32_t".into(),
                type_name: "UInt32".into(),
                shape: FieldShape::Value,
            }],
            transferability,
        }
    }

    #[test]
    fn new_catalog_holds_only_seeds() {
        let catalog = CatalogBuilder::new([CanonicalName::new("Int32")]).finish();
        assert_eq!(catalog.handle_count(), 0);
        assert_eq!(catalog.struct_count(), 0);
        assert_eq!(catalog.transferable_count(), 1);
        assert!(catalog.is_directly_transferable("Int32"));
        assert!(catalog.resolve("Int32").is_none());
    }

    #[test]
    fn handles_are_never_transferable() {
        let mut builder = CatalogBuilder::new([CanonicalName::new("IntPtr")]);
        builder.insert_handle(handle("IntPtr"));
        assert!(!builder.is_directly_transferable("IntPtr"));
        assert!(builder.resolve("IntPtr").unwrap().is_handle());
    }

    #[test]
    fn transferable_struct_joins_set() {
        let mut builder = CatalogBuilder::default();
        builder.insert_struct(structure("Offset2D", true));
        builder.insert_struct(structure("DeviceCreateInfo", false));

        assert!(builder.is_directly_transferable("Offset2D"));
        assert!(!builder.is_directly_transferable("DeviceCreateInfo"));
        assert!(
            builder
                .structure("DeviceCreateInfo")
                .unwrap()
                .needs_marshalling()
        );
    }

    #[test]
    fn duplicate_reports_displaced_kind() {
        let mut builder = CatalogBuilder::default();
        assert_eq!(builder.insert_struct(structure("Foo", true)), None);
        assert_eq!(
            builder.insert_struct(structure("Foo", false)),
            Some(EntityKind::Struct)
        );
        assert!(!builder.is_directly_transferable("Foo"));
        assert_eq!(builder.insert_handle(handle("Foo")), Some(EntityKind::Struct));

        let catalog = builder.finish();
        assert!(catalog.resolve("Foo").unwrap().is_handle());
        assert_eq!(catalog.struct_count(), 0);
        assert_eq!(catalog.structures().count(), 0);
        assert_eq!(catalog.handles().count(), 1);
    }

    #[test]
    fn redeclaration_keeps_first_declaration_order() {
        let mut builder = CatalogBuilder::default();
        builder.insert_struct(structure("Extent2D", true));
        builder.insert_struct(structure("Offset2D", true));
        builder.insert_struct(structure("Extent2D", false));
        builder.insert_struct(structure("Extent2D", true));
        builder.insert_handle(handle("Fence"));
        builder.insert_handle(handle("Fence"));

        let catalog = builder.finish();
        let names: Vec<&str> = catalog.structures().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Extent2D", "Offset2D"]);
        assert_eq!(catalog.handles().count(), 1);
        assert!(catalog.is_directly_transferable("Extent2D"));
    }

    #[test]
    fn aliases_are_followed() {
        let mut builder = CatalogBuilder::default();
        builder.insert_struct(structure("PhysicalDeviceFeatures2", true));
        builder.insert_alias(
            "PhysicalDeviceFeatures2Khr".into(),
            "PhysicalDeviceFeatures2".into(),
        );
        let catalog = builder.finish();

        let entity = catalog.resolve("PhysicalDeviceFeatures2Khr").unwrap();
        assert_eq!(entity.name(), "PhysicalDeviceFeatures2");
        assert!(catalog.is_directly_transferable("PhysicalDeviceFeatures2Khr"));
        assert_eq!(
            catalog.alias_target("PhysicalDeviceFeatures2Khr").unwrap(),
            "PhysicalDeviceFeatures2"
        );
    }

    #[test]
    fn alias_loop_terminates() {
        let mut builder = CatalogBuilder::default();
        builder.insert_alias("A".into(), "B".into());
        builder.insert_alias("B".into(), "A".into());
        let catalog = builder.finish();
        assert!(catalog.resolve("A").is_none());
        assert!(!catalog.is_directly_transferable("A"));
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let mut builder = CatalogBuilder::default();
        for name in ["C", "A", "B"] {
            builder.insert_struct(structure(name, true));
        }
        builder.insert_struct(structure("A", true));
        let names: Vec<_> = builder
            .finish()
            .structures()
            .map(|s| s.name.to_string())
            .collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn translations() {
        let mut builder = CatalogBuilder::default();
        builder.record_translation("VkExtent2D", "Extent2D".into());
        let catalog = builder.finish();
        assert_eq!(catalog.translation("VkExtent2D").unwrap(), "Extent2D");
        assert!(catalog.translation("VkExtent3D").is_none());
    }
}
