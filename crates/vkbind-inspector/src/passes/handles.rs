//! Pass 1: handles.

use vkbind_core::descriptor::entities_of;
use vkbind_core::{
    Element, EntityKind, HandleDescriptor, HandleRepresentation, IngestError, RawEntity,
};

use crate::inspector::EntityInspector;

impl EntityInspector<'_> {
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(crate) fn inspect_handles(&mut self, root: &Element) -> Result<usize, IngestError> {
        let mut count = 0;
        for entity in entities_of(root, EntityKind::Handle) {
            if entity.alias_of().is_some() {
                continue;
            }
            self.inspect_handle(entity)?;
            count += 1;
        }
        tracing::info!(count, "handles inspected");
        Ok(count)
    }

    /// Record one handle. No field analysis: handles are opaque.
    fn inspect_handle(&mut self, entity: RawEntity<'_>) -> Result<(), IngestError> {
        let raw_name = entity.name().ok_or_else(|| {
            IngestError::malformed(entity.kind, entity.position, "handle has no name")
        })?;
        let tag = entity.node.child_text("type").ok_or_else(|| {
            IngestError::malformed(
                entity.kind,
                entity.position,
                format!("handle '{raw_name}' has no underlying type"),
            )
        })?;

        let name = self.canonicalize(&raw_name, "handle", &raw_name)?;
        let handle = HandleDescriptor::new(
            name.clone(),
            raw_name.as_str(),
            HandleRepresentation::from_tag(&tag),
        );
        tracing::debug!(
            handle = %name,
            representation = ?handle.representation,
            "handle registered"
        );

        self.catalog.record_translation(raw_name.as_str(), name.clone());
        let displaced = self.catalog.insert_handle(handle);
        self.report_displaced(&name, &raw_name, EntityKind::Handle, displaced)
    }
}
