//! Pass 0: alias registration.

use vkbind_core::descriptor::type_entities;
use vkbind_core::{Element, IngestError};

use crate::inspector::EntityInspector;

impl EntityInspector<'_> {
    /// Register every `alias="..."` entry of a known category.
    ///
    /// Aliases carry no layout of their own, so they are recorded up front and skipped
    /// by the later passes.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(crate) fn register_aliases(&mut self, root: &Element) -> Result<usize, IngestError> {
        let mut count = 0;
        for entity in type_entities(root) {
            let Some(target) = entity.alias_of() else {
                continue;
            };
            let raw_name = entity.name().ok_or_else(|| {
                IngestError::malformed(entity.kind, entity.position, "alias has no name")
            })?;

            let label = entity.kind.category();
            let alias = self.canonicalize(&raw_name, label, &raw_name)?;
            let target = self.canonicalize(target.trim(), label, &raw_name)?;

            tracing::debug!(alias = %alias, target = %target, "alias registered");
            self.catalog.record_translation(raw_name, alias.clone());
            self.catalog.insert_alias(alias, target);
            count += 1;
        }
        Ok(count)
    }
}
