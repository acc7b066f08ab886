//! Passes 2 and 3: structures and unions.
//!
//! Both kinds are parsed up front, checked (or sorted) against their by-value
//! dependencies, then classified one by one. A field taints its owner when it is a
//! pointer, an array, a handle, a structure that itself needs marshalling, or a type
//! that is not known to be transferable. The first tainting field becomes the
//! recorded reason.

use rustc_hash::FxHashMap;
use vkbind_core::descriptor::entities_of;
use vkbind_core::{
    CanonicalName, Diagnostic, DiagnosticCode, Element, EntityKind, EntityRef, FieldDecl,
    FieldShape, IngestError, MarshalCause, MarshalReason, RawEntity, StructDescriptor,
    Transferability,
};
use vkbind_registry::DeclarationGraph;

use crate::config::{DuplicatePolicy, OrderingPolicy};
use crate::inspector::EntityInspector;

/// A structure or union whose fields are parsed but not yet classified.
#[derive(Debug)]
struct PendingAggregate {
    raw_name: String,
    name: CanonicalName,
    kind: EntityKind,
    fields: Vec<FieldDecl>,
}

impl EntityInspector<'_> {
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(crate) fn inspect_structures(&mut self, root: &Element) -> Result<usize, IngestError> {
        let mut pending = Vec::new();
        for kind in [EntityKind::Struct, EntityKind::Union] {
            for entity in entities_of(root, kind) {
                if entity.alias_of().is_some() {
                    continue;
                }
                pending.push(self.parse_aggregate(entity)?);
            }
        }

        let order = self.classification_order(&pending)?;
        let mut slots: Vec<Option<PendingAggregate>> = pending.into_iter().map(Some).collect();
        let mut count = 0;
        for index in order {
            if let Some(aggregate) = slots[index].take() {
                self.classify(aggregate)?;
                count += 1;
            }
        }

        tracing::info!(count, "structures and unions inspected");
        Ok(count)
    }

    fn parse_aggregate(&mut self, entity: RawEntity<'_>) -> Result<PendingAggregate, IngestError> {
        let raw_name = entity.name().ok_or_else(|| {
            IngestError::malformed(
                entity.kind,
                entity.position,
                format!("{} has no name", entity.kind),
            )
        })?;
        let name = self.canonicalize(&raw_name, entity.kind.category(), &raw_name)?;

        let mut fields = Vec::new();
        for (index, member) in entity.members().enumerate() {
            fields.push(self.parse_field(&entity, &raw_name, index, member)?);
        }

        Ok(PendingAggregate {
            raw_name,
            name,
            kind: entity.kind,
            fields,
        })
    }

    fn parse_field(
        &mut self,
        owner: &RawEntity<'_>,
        owner_name: &str,
        index: usize,
        member: &Element,
    ) -> Result<FieldDecl, IngestError> {
        let required = |tag: &str| {
            member
                .child_text(tag)
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty())
                .ok_or_else(|| {
                    IngestError::malformed(
                        owner.kind,
                        owner.position,
                        format!("member {index} of '{owner_name}' has no {tag}"),
                    )
                })
        };
        let raw_type = required("type")?;
        let name = required("name")?;

        // Comments may contain '*' or '[' and never describe the layout.
        let shape = FieldShape::parse(&member.text_excluding(&["comment"]));
        let type_name = self.canonicalize(&raw_type, "member", owner_name)?;

        Ok(FieldDecl {
            name,
            raw_type,
            type_name,
            shape,
        })
    }

    /// Indices into `pending`, in the order they must be classified.
    ///
    /// A redeclared name is placed in the graph at its last declaration, the one that
    /// stays in the catalog, so dependents are ordered against the surviving verdict.
    fn classification_order(
        &self,
        pending: &[PendingAggregate],
    ) -> Result<Vec<usize>, IngestError> {
        let mut surviving: FxHashMap<&str, usize> = FxHashMap::default();
        for (index, aggregate) in pending.iter().enumerate() {
            let Some(previous) = surviving.insert(aggregate.name.as_str(), index) else {
                continue;
            };
            if self.config.duplicates == DuplicatePolicy::Reject {
                return Err(IngestError::DuplicateDeclaration {
                    name: aggregate.name.clone(),
                    kind: aggregate.kind,
                    previous: pending[previous].kind,
                });
            }
        }
        let mut survivors: Vec<usize> = surviving.into_values().collect();
        survivors.sort_unstable();
        let survivors: Vec<&PendingAggregate> =
            survivors.into_iter().map(|index| &pending[index]).collect();

        let mut graph = DeclarationGraph::new();
        for aggregate in &survivors {
            graph.add_declaration(aggregate.name.clone());
        }
        for aggregate in &survivors {
            for field in aggregate.fields.iter().filter(|f| f.shape.is_value()) {
                let dependency = self.catalog.follow_aliases(field.type_name.as_str());
                graph.add_dependency(aggregate.name.as_str(), dependency);
            }
        }

        match self.config.ordering {
            OrderingPolicy::Validate => {
                graph.check_order()?;
                Ok((0..pending.len()).collect())
            }
            OrderingPolicy::Reorder => {
                let sorted = graph.stable_order()?;
                let mut by_name: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
                for (index, aggregate) in pending.iter().enumerate() {
                    by_name
                        .entry(aggregate.name.as_str())
                        .or_default()
                        .push(index);
                }
                let order: Vec<usize> = sorted
                    .iter()
                    .flat_map(|name| by_name.remove(name.as_str()).unwrap_or_default())
                    .collect();
                tracing::debug!(aggregates = order.len(), "declarations reordered");
                Ok(order)
            }
        }
    }

    fn classify(&mut self, aggregate: PendingAggregate) -> Result<(), IngestError> {
        let mut reason = None;
        for field in &aggregate.fields {
            let Some(cause) = self.field_taint(field) else {
                continue;
            };
            if let MarshalCause::Unresolved(ty) = &cause {
                tracing::debug!(
                    owner = %aggregate.name,
                    field = %field.name,
                    field_type = %ty,
                    "field type is not known to be transferable"
                );
                self.diagnostics.push(
                    Diagnostic::info(
                        DiagnosticCode::UnresolvedFieldType,
                        format!(
                            "type '{ty}' of field '{}' is not known to be directly transferable",
                            field.name
                        ),
                    )
                    .in_entity(aggregate.raw_name.as_str()),
                );
            }
            if reason.is_none() {
                reason = Some(MarshalReason {
                    field: field.name.clone(),
                    cause,
                });
            }
        }

        let transferability = match reason {
            None => Transferability::DirectlyTransferable,
            Some(reason) => Transferability::RequiresMarshalling(reason),
        };
        tracing::debug!(
            name = %aggregate.name,
            kind = %aggregate.kind,
            transferable = transferability.is_directly_transferable(),
            "aggregate classified"
        );

        let PendingAggregate {
            raw_name,
            name,
            kind,
            fields,
        } = aggregate;
        self.catalog.record_translation(raw_name.as_str(), name.clone());
        let displaced = self.catalog.insert_struct(StructDescriptor {
            name: name.clone(),
            raw_name: raw_name.clone(),
            kind,
            fields,
            transferability,
        });
        self.report_displaced(&name, &raw_name, kind, displaced)
    }

    /// Why `field` keeps its owner from being directly transferable, if it does.
    fn field_taint(&self, field: &FieldDecl) -> Option<MarshalCause> {
        match field.shape {
            FieldShape::Pointer { .. } => return Some(MarshalCause::Pointer),
            FieldShape::Array { .. } => return Some(MarshalCause::Array),
            FieldShape::Value => {}
        }

        match self.catalog.resolve(field.type_name.as_str()) {
            Some(EntityRef::Handle(handle)) => Some(MarshalCause::Handle(handle.name.clone())),
            Some(EntityRef::Struct(inner)) if inner.needs_marshalling() => {
                Some(MarshalCause::MarshalledAggregate(inner.name.clone()))
            }
            _ if self.catalog.is_directly_transferable(field.type_name.as_str()) => None,
            _ => Some(MarshalCause::Unresolved(field.type_name.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{InspectorConfig, OrderingPolicy, inspect};
    use vkbind_core::descriptor::{TypeDecl, registry};
    use vkbind_core::{
        DiagnosticCode, Element, EntityKind, IngestError, MarshalCause, OrderViolation,
    };

    fn config() -> InspectorConfig {
        InspectorConfig::default()
    }

    #[test]
    fn scalar_only_struct_is_transferable() {
        let root = registry([TypeDecl::structure("VkExtent2D")
            .member("uint32_t", "width")
            .member("uint32_t", "height")]);
        let ingestion = inspect(&root, &config()).unwrap();

        let extent = ingestion.catalog.structure("Extent2D").unwrap();
        assert!(extent.is_directly_transferable());
        assert_eq!(extent.fields.len(), 2);
        assert_eq!(extent.fields[0].type_name, "UInt32");
        assert!(ingestion.catalog.is_directly_transferable("Extent2D"));
    }

    #[test]
    fn empty_struct_is_transferable() {
        let root = registry([TypeDecl::structure("VkEmpty")]);
        let ingestion = inspect(&root, &config()).unwrap();
        assert!(ingestion.catalog.is_directly_transferable("Empty"));
    }

    #[test]
    fn first_tainting_field_is_the_reason() {
        let root = registry([TypeDecl::structure("VkMixed")
            .member("uint32_t", "count")
            .array_member("float", "weights", "4")
            .pointer_member("void", "pNext")]);
        let ingestion = inspect(&root, &config()).unwrap();

        let mixed = ingestion.catalog.structure("Mixed").unwrap();
        let reason = mixed.transferability.reason().unwrap();
        assert_eq!(reason.field, "weights");
        assert_eq!(reason.cause, MarshalCause::Array);
    }

    #[test]
    fn handle_field_taints_owner() {
        let root = registry([
            TypeDecl::handle("VkBuffer", "VK_DEFINE_NON_DISPATCHABLE_HANDLE"),
            TypeDecl::structure("VkBufferBinding").member("VkBuffer", "buffer"),
        ]);
        let ingestion = inspect(&root, &config()).unwrap();

        let binding = ingestion.catalog.structure("BufferBinding").unwrap();
        assert_eq!(
            binding.transferability.reason().unwrap().cause,
            MarshalCause::Handle("Buffer".into())
        );
    }

    #[test]
    fn taint_propagates_through_nesting() {
        let root = registry([
            TypeDecl::structure("VkInner").pointer_member("void", "pData"),
            TypeDecl::structure("VkOuter").member("VkInner", "inner"),
        ]);
        let ingestion = inspect(&root, &config()).unwrap();

        let outer = ingestion.catalog.structure("Outer").unwrap();
        assert_eq!(
            outer.transferability.reason().unwrap().cause,
            MarshalCause::MarshalledAggregate("Inner".into())
        );
    }

    #[test]
    fn unknown_field_type_is_reported() {
        let root = registry([
            TypeDecl::structure("VkImageCreateInfo").member("VkFormat", "format"),
        ]);
        let ingestion = inspect(&root, &config()).unwrap();

        let info = ingestion.catalog.structure("ImageCreateInfo").unwrap();
        assert_eq!(
            info.transferability.reason().unwrap().cause,
            MarshalCause::Unresolved("Format".into())
        );
        assert!(ingestion.diagnostics.has_code(DiagnosticCode::UnresolvedFieldType));
    }

    #[test]
    fn comment_does_not_change_shape() {
        let member = Element::new("member")
            .with_text_child("type", "uint32_t")
            .with_text(" ")
            .with_text_child("name", "flags")
            .with_text_child("comment", "bitmask of *Flags, see [spec]");
        let root = registry([TypeDecl::structure("VkCommented").member_with(member)]);
        let ingestion = inspect(&root, &config()).unwrap();
        assert!(ingestion.catalog.is_directly_transferable("Commented"));
    }

    #[test]
    fn member_without_type_is_malformed() {
        let member = Element::new("member").with_text_child("name", "x");
        let root = registry([TypeDecl::structure("VkBroken").member_with(member)]);
        let err = inspect(&root, &config()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MalformedEntity {
                kind: EntityKind::Struct,
                ..
            }
        ));
    }

    #[test]
    fn union_may_embed_later_struct() {
        let root = registry([
            TypeDecl::union("VkClearColorValue")
                .array_member("float", "float32", "4"),
            TypeDecl::structure("VkClearDepthStencilValue")
                .member("float", "depth")
                .member("uint32_t", "stencil"),
            TypeDecl::union("VkClearValue")
                .member("VkClearColorValue", "color")
                .member("VkClearDepthStencilValue", "depthStencil"),
        ]);
        let ingestion = inspect(&root, &config()).unwrap();

        let value = ingestion.catalog.structure("ClearValue").unwrap();
        assert!(value.is_union());
        assert_eq!(
            value.transferability.reason().unwrap().cause,
            MarshalCause::MarshalledAggregate("ClearColorValue".into())
        );
    }

    #[test]
    fn forward_reference_is_rejected_or_reordered() {
        let root = registry([
            TypeDecl::structure("VkOuter").member("VkInner", "inner"),
            TypeDecl::structure("VkInner").member("uint32_t", "x"),
        ]);

        let err = inspect(&root, &config()).unwrap_err();
        assert_eq!(
            err,
            IngestError::CyclicOrUnorderedDeclaration {
                entity: "Outer".into(),
                dependency: "Inner".into(),
                violation: OrderViolation::ForwardReference,
            }
        );

        let reorder = config().with_ordering(OrderingPolicy::Reorder);
        let ingestion = inspect(&root, &reorder).unwrap();
        assert!(ingestion.catalog.is_directly_transferable("Outer"));
        let names: Vec<_> = ingestion
            .catalog
            .structures()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, ["Inner", "Outer"]);
    }

    #[test]
    fn cycle_fails_under_both_policies() {
        let root = registry([
            TypeDecl::structure("VkA").member("VkB", "b"),
            TypeDecl::structure("VkB").member("VkA", "a"),
        ]);
        for ordering in [OrderingPolicy::Validate, OrderingPolicy::Reorder] {
            let config = config().with_ordering(ordering);
            let err = inspect(&root, &config).unwrap_err();
            assert!(matches!(
                err,
                IngestError::CyclicOrUnorderedDeclaration {
                    violation: OrderViolation::Cycle(_),
                    ..
                }
            ));
        }
    }

    #[test]
    fn pointer_self_reference_is_not_a_dependency() {
        let root = registry([TypeDecl::structure("VkBaseOutStructure")
            .member("uint32_t", "sType")
            .pointer_member("VkBaseOutStructure", "pNext")]);
        let ingestion = inspect(&root, &config()).unwrap();
        assert!(!ingestion.catalog.is_directly_transferable("BaseOutStructure"));
    }

    #[test]
    fn aliased_dependency_is_followed() {
        let root = registry([
            TypeDecl::alias(EntityKind::Struct, "VkInnerKHR", "VkInner"),
            TypeDecl::structure("VkOuter").member("VkInnerKHR", "inner"),
            TypeDecl::structure("VkInner").member("uint32_t", "x"),
        ]);
        let err = inspect(&root, &config()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::CyclicOrUnorderedDeclaration {
                violation: OrderViolation::ForwardReference,
                ..
            }
        ));
    }
}
