//! Ingestion configuration.

use vkbind_core::NamingConfig;

/// What to do when a structure embeds, by value, a structure processed after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderingPolicy {
    /// Require the processing order to already be a dependency order and fail with
    /// `CyclicOrUnorderedDeclaration` otherwise.
    #[default]
    Validate,
    /// Classify structures and unions in a dependency order derived from the
    /// descriptor, keeping declaration order wherever possible. Only cycles fail.
    Reorder,
}

/// What to do when two declarations share a canonical name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The later declaration replaces the earlier one and a warning is recorded.
    #[default]
    Overwrite,
    /// Abort ingestion with `DuplicateDeclaration`.
    Reject,
}

/// Everything one ingestion run is parameterized by.
///
/// # Example
///
/// ```
/// use vkbind_inspector::{DuplicatePolicy, InspectorConfig, OrderingPolicy};
/// use vkbind_core::NamingConfig;
///
/// let config = InspectorConfig::default()
///     .with_naming(NamingConfig::vulkan().with_primitive("int16_t", "Int16"))
///     .with_ordering(OrderingPolicy::Reorder)
///     .with_duplicates(DuplicatePolicy::Reject);
/// assert_eq!(config.ordering, OrderingPolicy::Reorder);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InspectorConfig {
    pub naming: NamingConfig,
    pub ordering: OrderingPolicy,
    pub duplicates: DuplicatePolicy,
}

impl InspectorConfig {
    pub fn new(naming: NamingConfig) -> Self {
        Self {
            naming,
            ..Self::default()
        }
    }

    pub fn with_naming(mut self, naming: NamingConfig) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }
}
