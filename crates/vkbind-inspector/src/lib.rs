//! Ingestion engine for vkbind.
//!
//! Walks a parsed descriptor and produces an
//! [`EntityCatalog`](vkbind_registry::EntityCatalog) in which every structure and union
//! carries its [`Transferability`](vkbind_core::Transferability).
//!
//! ```
//! use vkbind_core::descriptor::{TypeDecl, registry};
//! use vkbind_inspector::{InspectorConfig, inspect};
//!
//! let root = registry([
//!     TypeDecl::structure("VkOffset2D").member("int32_t", "x").member("int32_t", "y"),
//! ]);
//! let ingestion = inspect(&root, &InspectorConfig::default()).unwrap();
//! assert!(ingestion.catalog.is_directly_transferable("Offset2D"));
//! ```

mod config;
mod inspector;
mod passes;

pub use config::{DuplicatePolicy, InspectorConfig, OrderingPolicy};
pub use inspector::{EntityInspector, Ingestion, inspect};
