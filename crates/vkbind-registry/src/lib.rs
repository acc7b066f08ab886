//! vkbind registry crate.
//!
//! - [`EntityCatalog`] / [`CatalogBuilder`]: handles, structures, aliases and the
//!   directly-transferable set
//! - [`DeclarationGraph`]: by-value dependencies used to validate or derive the
//!   classification order

mod catalog;
mod declaration_graph;

pub use catalog::{CatalogBuilder, EntityCatalog};
pub use declaration_graph::DeclarationGraph;
