//! The ingestion passes, each an `impl` block on [`EntityInspector`](crate::EntityInspector).
//!
//! - [`aliases`]: alternate names, registered before anything else
//! - [`handles`]: opaque handles
//! - [`structures`]: structures then unions, ordered and classified

mod aliases;
mod handles;
mod structures;
