//! Workspace umbrella crate.
//!
//! Exposes feature flags that map onto the individual workspace crates
//! (`core-metadata`, `core-runtime`). Host applications can depend on
//! `songmeta-workspace`, enable `lyrics` and/or `composers`, and reach the
//! resolution engine without wiring each crate individually.

#[cfg(any(feature = "lyrics", feature = "composers"))]
pub use core_metadata as metadata;

#[cfg(feature = "desktop-shims")]
pub use core_runtime as runtime;
