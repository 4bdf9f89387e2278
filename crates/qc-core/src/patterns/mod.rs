//! Design patterns used across the workspace.

/// `LazyObject` — cached calculation with a dirty flag.
pub mod lazy_object;

/// Observable / Observer notification plumbing.
pub mod observable;
