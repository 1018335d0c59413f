//! Domain layer for the Region Catalog subsystem.

pub mod builtin;
pub mod catalog;
pub mod categories;
