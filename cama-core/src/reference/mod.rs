//! Lookup structures over a municipality's reference tables.

pub mod index;

pub use index::ReferenceIndex;
