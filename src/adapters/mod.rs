// Adapters layer: concrete implementations for external systems (filesystem, package format).

pub mod apkg;
pub mod storage;
