//! Data ingestion and hero indexing
//!
//! CSV loading for historical games and the canonical hero registry.

pub mod loader;
pub mod registry;

pub use registry::HeroRegistry;
