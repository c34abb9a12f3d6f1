//! Serving: win-rate prediction and pick/ban recommendation

pub mod engine;

pub use engine::DraftEngine;
