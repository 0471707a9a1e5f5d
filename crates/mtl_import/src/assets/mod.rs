//! Asset loading

pub mod materials;

pub use materials::{
    MtlParser, ParseOutcome,
    MaterialLoader, MtlError,
    MaterialRegistry, Material,
    MaterialHost, apply_registry,
};
