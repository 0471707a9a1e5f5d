//! # MTL Import
//!
//! Parser for Wavefront `.mtl` material libraries.
//!
//! ## Features
//!
//! - **Error tolerant**: a malformed line is recorded as a diagnostic and
//!   skipped, the rest of the file still parses
//! - **Plain data model**: named materials with colors, scalars, texture
//!   paths and per-channel activation flags
//! - **Host adapter**: [`MaterialHost`](assets::materials::MaterialHost)
//!   lets any renderer or scene graph receive the parsed materials
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mtl_import::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let outcome = MaterialLoader::load_file("models/ship.mtl")?;
//!     for warning in &outcome.diagnostics.warnings {
//!         eprintln!("{}", warning);
//!     }
//!     for material in &outcome.registry {
//!         println!("{}: {:?}", material.name, material.active_channels);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod foundation;
pub mod config;
pub mod assets;

/// Common imports for importer users
pub mod prelude {
    pub use crate::{
        assets::materials::{
            apply_registry, ApplySummary, ChannelFlags, ColorKind, DirectiveError, MapChannel,
            Material, MaterialHost, MaterialLoader, MaterialRegistry, MtlError, MtlParser,
            ParseDiagnostics, ParseOutcome, ParseWarning, ScalarKind,
        },
        config::{Config, ConfigError, ImportConfig},
        foundation::math::Vec3,
    };
}
