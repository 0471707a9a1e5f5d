//! Material parsing subsystem
//!
//! Line classifier, material builder, file front end and the host adapter
//! boundary for Wavefront MTL files.

pub mod mtl_lexer;
pub mod material;
pub mod diagnostics;
pub mod mtl_parser;
pub mod material_loader;
pub mod host;

pub use mtl_lexer::{classify_line, LineKind, MtlLine};
pub use material::{ChannelFlags, ColorKind, MapChannel, Material, MaterialRegistry, ScalarKind};
pub use diagnostics::{DirectiveError, ParseDiagnostics, ParseWarning};
pub use mtl_parser::{MtlParser, ParseOutcome};
pub use material_loader::{MaterialLoader, MtlError};
pub use host::{apply_registry, ApplySummary, MaterialHost};

#[cfg(test)]
mod tests;
