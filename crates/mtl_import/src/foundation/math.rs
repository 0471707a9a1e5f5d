//! Math utilities and types
//!
//! Material colors are carried as plain 3D vectors (r, g, b) without clamping.

pub use nalgebra::Vector3;

/// 3D vector type, used for RGB triples
pub type Vec3 = Vector3<f32>;
