//! Host adapter boundary
//!
//! The parser never touches a scene graph. A host (a renderer, a DCC tool, an
//! editor) implements [`MaterialHost`] and [`apply_registry`] walks a parsed
//! registry, calling the host once per populated property, channel and map.

use std::path::Path;

use super::material::{ChannelFlags, ColorKind, MapChannel, MaterialRegistry, ScalarKind};
use crate::foundation::math::Vec3;

/// Receiver of parsed materials
///
/// Values arrive already normalized. Implementations map the closed kind
/// enumerations onto their own property slots.
pub trait MaterialHost {
    /// Host-side reference to one material
    type Handle;
    /// Host failure type
    type Error;

    /// Called once before any material is touched (e.g. open an undo group)
    fn begin_import(&mut self) {}

    /// Find a material by name, creating it when absent
    fn find_or_create_material(&mut self, name: &str) -> Result<Self::Handle, Self::Error>;

    /// Set a color property
    fn set_color(&mut self, material: &Self::Handle, kind: ColorKind, color: Vec3) -> Result<(), Self::Error>;

    /// Set a scalar property
    fn set_scalar(&mut self, material: &Self::Handle, kind: ScalarKind, value: f32) -> Result<(), Self::Error>;

    /// Turn on one channel
    fn enable_channel(&mut self, material: &Self::Handle, channel: ChannelFlags) -> Result<(), Self::Error>;

    /// Create an image reference for `path` and bind it to `channel`
    fn attach_texture(&mut self, material: &Self::Handle, channel: MapChannel, path: &Path) -> Result<(), Self::Error>;

    /// Stop the host from using the mask image's own alpha
    fn disable_embedded_alpha(&mut self, material: &Self::Handle) -> Result<(), Self::Error>;

    /// Called once after the last material, also after a failure
    fn end_import(&mut self) {}
}

/// What [`apply_registry`] handed to the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Materials found or created
    pub materials: usize,
    /// Color and scalar properties set
    pub properties: usize,
    /// Textures attached
    pub textures: usize,
}

/// Hand every populated entry of `registry` to `host`, in registry order
///
/// Stops at the first host error. `begin_import` and `end_import` are
/// always paired.
pub fn apply_registry<H: MaterialHost>(registry: &MaterialRegistry, host: &mut H) -> Result<ApplySummary, H::Error> {
    host.begin_import();
    let result = apply_materials(registry, host);
    host.end_import();

    if let Ok(summary) = &result {
        log::info!(
            "Applied {} materials ({} properties, {} textures) to host",
            summary.materials, summary.properties, summary.textures
        );
    }
    result
}

fn apply_materials<H: MaterialHost>(registry: &MaterialRegistry, host: &mut H) -> Result<ApplySummary, H::Error> {
    let mut summary = ApplySummary::default();

    for material in registry {
        let handle = host.find_or_create_material(&material.name)?;
        summary.materials += 1;

        for (&kind, &color) in &material.colors {
            host.set_color(&handle, kind, color)?;
            summary.properties += 1;
        }

        for (&kind, &value) in &material.scalars {
            host.set_scalar(&handle, kind, value)?;
            summary.properties += 1;
        }

        for (&channel, path) in &material.maps {
            host.attach_texture(&handle, channel, path)?;
            summary.textures += 1;
        }

        for channel in material.active_channels.iter() {
            host.enable_channel(&handle, channel)?;
        }

        if material.disable_embedded_alpha {
            host.disable_embedded_alpha(&handle)?;
        }
    }

    Ok(summary)
}
