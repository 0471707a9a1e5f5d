//! Console host adapter
//!
//! A stand-in scene that keeps imported materials in memory and logs every
//! call in the shape a DCC host would receive them: named property slots,
//! "use channel" toggles and one bitmap node per texture.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mtl_import::prelude::*;

/// Host slot names for each kind
fn color_slot(kind: ColorKind) -> &'static str {
    match kind {
        ColorKind::Ambient => "luminance.color",
        ColorKind::Diffuse => "color.color",
        ColorKind::Specular => "specular.color",
    }
}

fn scalar_slot(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::SpecularCoefficient => "specular.width",
        ScalarKind::Transparency => "transparency.brightness",
    }
}

fn texture_slot(channel: MapChannel) -> &'static str {
    match channel {
        MapChannel::AmbientMap => "luminance.shader",
        MapChannel::DiffuseMap => "color.shader",
        MapChannel::BumpMap => "bump.shader",
        MapChannel::Mask => "alpha.shader",
    }
}

/// One material as the host stores it
#[derive(Debug, Default)]
pub struct HostMaterial {
    /// Material name
    pub name: String,
    /// Slot name to formatted value
    pub slots: BTreeMap<&'static str, String>,
    /// Bitmap nodes by slot
    pub bitmaps: BTreeMap<&'static str, PathBuf>,
    /// Enabled channels
    pub enabled: ChannelFlags,
    /// Whether the alpha channel reads the image's own alpha
    pub image_alpha: bool,
}

/// In-memory host that logs every mutation
#[derive(Debug, Default)]
pub struct LogHost {
    materials: Vec<HostMaterial>,
    open_groups: usize,
}

impl LogHost {
    /// Create an empty host scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Materials currently in the scene
    pub fn materials(&self) -> &[HostMaterial] {
        &self.materials
    }

    fn material(&mut self, handle: usize) -> &mut HostMaterial {
        &mut self.materials[handle]
    }
}

impl MaterialHost for LogHost {
    type Handle = usize;
    type Error = std::convert::Infallible;

    fn begin_import(&mut self) {
        self.open_groups += 1;
        log::debug!("Host: begin undo group");
    }

    fn find_or_create_material(&mut self, name: &str) -> Result<usize, Self::Error> {
        if let Some(slot) = self.materials.iter().position(|m| m.name == name) {
            return Ok(slot);
        }
        log::info!("Host: creating material '{}'", name);
        self.materials.push(HostMaterial {
            name: name.to_string(),
            image_alpha: true,
            ..Default::default()
        });
        Ok(self.materials.len() - 1)
    }

    fn set_color(&mut self, material: &usize, kind: ColorKind, color: Vec3) -> Result<(), Self::Error> {
        let target = self.material(*material);
        let value = format!("({}, {}, {})", color.x, color.y, color.z);
        log::info!("  -> Inserting {} as {} of material '{}'", value, kind, target.name);
        target.slots.insert(color_slot(kind), value);
        Ok(())
    }

    fn set_scalar(&mut self, material: &usize, kind: ScalarKind, value: f32) -> Result<(), Self::Error> {
        let target = self.material(*material);
        log::info!("  -> Inserting {} as {} of material '{}'", value, kind, target.name);
        target.slots.insert(scalar_slot(kind), value.to_string());
        Ok(())
    }

    fn enable_channel(&mut self, material: &usize, channel: ChannelFlags) -> Result<(), Self::Error> {
        self.material(*material).enabled |= channel;
        Ok(())
    }

    fn attach_texture(&mut self, material: &usize, channel: MapChannel, path: &Path) -> Result<(), Self::Error> {
        let target = self.material(*material);
        log::info!(
            "  -> Inserting '{}' into channel {} of material '{}'",
            path.display(), channel, target.name
        );
        target.bitmaps.insert(texture_slot(channel), path.to_path_buf());
        Ok(())
    }

    fn disable_embedded_alpha(&mut self, material: &usize) -> Result<(), Self::Error> {
        self.material(*material).image_alpha = false;
        Ok(())
    }

    fn end_import(&mut self) {
        self.open_groups = self.open_groups.saturating_sub(1);
        log::debug!("Host: end undo group");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_receives_registry() {
        let outcome = MtlParser::parse_str(
            "newmtl Glass\nKd 0.9 0.9 1\nd 0.2\nmap_d glass.png\n",
            "/scene",
        );
        let mut host = LogHost::new();

        let summary = apply_registry(&outcome.registry, &mut host).unwrap();
        assert_eq!(summary.materials, 1);
        assert_eq!(host.open_groups, 0);

        let glass = &host.materials()[0];
        assert_eq!(glass.name, "Glass");
        assert_eq!(glass.slots.get("transparency.brightness").map(String::as_str), Some("0.2"));
        assert_eq!(glass.bitmaps.get("alpha.shader"), Some(&PathBuf::from("/scene/glass.png")));
        assert!(glass.enabled.contains(ChannelFlags::DIFFUSE | ChannelFlags::TRANSPARENCY | ChannelFlags::ALPHA));
        assert!(!glass.image_alpha);
    }

    #[test]
    fn test_texture_attached_without_touching_disk() {
        let outcome = MtlParser::parse_str("newmtl Hull\nmap_Kd missing/hull.png\n", "/no/such/dir");
        let mut host = LogHost::new();

        apply_registry(&outcome.registry, &mut host).unwrap();
        assert_eq!(
            host.materials()[0].bitmaps.get("color.shader"),
            Some(&PathBuf::from("/no/such/dir/missing/hull.png"))
        );
    }

    #[test]
    fn test_existing_material_is_reused() {
        let mut host = LogHost::new();
        let first = MtlParser::parse_str("newmtl A\nKd 1 0 0\n", "/");
        let second = MtlParser::parse_str("newmtl A\nKs 1 1 1\n", "/");

        apply_registry(&first.registry, &mut host).unwrap();
        apply_registry(&second.registry, &mut host).unwrap();

        assert_eq!(host.materials().len(), 1);
        assert_eq!(host.materials()[0].slots.len(), 2);
    }
}
