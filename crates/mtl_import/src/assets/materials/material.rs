//! Material data model produced by the MTL parser
//!
//! Kinds are small closed enumerations defined by the MTL grammar alone. A
//! host adapter owns the mapping from these tags to its own property slots.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Image extensions that usually carry their own alpha channel
pub const EMBEDDED_ALPHA_EXTENSIONS: &[&str] = &["tif", "tiff", "png", "tga"];

bitflags! {
    /// Channels a material has data for
    ///
    /// A host should enable rendering of exactly the channels set here.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ChannelFlags: u8 {
        /// Ambient color or map (a "luminance" channel in most hosts)
        const AMBIENT = 1 << 0;
        /// Diffuse color or map
        const DIFFUSE = 1 << 1;
        /// Specular color or coefficient
        const SPECULAR = 1 << 2;
        /// Bump map
        const BUMP = 1 << 3;
        /// Mask (alpha) map
        const ALPHA = 1 << 4;
        /// Transparency value
        const TRANSPARENCY = 1 << 5;
    }
}

/// RGB color properties (`Ka`, `Kd`, `Ks`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColorKind {
    /// `Ka`
    Ambient,
    /// `Kd`
    Diffuse,
    /// `Ks`
    Specular,
}

impl ColorKind {
    /// Human-readable name
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ambient => "ambient color",
            Self::Diffuse => "diffuse color",
            Self::Specular => "specular color",
        }
    }

    /// Channel enabled when this color is set
    pub const fn channel(self) -> ChannelFlags {
        match self {
            Self::Ambient => ChannelFlags::AMBIENT,
            Self::Diffuse => ChannelFlags::DIFFUSE,
            Self::Specular => ChannelFlags::SPECULAR,
        }
    }

    /// Factor applied to every channel before storage (always 1.0)
    pub const fn multiplier(self) -> f32 {
        1.0
    }
}

impl fmt::Display for ColorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Single-value properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    /// `Ns`
    SpecularCoefficient,
    /// `d` or `Tr`, both write this slot
    Transparency,
}

impl ScalarKind {
    /// Human-readable name
    pub const fn label(self) -> &'static str {
        match self {
            Self::SpecularCoefficient => "specular coefficient",
            Self::Transparency => "transparency",
        }
    }

    /// Channel enabled when this value is set
    pub const fn channel(self) -> ChannelFlags {
        match self {
            Self::SpecularCoefficient => ChannelFlags::SPECULAR,
            Self::Transparency => ChannelFlags::TRANSPARENCY,
        }
    }

    /// Normalization factor applied once, before storage
    ///
    /// `Ns` is written in `[0, 1000]`; stored values use `[0, 10]`.
    /// Transparency is stored as written.
    pub const fn multiplier(self) -> f32 {
        match self {
            Self::SpecularCoefficient => 0.01,
            Self::Transparency => 1.0,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Texture map channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MapChannel {
    /// `map_Ka`
    AmbientMap,
    /// `map_Kd`
    DiffuseMap,
    /// `map_bump`, `map_Bump`, `bump`
    BumpMap,
    /// `map_d`
    Mask,
}

impl MapChannel {
    /// Human-readable name
    pub const fn label(self) -> &'static str {
        match self {
            Self::AmbientMap => "ambient map",
            Self::DiffuseMap => "diffuse map",
            Self::BumpMap => "bump map",
            Self::Mask => "mask",
        }
    }

    /// Channel enabled when this map is set
    pub const fn channel(self) -> ChannelFlags {
        match self {
            Self::AmbientMap => ChannelFlags::AMBIENT,
            Self::DiffuseMap => ChannelFlags::DIFFUSE,
            Self::BumpMap => ChannelFlags::BUMP,
            Self::Mask => ChannelFlags::ALPHA,
        }
    }
}

impl fmt::Display for MapChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// True when `path` ends in `.` plus one of [`EMBEDDED_ALPHA_EXTENSIONS`] (case-insensitive)
///
/// A plain suffix match, so dot-files such as `.png` count too.
pub fn has_embedded_alpha_extension(path: &Path) -> bool {
    let name = path.to_string_lossy().to_ascii_lowercase();
    EMBEDDED_ALPHA_EXTENSIONS
        .iter()
        .any(|ext| name.strip_suffix(ext).is_some_and(|stem| stem.ends_with('.')))
}

/// One named surface material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name (the `newmtl` argument)
    pub name: String,
    /// Colors by kind, channels unclamped
    pub colors: BTreeMap<ColorKind, Vec3>,
    /// Scalars by kind, already multiplied by [`ScalarKind::multiplier`]
    pub scalars: BTreeMap<ScalarKind, f32>,
    /// Texture paths by channel, resolved against the MTL directory
    pub maps: BTreeMap<MapChannel, PathBuf>,
    /// Channels that received data
    pub active_channels: ChannelFlags,
    /// Set when a mask was assigned from an image format with its own alpha
    pub disable_embedded_alpha: bool,
}

impl Material {
    /// Create an empty material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colors: BTreeMap::new(),
            scalars: BTreeMap::new(),
            maps: BTreeMap::new(),
            active_channels: ChannelFlags::empty(),
            disable_embedded_alpha: false,
        }
    }

    /// Set a color, overwriting any earlier value of the same kind
    pub fn set_color(&mut self, kind: ColorKind, color: Vec3) {
        self.colors.insert(kind, color * kind.multiplier());
        self.active_channels |= kind.channel();
    }

    /// Set a scalar from its raw MTL value
    ///
    /// The kind's multiplier is applied here and nowhere else.
    pub fn set_scalar(&mut self, kind: ScalarKind, raw: f32) {
        self.scalars.insert(kind, raw * kind.multiplier());
        self.active_channels |= kind.channel();
    }

    /// Set a texture map, overwriting any earlier path for the channel
    pub fn set_map(&mut self, channel: MapChannel, path: PathBuf) {
        if channel == MapChannel::Mask && has_embedded_alpha_extension(&path) {
            self.disable_embedded_alpha = true;
        }
        self.maps.insert(channel, path);
        self.active_channels |= channel.channel();
    }

    /// Color of the given kind, if set
    pub fn color(&self, kind: ColorKind) -> Option<Vec3> {
        self.colors.get(&kind).copied()
    }

    /// Stored (normalized) scalar of the given kind, if set
    pub fn scalar(&self, kind: ScalarKind) -> Option<f32> {
        self.scalars.get(&kind).copied()
    }

    /// Texture path of the given channel, if set
    pub fn map(&self, channel: MapChannel) -> Option<&Path> {
        self.maps.get(&channel).map(PathBuf::as_path)
    }

    /// Whether any data enabled `channel`
    pub fn is_active(&self, channel: ChannelFlags) -> bool {
        self.active_channels.contains(channel)
    }

    /// Whether nothing has been assigned yet
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.scalars.is_empty() && self.maps.is_empty()
    }
}

/// Ordered collection of materials keyed by name
///
/// Iteration follows first-definition order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Material>", into = "Vec<Material>")]
pub struct MaterialRegistry {
    materials: Vec<Material>,
    index: HashMap<String, usize>,
}

impl MaterialRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a material by name, creating it if absent
    ///
    /// The flag is `true` when the material was created by this call.
    pub fn get_or_insert(&mut self, name: &str) -> (&mut Material, bool) {
        match self.index.get(name).copied() {
            Some(slot) => (&mut self.materials[slot], false),
            None => {
                let slot = self.materials.len();
                self.index.insert(name.to_string(), slot);
                self.materials.push(Material::new(name));
                (&mut self.materials[slot], true)
            }
        }
    }

    /// Look up a material by name
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.index.get(name).map(|&slot| &self.materials[slot])
    }

    /// Look up a material by name for modification
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Material> {
        let slot = *self.index.get(name)?;
        self.materials.get_mut(slot)
    }

    /// Whether a material with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the registry holds no materials
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Materials in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Material> {
        self.materials.iter()
    }

    /// Material names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.iter().map(|material| material.name.as_str())
    }

}

impl From<Vec<Material>> for MaterialRegistry {
    /// Later entries with a repeated name replace earlier ones in place.
    fn from(list: Vec<Material>) -> Self {
        let mut registry = Self::new();
        for material in list {
            let (slot, _) = registry.get_or_insert(&material.name);
            *slot = material;
        }
        registry
    }
}

impl From<MaterialRegistry> for Vec<Material> {
    fn from(registry: MaterialRegistry) -> Self {
        registry.materials
    }
}

impl<'a> IntoIterator for &'a MaterialRegistry {
    type Item = &'a Material;
    type IntoIter = std::slice::Iter<'a, Material>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
