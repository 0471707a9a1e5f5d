//! Material loader with MTL file support
//!
//! Opens MTL files or streams, feeds them line by line to [`MtlParser`] and
//! resolves texture paths against the directory of the MTL file.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::material::Material;
use super::mtl_parser::{MtlParser, ParseOutcome};

/// Stream-level failures; these abort the parse
#[derive(Error, Debug)]
pub enum MtlError {
    /// The MTL file could not be opened
    #[error("Failed to open MTL file {path:?}: {source}")]
    Open {
        /// File that failed to open
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Reading the stream failed part way
    #[error("Failed to read MTL data from {path:?}: {source}")]
    Read {
        /// Source being read
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A single requested material does not exist in the file
    #[error("Material '{name}' not found in {path:?}")]
    MaterialNotFound {
        /// Requested material name
        name: String,
        /// File that was searched
        path: PathBuf,
    },
}

/// Material loader for MTL files and streams
pub struct MaterialLoader;

impl MaterialLoader {
    /// Load and parse every material of an MTL file
    ///
    /// # Arguments
    /// * `mtl_path` - Path to the .mtl file
    ///
    /// # Returns
    /// The registry and diagnostics; per-line problems are in the diagnostics
    pub fn load_file(mtl_path: impl AsRef<Path>) -> Result<ParseOutcome, MtlError> {
        let mtl_path = mtl_path.as_ref();
        log::info!("Parsing {}...", mtl_path.display());

        let file = File::open(mtl_path).map_err(|source| MtlError::Open {
            path: mtl_path.to_path_buf(),
            source,
        })?;

        let base_dir = Self::get_mtl_directory(mtl_path);
        Self::read_lines(BufReader::new(file), base_dir, mtl_path)
    }

    /// Parse MTL data from any buffered reader
    ///
    /// # Arguments
    /// * `reader` - Source of MTL text
    /// * `base_dir` - Directory relative texture paths are resolved against
    pub fn load_reader<R: BufRead>(reader: R, base_dir: impl Into<PathBuf>) -> Result<ParseOutcome, MtlError> {
        Self::read_lines(reader, base_dir.into(), Path::new("<stream>"))
    }

    /// Load a single material from an MTL file
    ///
    /// # Arguments
    /// * `mtl_path` - Path to the .mtl file
    /// * `material_name` - Name of the material to load (matches newmtl name)
    pub fn load_material(mtl_path: impl AsRef<Path>, material_name: &str) -> Result<Material, MtlError> {
        let mtl_path = mtl_path.as_ref();
        let outcome = Self::load_file(mtl_path)?;

        outcome.registry
            .get(material_name)
            .cloned()
            .ok_or_else(|| MtlError::MaterialNotFound {
                name: material_name.to_string(),
                path: mtl_path.to_path_buf(),
            })
    }

    /// Get the directory containing the MTL file (for resolving relative texture paths)
    ///
    /// Relative MTL paths are anchored at the current directory so resolved
    /// texture paths come out absolute.
    pub fn get_mtl_directory(mtl_path: &Path) -> PathBuf {
        let dir = mtl_path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        std::path::absolute(&dir).unwrap_or(dir)
    }

    /// Resolve a texture path relative to a base directory
    ///
    /// Texture paths in MTL files can be:
    /// - Relative to the MTL file directory
    /// - Absolute paths
    pub fn resolve_texture_path(base_dir: &Path, texture_path: &str) -> PathBuf {
        let texture_path = Path::new(texture_path);

        // If absolute, return as-is
        if texture_path.is_absolute() {
            return texture_path.to_path_buf();
        }

        // Otherwise, resolve relative to base directory
        base_dir.join(texture_path)
    }

    fn read_lines<R: BufRead>(mut reader: R, base_dir: PathBuf, source: &Path) -> Result<ParseOutcome, MtlError> {
        let mut parser = MtlParser::new(base_dir);
        let mut buffer = Vec::new();

        loop {
            buffer.clear();
            let read = reader.read_until(b'\n', &mut buffer).map_err(|source_error| MtlError::Read {
                path: source.to_path_buf(),
                source: source_error,
            })?;
            if read == 0 {
                break;
            }

            // Invalid UTF-8 only spoils its own line
            parser.parse_bytes(&buffer);
        }

        Ok(parser.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read, Write};
    use tempfile::{tempdir, NamedTempFile};
    use crate::assets::materials::diagnostics::DirectiveError;
    use crate::assets::materials::material::{ColorKind, MapChannel};
    use crate::foundation::math::Vec3;

    #[test]
    fn test_load_mtl_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ship.mtl");
        std::fs::write(&path, "# Test MTL file\nnewmtl SpaceshipMetal\nKd 0.8 0.8 0.9\nmap_Kd hull.png\n").unwrap();

        let outcome = MaterialLoader::load_file(&path).unwrap();
        let mat = outcome.registry.get("SpaceshipMetal").unwrap();

        assert_eq!(mat.color(ColorKind::Diffuse), Some(Vec3::new(0.8, 0.8, 0.9)));
        assert_eq!(mat.map(MapChannel::DiffuseMap), Some(dir.path().join("hull.png").as_path()));
        assert_eq!(outcome.diagnostics.line_count, 4);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempdir().unwrap();
        let result = MaterialLoader::load_file(dir.path().join("nope.mtl"));
        assert!(matches!(result, Err(MtlError::Open { .. })));
    }

    #[test]
    fn test_load_nonexistent_material() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "newmtl ExistingMat\nKd 1.0 0.0 0.0\n").unwrap();

        let result = MaterialLoader::load_material(temp_file.path(), "NonExistentMat");
        assert!(matches!(result, Err(MtlError::MaterialNotFound { .. })));
        assert!(result.unwrap_err().to_string().contains("not found"));

        let found = MaterialLoader::load_material(temp_file.path(), "ExistingMat").unwrap();
        assert_eq!(found.name, "ExistingMat");
    }

    #[test]
    fn test_non_ascii_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("Modèles_テクスチャ");
        std::fs::create_dir(&nested).unwrap();
        let path = nested.join("matériau.mtl");
        std::fs::write(&path, "newmtl Äpfel\nmap_d blätter.tga\n").unwrap();

        let outcome = MaterialLoader::load_file(&path).unwrap();
        let mat = outcome.registry.get("Äpfel").unwrap();
        assert_eq!(mat.map(MapChannel::Mask), Some(nested.join("blätter.tga").as_path()));
        assert!(mat.disable_embedded_alpha);
    }

    #[test]
    fn test_invalid_utf8_only_affects_its_line() {
        let data: &[u8] = b"newmtl A\nKd 1 \xff 1\nKs 0.5 0.5 0.5\r\n";
        let outcome = MaterialLoader::load_reader(Cursor::new(data), "/tex").unwrap();

        let mat = outcome.registry.get("A").unwrap();
        assert!(mat.color(ColorKind::Diffuse).is_none());
        assert_eq!(mat.color(ColorKind::Specular), Some(Vec3::new(0.5, 0.5, 0.5)));
        assert_eq!(outcome.diagnostics.warnings.len(), 1);
        assert_eq!(outcome.diagnostics.warnings[0].line, 2);
    }

    #[test]
    fn test_invalid_utf8_in_map_path_is_reported() {
        let data: &[u8] = b"newmtl A\nmap_Kd hull\xe9.png\n# caf\xe9\n";
        let outcome = MaterialLoader::load_reader(Cursor::new(data), "/tex").unwrap();

        let mat = outcome.registry.get("A").unwrap();
        assert_eq!(mat.map(MapChannel::DiffuseMap), Some(Path::new("/tex/hull\u{FFFD}.png")));
        assert_eq!(outcome.diagnostics.warnings.len(), 1);
        assert_eq!(outcome.diagnostics.warnings[0].line, 2);
        assert!(matches!(
            &outcome.diagnostics.warnings[0].error,
            DirectiveError::Malformed { keyword, .. } if keyword == "map_Kd"
        ));
    }

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::Other, "device gone"));
            }
            self.served = true;
            let chunk = b"newmtl A\nKd 1 1 1\n";
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn test_read_error_is_fatal() {
        let reader = BufReader::new(FailingReader { served: false });
        let result = MaterialLoader::load_reader(reader, "/tex");
        assert!(matches!(result, Err(MtlError::Read { .. })));
    }

    #[test]
    fn test_get_mtl_directory() {
        let dir = MaterialLoader::get_mtl_directory(Path::new("/assets/models/ship.mtl"));
        assert_eq!(dir, PathBuf::from("/assets/models"));

        let bare = MaterialLoader::get_mtl_directory(Path::new("ship.mtl"));
        assert!(bare.is_absolute());
    }

    #[test]
    fn test_resolve_texture_path() {
        let mtl_dir = Path::new("resources/models");

        // Relative path
        let resolved = MaterialLoader::resolve_texture_path(mtl_dir, "textures/diffuse.png");
        assert_eq!(resolved, PathBuf::from("resources/models/textures/diffuse.png"));

        // Absolute path (on Windows)
        #[cfg(windows)]
        {
            let absolute = "C:\\textures\\diffuse.png";
            let resolved = MaterialLoader::resolve_texture_path(mtl_dir, absolute);
            assert_eq!(resolved, PathBuf::from(absolute));
        }
    }
}
