//! MTL (Material Template Library) file parser
//!
//! Drives classified lines through a two-state machine (no current material /
//! inside a material) and accumulates a [`MaterialRegistry`]. A bad line is
//! recorded in [`ParseDiagnostics`] and skipped; it never ends the parse.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::diagnostics::{DirectiveError, ParseDiagnostics};
use super::material::{ColorKind, MapChannel, Material, MaterialRegistry, ScalarKind};
use super::material_loader::MaterialLoader;
use super::mtl_lexer::{classify_line, LineKind, MtlLine};
use crate::foundation::math::Vec3;

/// Result of one parse
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseOutcome {
    /// Materials in first-definition order
    pub registry: MaterialRegistry,
    /// Counts and skipped lines
    pub diagnostics: ParseDiagnostics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParserState {
    NoCurrentMaterial,
    InMaterial(String),
}

/// Incremental MTL parser
///
/// Feed lines in file order with [`MtlParser::parse_line`], then call
/// [`MtlParser::finish`]. Stopping early is allowed: whatever was fed so far
/// is a valid partial result.
#[derive(Debug)]
pub struct MtlParser {
    base_dir: PathBuf,
    state: ParserState,
    registry: MaterialRegistry,
    diagnostics: ParseDiagnostics,
}

impl MtlParser {
    /// Create a parser resolving texture paths against `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            state: ParserState::NoCurrentMaterial,
            registry: MaterialRegistry::new(),
            diagnostics: ParseDiagnostics::new(),
        }
    }

    /// Parse complete MTL text in one call
    pub fn parse_str(contents: &str, base_dir: impl Into<PathBuf>) -> ParseOutcome {
        let mut parser = Self::new(base_dir);
        for line in contents.lines() {
            parser.parse_line(line);
        }
        parser.finish()
    }

    /// Directory texture paths are resolved against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Name of the material currently receiving directives
    pub fn current_material(&self) -> Option<&str> {
        match &self.state {
            ParserState::NoCurrentMaterial => None,
            ParserState::InMaterial(name) => Some(name),
        }
    }

    /// Materials gathered so far
    pub fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    /// Diagnostics gathered so far
    pub fn diagnostics(&self) -> &ParseDiagnostics {
        &self.diagnostics
    }

    /// Consume the next line of the file
    pub fn parse_line(&mut self, raw: &str) {
        self.diagnostics.line_count += 1;
        let line_number = self.diagnostics.line_count;

        let line = classify_line(raw);
        if let Err(error) = self.apply(&line, line_number) {
            self.diagnostics.warn(line_number, error);
        }
    }

    /// Consume the next line as raw bytes
    ///
    /// Invalid UTF-8 is replaced with U+FFFD. When that happens on a directive
    /// that was otherwise accepted, the line is also reported as malformed so
    /// the altered value does not go unnoticed.
    pub fn parse_bytes(&mut self, raw: &[u8]) {
        let text = String::from_utf8_lossy(raw);
        let warnings_before = self.diagnostics.warnings.len();
        self.parse_line(&text);

        if let Cow::Owned(decoded) = &text {
            let line = classify_line(decoded);
            let stores_data = !matches!(line.kind, LineKind::Blank | LineKind::Comment | LineKind::Unknown);
            if stores_data && self.diagnostics.warnings.len() == warnings_before {
                let line_number = self.diagnostics.line_count;
                let error = DirectiveError::malformed(line.keyword, "invalid UTF-8 replaced with U+FFFD");
                self.diagnostics.warn(line_number, error);
            }
        }
    }

    /// Finish parsing and hand over the result
    pub fn finish(self) -> ParseOutcome {
        log::info!("{}", self.diagnostics);
        ParseOutcome {
            registry: self.registry,
            diagnostics: self.diagnostics,
        }
    }

    fn apply(&mut self, line: &MtlLine<'_>, line_number: usize) -> Result<(), DirectiveError> {
        match line.kind {
            // Blank lines close the current material block
            LineKind::Blank => {
                self.state = ParserState::NoCurrentMaterial;
                Ok(())
            }
            LineKind::Comment => Ok(()),
            LineKind::Unknown => {
                log::trace!("Line {}: ignoring '{}'", line_number, line.keyword);
                Ok(())
            }
            LineKind::NewMaterial => self.open_material(line, line_number),
            LineKind::Map(channel) => self.apply_map(line, channel),
            LineKind::Color(kind) => self.apply_color(line, kind),
            LineKind::Scalar(kind) => self.apply_scalar(line, kind),
        }
    }

    fn open_material(&mut self, line: &MtlLine<'_>, line_number: usize) -> Result<(), DirectiveError> {
        let name = line.first_argument()
            .ok_or_else(|| DirectiveError::malformed(line.keyword, "missing material name"))?;

        let (_, created) = self.registry.get_or_insert(name);
        if created {
            self.diagnostics.material_count += 1;
            log::debug!("Line {}: found new material '{}'", line_number, name);
        } else {
            log::debug!("Line {}: reopening material '{}'", line_number, name);
        }

        self.state = ParserState::InMaterial(name.to_string());
        Ok(())
    }

    fn apply_map(&mut self, line: &MtlLine<'_>, channel: MapChannel) -> Result<(), DirectiveError> {
        let name = self.require_material(line.keyword)?;
        if line.remainder.is_empty() {
            return Err(DirectiveError::malformed(line.keyword, "missing texture path"));
        }

        let path = MaterialLoader::resolve_texture_path(&self.base_dir, line.remainder);
        log::debug!("  found {} '{}' for '{}'", channel, path.display(), name);

        let material = self.material_mut(&name);
        material.set_map(channel, path);
        self.diagnostics.map_count += 1;
        Ok(())
    }

    fn apply_color(&mut self, line: &MtlLine<'_>, kind: ColorKind) -> Result<(), DirectiveError> {
        let name = self.require_material(line.keyword)?;
        let [r, g, b] = match line.arguments.as_slice() {
            [r, g, b] => [*r, *g, *b],
            other => {
                return Err(DirectiveError::malformed(
                    line.keyword,
                    format!("expected 3 values, found {}", other.len()),
                ))
            }
        };

        let color = Vec3::new(
            parse_number(line.keyword, r)?,
            parse_number(line.keyword, g)?,
            parse_number(line.keyword, b)?,
        );
        log::debug!("  found {} ({}, {}, {}) for '{}'", kind, color.x, color.y, color.z, name);

        self.material_mut(&name).set_color(kind, color);
        Ok(())
    }

    fn apply_scalar(&mut self, line: &MtlLine<'_>, kind: ScalarKind) -> Result<(), DirectiveError> {
        let name = self.require_material(line.keyword)?;
        // Some exporters put option tokens before the value
        let token = line.last_argument()
            .ok_or_else(|| DirectiveError::malformed(line.keyword, "missing value"))?;

        let value = parse_number(line.keyword, token)?;
        log::debug!("  found {} {} for '{}'", kind, value, name);

        self.material_mut(&name).set_scalar(kind, value);
        Ok(())
    }

    fn require_material(&self, keyword: &str) -> Result<String, DirectiveError> {
        self.current_material()
            .map(str::to_string)
            .ok_or_else(|| DirectiveError::out_of_context(keyword))
    }

    fn material_mut(&mut self, name: &str) -> &mut Material {
        self.registry.get_or_insert(name).0
    }
}

fn parse_number(keyword: &str, token: &str) -> Result<f32, DirectiveError> {
    token.parse::<f32>()
        .map_err(|_| DirectiveError::numeric(keyword, token))
}
