//! MTL line classifier
//!
//! Splits one raw line into whitespace-delimited tokens and classifies it by
//! its leading keyword. Pure: no state beyond the static keyword tables.

use super::material::{ColorKind, MapChannel, ScalarKind};

/// Keyword that opens a material block
pub const NEW_MATERIAL_KEYWORD: &str = "newmtl";

/// Texture map keywords
const MAP_KEYWORDS: &[(&str, MapChannel)] = &[
    ("map_Ka", MapChannel::AmbientMap),
    ("map_Kd", MapChannel::DiffuseMap),
    ("map_bump", MapChannel::BumpMap),
    ("map_Bump", MapChannel::BumpMap),
    ("bump", MapChannel::BumpMap),
    ("map_d", MapChannel::Mask),
];

/// Color keywords
const COLOR_KEYWORDS: &[(&str, ColorKind)] = &[
    ("Ka", ColorKind::Ambient),
    ("Kd", ColorKind::Diffuse),
    ("Ks", ColorKind::Specular),
];

/// Scalar keywords
const SCALAR_KEYWORDS: &[(&str, ScalarKind)] = &[
    ("Ns", ScalarKind::SpecularCoefficient),
    ("d", ScalarKind::Transparency),
    ("Tr", ScalarKind::Transparency),
];

/// Classification of one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace only
    Blank,
    /// Starts with `#`
    Comment,
    /// `newmtl <name>`
    NewMaterial,
    /// Texture map directive for a channel
    Map(MapChannel),
    /// RGB color directive
    Color(ColorKind),
    /// Single-value directive
    Scalar(ScalarKind),
    /// Anything else, including `map_*` keywords without a known channel
    Unknown,
}

/// A classified line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MtlLine<'a> {
    /// Line classification
    pub kind: LineKind,
    /// Leading token (empty for blank lines, `#...` for comments)
    pub keyword: &'a str,
    /// Tokens after the keyword
    pub arguments: Vec<&'a str>,
    /// Text after the keyword, trimmed, with internal spacing intact
    pub remainder: &'a str,
}

impl<'a> MtlLine<'a> {
    /// First argument, if any
    pub fn first_argument(&self) -> Option<&'a str> {
        self.arguments.first().copied()
    }

    /// Last argument, if any
    pub fn last_argument(&self) -> Option<&'a str> {
        self.arguments.last().copied()
    }
}

fn lookup<T: Copy>(table: &[(&str, T)], keyword: &str) -> Option<T> {
    table.iter()
        .find(|(candidate, _)| *candidate == keyword)
        .map(|&(_, value)| value)
}

/// Classify a keyword on its own
pub fn classify_keyword(keyword: &str) -> LineKind {
    if keyword == NEW_MATERIAL_KEYWORD {
        LineKind::NewMaterial
    } else if let Some(channel) = lookup(MAP_KEYWORDS, keyword) {
        LineKind::Map(channel)
    } else if let Some(kind) = lookup(COLOR_KEYWORDS, keyword) {
        LineKind::Color(kind)
    } else if let Some(kind) = lookup(SCALAR_KEYWORDS, keyword) {
        LineKind::Scalar(kind)
    } else {
        LineKind::Unknown
    }
}

/// Classify one line of MTL text
pub fn classify_line(line: &str) -> MtlLine<'_> {
    let line = line.trim();

    if line.is_empty() {
        return MtlLine { kind: LineKind::Blank, keyword: "", arguments: Vec::new(), remainder: "" };
    }

    if line.starts_with('#') {
        return MtlLine { kind: LineKind::Comment, keyword: line, arguments: Vec::new(), remainder: "" };
    }

    let mut tokens = line.split_whitespace();
    // Non-empty after trim, so there is always a first token
    let keyword = tokens.next().unwrap_or_default();
    let arguments: Vec<&str> = tokens.collect();
    let remainder = line[keyword.len()..].trim_start();

    MtlLine {
        kind: classify_keyword(keyword),
        keyword,
        arguments,
        remainder,
    }
}
