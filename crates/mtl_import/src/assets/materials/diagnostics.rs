//! Per-line parse diagnostics
//!
//! Problems with single lines are collected here instead of aborting the
//! parse. Only stream-level failures are returned as errors.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Why a single directive was skipped
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DirectiveError {
    /// Wrong number of tokens for the keyword
    #[error("{keyword}: {reason}")]
    Malformed {
        /// Directive keyword
        keyword: String,
        /// What was wrong with the line
        reason: String,
    },

    /// A numeric token did not parse as a float
    #[error("{keyword}: could not parse '{token}' as a number")]
    NumericParse {
        /// Directive keyword
        keyword: String,
        /// Offending token
        token: String,
    },

    /// Property or map directive before any `newmtl`
    #[error("{keyword} outside of material")]
    OutOfContext {
        /// Directive keyword
        keyword: String,
    },
}

impl DirectiveError {
    /// Build a malformed-directive error
    pub fn malformed(keyword: &str, reason: impl Into<String>) -> Self {
        Self::Malformed { keyword: keyword.to_string(), reason: reason.into() }
    }

    /// Build a numeric parse error
    pub fn numeric(keyword: &str, token: &str) -> Self {
        Self::NumericParse { keyword: keyword.to_string(), token: token.to_string() }
    }

    /// Build an out-of-context error
    pub fn out_of_context(keyword: &str) -> Self {
        Self::OutOfContext { keyword: keyword.to_string() }
    }
}

/// A skipped line with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    /// 1-based line number
    pub line: usize,
    /// What went wrong
    pub error: DirectiveError,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// Counts and warnings gathered during one parse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostics {
    /// Lines read, blank and comment lines included
    pub line_count: usize,
    /// Distinct material names introduced by `newmtl`
    pub material_count: usize,
    /// Texture maps assigned
    pub map_count: usize,
    /// Skipped lines in file order
    pub warnings: Vec<ParseWarning>,
}

impl ParseDiagnostics {
    /// Create empty diagnostics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a skipped or altered line
    pub fn warn(&mut self, line: usize, error: DirectiveError) {
        let warning = ParseWarning { line, error };
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Whether any line was skipped
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Warnings of one category
    pub fn warnings_matching<'a>(
        &'a self,
        predicate: impl Fn(&DirectiveError) -> bool + 'a,
    ) -> impl Iterator<Item = &'a ParseWarning> + 'a {
        self.warnings.iter().filter(move |warning| predicate(&warning.error))
    }
}

impl fmt::Display for ParseDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parsed {} lines and found {} materials with {} texture maps",
            self.line_count, self.material_count, self.map_count
        )?;
        if self.has_warnings() {
            write!(f, " ({} lines skipped)", self.warnings.len())?;
        }
        Ok(())
    }
}
