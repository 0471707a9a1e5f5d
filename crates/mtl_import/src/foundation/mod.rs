//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the importer:
//! - Math types for material colors
//! - Logging utilities

pub mod math;
pub mod logging;
