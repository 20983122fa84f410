use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default size of the conservative read window the object cache uses when
/// pulling an object's raw bytes off the byte source (spec budget: 768 KiB).
const DEFAULT_READ_WINDOW: usize = 768 * 1024;

/// Configuration for a [`crate::Document`].
///
/// Mirrors the shape of a typical `AppConfig`: a small, serde-derived struct
/// with per-field defaults, loadable from a TOML file or constructed
/// programmatically. Every field here is a performance hint or a strictness
/// toggle; none of it changes what a well-formed PDF decodes to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Size, in bytes, of the window the object loader reads starting at an
    /// object's offset before lexing it. Spec §5: "a performance hint, not a
    /// contract": grown automatically if an object's tokens run past it.
    #[serde(default = "default_read_window")]
    pub read_window: usize,

    /// Optional directory to search for AFM metric files before falling back
    /// to the bundled standard-14 tables.
    #[serde(default)]
    pub afm_search_path: Option<PathBuf>,

    /// When `true`, faults that the render driver would otherwise recover
    /// from per-page (`Unsupported`, `MissingGlyph`) are propagated as hard
    /// errors instead. Useful for conformance testing.
    #[serde(default)]
    pub strict: bool,
}

const fn default_read_window() -> usize {
    DEFAULT_READ_WINDOW
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            read_window: default_read_window(),
            afm_search_path: None,
            strict: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DocumentConfig::default();
        assert_eq!(config.read_window, 768 * 1024);
        assert!(!config.strict);
        assert!(config.afm_search_path.is_none());
    }
}
