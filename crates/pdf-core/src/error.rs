use thiserror::Error;

/// Unified error type for pdf-core
///
/// Covers every failure mode the object resolver and content interpreter can
/// hit: byte-source I/O, lexing, cross-reference resolution, object-cache
/// dispatch, font/glyph lookup, and graphics-state faults.
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Byte source / file-structure errors
    // ==========================================================================
    /// Header line is missing or doesn't start with `%PDF-`.
    #[error("not a PDF: {0}")]
    NotAPdf(String),

    /// Underlying byte source read/seek failed, or ran past a boundary.
    #[error("I/O failure at offset {offset}: {reason}")]
    IoFailure { offset: usize, reason: String },

    /// `(id, generation)` is absent from the resolved object map.
    #[error("unknown object ({0}, {1})")]
    UnknownObject(u32, u16),

    // ==========================================================================
    // Lexing / token errors
    // ==========================================================================
    /// The lexer hit a byte sequence inconsistent with any known production.
    #[error("malformed token at offset {offset}: {reason}")]
    MalformedToken { offset: usize, reason: String },

    // ==========================================================================
    // Stream filter errors
    // ==========================================================================
    /// Filter name or predictor code outside the required set (`FlateDecode`
    /// with predictor absent/0/12).
    #[error("unsupported filter: {0}")]
    UnsupportedFilter(String),

    // ==========================================================================
    // Font & glyph errors
    // ==========================================================================
    /// Font encoding is neither a recognized name nor a `FontEncoding` record.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Glyph name could not be mapped to Unicode after all fallbacks.
    #[error("missing glyph for code {code} (glyph name {name:?})")]
    MissingGlyph { code: u32, name: Option<String> },

    /// Character code absent from a CMap function's domain.
    #[error("CMap miss for code {0}")]
    CMapMiss(u32),

    // ==========================================================================
    // Graphics-state errors
    // ==========================================================================
    /// Graphics-state feature recognized but not implemented (dash in
    /// `gs`, `BG`, `UCR`, `TR`, `HT`, `SMask`, `TK`).
    #[error("unsupported graphics-state feature: {0}")]
    Unsupported(String),

    /// `Q` popped a state stack already at its initial depth.
    #[error("state stack popped below its initial state")]
    StatePop,
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;
