//! pdf-core: a read-only PDF object resolver and content interpreter.
//!
//! Parses a PDF byte stream, resolves its cross-reference chain and object
//! graph, and renders each page's text content into a sequence of
//! positioned glyphs with Unicode values. The sole subject of this crate is
//! the object resolver and content interpreter: no rasterization, no
//! editing, no writing.

pub mod config;
pub mod consolidate;
pub mod content_state;
pub mod error;
pub mod extract;
pub mod filter;
pub mod font;
pub mod interp;
pub mod io;
pub mod lex;
pub mod object;
pub mod render;
pub mod xref;

pub use config::DocumentConfig;
pub use content_state::{Color, GraphicsState, Matrix, StateStack, TextState};
pub use error::{Error, Result};
pub use extract::DefaultExtractor;
pub use interp::TextEvent;
pub use object::types::{Catalog, Font, Glyph, Page, PageTreeNode, Resource};
pub use object::{Dict, Name, Number, Object, ObjectId, PdfString};
pub use render::{Document, RenderEvent};
