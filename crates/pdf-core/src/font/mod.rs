//! Font and glyph resolution subsystem (§4.7): dispatches a character code
//! through one of the simple-font or composite-font paths to a [`Glyph`]
//! (Unicode string plus advance width).

pub mod cff;
pub mod cmap_builtin;
pub mod differences;
pub mod dispatch;
pub mod encodings;
pub mod simple;
pub mod standard_fonts;
pub mod type0;
pub mod width;

pub use dispatch::{code_byte_width, resolve_glyph};
