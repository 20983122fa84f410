//! Byte source abstraction over the raw PDF file contents.

mod source;

pub use source::{ByteSource, Whence};
