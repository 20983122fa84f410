//! Stream-filter pipeline: `FlateDecode` with an optional PNG-Up predictor
//! is the one required filter/predictor combination.

mod flate;

pub use flate::{decode_flate, FlateParms};
