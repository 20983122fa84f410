//! `FlateDecode` plus the PNG-Up predictor, grounded on
//! `decoder/flate.py`'s `FlateDecode`/`PNG_Up` pair: zlib inflate for the
//! compression itself (here, the real `flate2` crate rather than hand-rolled
//! inflate), then the predictor undone by hand since it's a PDF-specific
//! framing step zlib knows nothing about.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::{Error, Result};

/// The subset of `DecodeParms` this core understands. Every other predictor
/// code, and every non-Flate filter name, is the caller's responsibility to
/// reject with `UnsupportedFilter` before reaching here.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlateParms {
    pub predictor: i64,
    pub columns: usize,
}

pub fn decode_flate(data: &[u8], parms: FlateParms) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| Error::UnsupportedFilter(format!("zlib inflate failed: {e}")))?;

    match parms.predictor {
        0 => Ok(out),
        12 => png_up(&out, parms.columns),
        other => Err(Error::UnsupportedFilter(format!(
            "predictor {other} not supported (only absent/0 and PNG-Up/12 are)"
        ))),
    }
}

/// Undoes the PNG-Up predictor: rows are `columns + 1` bytes (a leading
/// per-row predictor-code byte, required to be `2` on every row, plus the
/// `columns` data bytes). `output[r][c] = (input[r][c+1] + output[r-1][c]) %
/// 256`, with an implicit zero row above row 0.
fn png_up(data: &[u8], columns: usize) -> Result<Vec<u8>> {
    let row_stride = columns + 1;
    if row_stride == 0 || data.len() % row_stride != 0 {
        return Err(Error::UnsupportedFilter(format!(
            "PNG-Up data length {} is not a multiple of row stride {row_stride}",
            data.len()
        )));
    }
    let rows = data.len() / row_stride;
    let mut out = vec![0u8; rows * columns];

    for r in 0..rows {
        let row_in = &data[r * row_stride..(r + 1) * row_stride];
        let predictor_code = row_in[0];
        if predictor_code != 2 {
            return Err(Error::UnsupportedFilter(format!(
                "row {r} predictor byte {predictor_code} differs from PNG-Up (2)"
            )));
        }
        for c in 0..columns {
            let up = if r == 0 { 0 } else { out[(r - 1) * columns + c] };
            out[r * columns + c] = row_in[c + 1].wrapping_add(up);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn deflate(bytes: &[u8]) -> Vec<u8> {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(bytes).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn no_predictor_returns_raw_inflate() {
        let compressed = deflate(b"hello world");
        let out = decode_flate(
            &compressed,
            FlateParms {
                predictor: 0,
                columns: 0,
            },
        )
        .unwrap();
        assert_eq!(out, b"hello world");
    }

    #[test]
    fn png_up_matches_spec_example() {
        // Two rows [2, 3, 4] and [5, 0, 1] with the leading predictor-code
        // byte (2) prepended to each row.
        let data = [2u8, 2, 3, 4, 2, 5, 0, 1];
        let out = png_up(&data, 3).unwrap();
        assert_eq!(out, vec![2, 3, 4, 7, 3, 5]);
    }

    #[test]
    fn png_up_rejects_mismatched_row_length() {
        let data = [2u8, 1, 2, 3];
        assert!(png_up(&data, 4).is_err());
    }
}
