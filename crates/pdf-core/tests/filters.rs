//! Flate + PNG-Up round trip, driven through a full document's content
//! stream (spec.md §8 scenario 6) rather than calling the filter directly
//! (that path already has its own colocated unit tests in `filter/flate.rs`).

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use pdf_core::{Document, DocumentConfig};

fn deflate(bytes: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(bytes).unwrap();
    enc.finish().unwrap()
}

/// A single-page document whose content stream is Flate-compressed with a
/// PNG-Up predictor over 3-column rows, decoding to the two rows
/// `[2, 3, 4]` and `[7, 3, 5]` from spec.md §8 scenario 6's raw predictor
/// input `[2, 2, 3, 4, 2, 5, 0, 1]`. The decoded bytes aren't valid content
/// operators, so the assertion is purely over the decoded byte content.
fn predictor_document() -> Vec<u8> {
    let raw = [2u8, 2, 3, 4, 2, 5, 0, 1];
    let compressed = deflate(&raw);

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"%PDF-1.7\n");
    bytes.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");
    let off1 = 9;
    let obj2 = b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n";
    let off2 = bytes.len();
    bytes.extend_from_slice(obj2);
    let obj3 =
        b"3 0 obj\n<< /Type /Page /Parent 2 0 R /Contents 4 0 R /Resources << >> >>\nendobj\n";
    let off3 = bytes.len();
    bytes.extend_from_slice(obj3);
    let off4 = bytes.len();
    bytes.extend_from_slice(
        format!(
            "4 0 obj\n<< /Length {} /Filter /FlateDecode /DecodeParms << /Predictor 12 /Columns 3 >> >>\nstream\n",
            compressed.len()
        )
        .as_bytes(),
    );
    bytes.extend_from_slice(&compressed);
    bytes.extend_from_slice(b"\nendstream\nendobj\n");

    let xref_offset = bytes.len();
    bytes.extend_from_slice(b"xref\n0 5\n");
    bytes.extend_from_slice(b"0000000000 65535 f \n");
    for off in [off1, off2, off3, off4] {
        bytes.extend_from_slice(format!("{off:010} 00000 n \n").as_bytes());
    }
    bytes.extend_from_slice(b"trailer\n<< /Size 5 /Root 1 0 R >>\n");
    bytes.extend_from_slice(format!("startxref\n{xref_offset}\n%%EOF").as_bytes());
    bytes
}

#[test]
fn flate_plus_png_up_round_trip_through_a_page_content_stream() {
    let doc = Document::open(predictor_document(), DocumentConfig::default()).unwrap();
    let page = doc.pages().unwrap().into_iter().next().unwrap();
    let decoded = page.content_bytes(doc.cache()).unwrap();
    assert_eq!(decoded, vec![2, 3, 4, 7, 3, 5]);
}
