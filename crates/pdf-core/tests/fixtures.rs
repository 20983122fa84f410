//! Hand-built minimal PDF byte fixtures shared by the integration tests in
//! this directory. Every builder here writes a classic (non-stream) xref
//! table by hand, since the scenarios in spec.md §8 only exercise the
//! classic-xref path end to end.

#![allow(dead_code)]

/// One object's serialized bytes plus the byte offset it ends up at once
/// appended to a growing buffer.
struct Obj {
    id: u32,
    offset: usize,
}

struct Builder {
    bytes: Vec<u8>,
    objs: Vec<Obj>,
}

impl Builder {
    fn new() -> Self {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"%PDF-1.7\n");
        Self {
            bytes,
            objs: Vec::new(),
        }
    }

    fn push(&mut self, id: u32, body: &[u8]) {
        let offset = self.bytes.len();
        self.bytes
            .extend_from_slice(format!("{id} 0 obj\n").as_bytes());
        self.bytes.extend_from_slice(body);
        self.bytes.extend_from_slice(b"\nendobj\n");
        self.objs.push(Obj { id, offset });
    }

    fn push_stream(&mut self, id: u32, dict_body: &str, stream: &[u8]) {
        let offset = self.bytes.len();
        self.bytes
            .extend_from_slice(format!("{id} 0 obj\n{dict_body}\nstream\n").as_bytes());
        self.bytes.extend_from_slice(stream);
        self.bytes.extend_from_slice(b"\nendstream\nendobj\n");
        self.objs.push(Obj { id, offset });
    }

    /// Finishes with a classic xref table and trailer pointing at object 1
    /// as `/Root`, returning the complete document bytes.
    fn finish(mut self) -> Vec<u8> {
        self.objs.sort_by_key(|o| o.id);
        let max_id = self.objs.iter().map(|o| o.id).max().unwrap_or(0);
        let xref_offset = self.bytes.len();
        self.bytes
            .extend_from_slice(format!("xref\n0 {}\n", max_id + 1).as_bytes());
        self.bytes.extend_from_slice(b"0000000000 65535 f \n");
        let mut next_expected = 1;
        for obj in &self.objs {
            while next_expected < obj.id {
                self.bytes.extend_from_slice(b"0000000000 65535 f \n");
                next_expected += 1;
            }
            self.bytes
                .extend_from_slice(format!("{:010} 00000 n \n", obj.offset).as_bytes());
            next_expected += 1;
        }
        self.bytes.extend_from_slice(
            format!("trailer\n<< /Size {} /Root 1 0 R >>\n", max_id + 1).as_bytes(),
        );
        self.bytes
            .extend_from_slice(format!("startxref\n{xref_offset}\n%%EOF").as_bytes());
        self.bytes
    }
}

/// A single-page document using a Type1 Helvetica font under `WinAnsiEncoding`
/// named `/F1` in the page's `Resources`, with `content` as the page's sole
/// content stream (stored uncompressed).
pub fn single_page_helvetica(content: &[u8]) -> Vec<u8> {
    let mut b = Builder::new();
    b.push(1, b"<< /Type /Catalog /Pages 2 0 R >>");
    b.push(2, b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    b.push(
        3,
        b"<< /Type /Page /Parent 2 0 R /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>",
    );
    let dict = format!("<< /Length {} >>", content.len());
    b.push_stream(4, &dict, content);
    b.push(
        5,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    b.finish()
}

/// A single-page document using an `Identity-H` Type0/CIDFontType2 composite
/// font named `/F1`, with a `ToUnicode` CMap mapping CIDs 1..=4 to `H`, `e`,
/// `l`, `o` and a `W` array giving each a 600-unit advance.
pub fn single_page_identity_h(content: &[u8]) -> Vec<u8> {
    let mut b = Builder::new();
    b.push(1, b"<< /Type /Catalog /Pages 2 0 R >>");
    b.push(2, b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    b.push(
        3,
        b"<< /Type /Page /Parent 2 0 R /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>",
    );
    let dict = format!("<< /Length {} >>", content.len());
    b.push_stream(4, &dict, content);
    b.push(
        5,
        b"<< /Type /Font /Subtype /Type0 /BaseFont /Identity-H /Encoding /Identity-H /DescendantFonts [6 0 R] /ToUnicode 7 0 R >>",
    );
    b.push(
        6,
        b"<< /Type /Font /Subtype /CIDFontType2 /BaseFont /Synthetic /CIDSystemInfo << >> /DW 0 /W [1 [600 600 600 600]] >>",
    );
    let cmap = b"/CIDInit /ProcSet findresource begin\n\
1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n\
4 beginbfchar\n<0001> <0048>\n<0002> <0065>\n<0003> <006C>\n<0004> <006F>\nendbfchar\n\
endcmap";
    let cmap_dict = format!("<< /Length {} >>", cmap.len());
    b.push_stream(7, &cmap_dict, cmap);
    b.finish()
}

/// An empty-page document (no `Contents`); exercises the `Page::content_bytes`
/// empty-stream path and the `"BT ET"`-only rendering scenario when `content`
/// is supplied as a separate stream instead.
pub fn single_page_no_font(content: &[u8]) -> Vec<u8> {
    let mut b = Builder::new();
    b.push(1, b"<< /Type /Catalog /Pages 2 0 R >>");
    b.push(2, b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    b.push(
        3,
        b"<< /Type /Page /Parent 2 0 R /Contents 4 0 R /Resources << >> >>",
    );
    let dict = format!("<< /Length {} >>", content.len());
    b.push_stream(4, &dict, content);
    b.finish()
}
