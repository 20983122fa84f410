//! Incremental-update / newest-wins scenarios (spec.md §8 scenario 4), driven
//! through the public `Document` API rather than `xref::build_xref_table`
//! directly (that function already has its own colocated unit tests).

#[path = "fixtures.rs"]
mod fixtures;

use pdf_core::{Document, DocumentConfig};

/// Appends a second xref section redefining object 1 (the Catalog) to point
/// at a brand-new `Pages` tree, chained back to the first section via
/// `/Prev`. The newer section must win end to end: `Document::pages()` must
/// reflect only the new tree.
fn append_incremental_update(mut bytes: Vec<u8>, new_pages_obj_id: u32, new_pages_body: &[u8]) -> Vec<u8> {
    let old_xref_offset = {
        let text = String::from_utf8_lossy(&bytes);
        text.rfind("xref\n").expect("prior xref section")
    };

    let extra_offset = bytes.len();
    bytes.extend_from_slice(
        format!("{new_pages_obj_id} 0 obj\n").as_bytes(),
    );
    bytes.extend_from_slice(new_pages_body);
    bytes.extend_from_slice(b"\nendobj\n");

    let catalog_offset = bytes.len();
    bytes.extend_from_slice(
        format!("1 0 obj\n<< /Type /Catalog /Pages {new_pages_obj_id} 0 R >>\nendobj\n").as_bytes(),
    );

    let new_xref_offset = bytes.len();
    let max_id = new_pages_obj_id.max(1);
    bytes.extend_from_slice(format!("xref\n0 {}\n", max_id + 1).as_bytes());
    bytes.extend_from_slice(b"0000000000 65535 f \n");
    bytes.extend_from_slice(format!("{catalog_offset:010} 00000 n \n").as_bytes());
    for id in 2..=max_id {
        if id == new_pages_obj_id {
            bytes.extend_from_slice(format!("{extra_offset:010} 00000 n \n").as_bytes());
        } else {
            bytes.extend_from_slice(b"0000000000 65535 f \n");
        }
    }
    bytes.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R /Prev {old_xref_offset} >>\n",
            max_id + 1
        )
        .as_bytes(),
    );
    bytes.extend_from_slice(format!("startxref\n{new_xref_offset}\n%%EOF").as_bytes());
    bytes
}

#[test]
fn incremental_update_supersedes_catalog_page_tree() {
    let base = fixtures::single_page_no_font(b"BT ET");
    // Object id 9 is unused by the base document, so it is safe to append as
    // the new (empty) page tree the second section points the Catalog at.
    let bytes = append_incremental_update(base, 9, b"<< /Type /Pages /Kids [] /Count 0 >>");

    let doc = Document::open(bytes, DocumentConfig::default()).unwrap();
    let pages = doc.pages().unwrap();
    assert!(pages.is_empty(), "newer (empty) page tree must win over the original single page");
}
