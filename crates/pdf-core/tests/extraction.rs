//! End-to-end extraction scenarios (spec.md §8).

#[path = "fixtures.rs"]
mod fixtures;

use pdf_core::{DefaultExtractor, Document, DocumentConfig, RenderEvent};

/// Renders `bytes` and returns every event alongside the plain concatenation
/// of glyph unicode values (no space heuristic applied).
fn render_text(bytes: Vec<u8>) -> (Vec<RenderEvent>, String) {
    let doc = Document::open(bytes, DocumentConfig::default()).unwrap();
    let mut events = Vec::new();
    let mut text = String::new();
    doc.render_document(|_, event, _| {
        if let RenderEvent::GlyphDraw { glyph, .. } = &event {
            text.push_str(&glyph.unicode);
        }
        events.push(event);
        false
    })
    .unwrap();
    (events, text)
}

/// Renders `bytes` through [`DefaultExtractor`], applying the half-average-
/// width space heuristic (spec.md §8 scenario 2).
fn extract_default(bytes: Vec<u8>) -> String {
    let doc = Document::open(bytes, DocumentConfig::default()).unwrap();
    let mut extractor = DefaultExtractor::new();
    doc.render_document(|_, event, _| {
        extractor.on_event(&event);
        false
    })
    .unwrap();
    extractor.finish()
}

#[test]
fn minimal_single_page_extraction() {
    let bytes =
        fixtures::single_page_helvetica(b"BT /F1 12 Tf 72 720 Td (Hello) Tj ET");
    let (events, text) = render_text(bytes);

    assert_eq!(events[0], RenderEvent::PageStart);
    assert_eq!(
        events[1],
        RenderEvent::ChangeFont {
            name: "F1".to_string(),
            size: 12.0
        }
    );
    let glyph_events: Vec<&RenderEvent> = events
        .iter()
        .filter(|e| matches!(e, RenderEvent::GlyphDraw { .. }))
        .collect();
    assert_eq!(glyph_events.len(), 5);

    let xs: Vec<f64> = glyph_events
        .iter()
        .map(|e| match e {
            RenderEvent::GlyphDraw { x, .. } => *x,
            _ => unreachable!(),
        })
        .collect();
    assert!(xs.windows(2).all(|w| w[0] < w[1]), "x positions must ascend: {xs:?}");
    for e in &glyph_events {
        if let RenderEvent::GlyphDraw { y, .. } = e {
            assert_eq!(*y, 720.0);
        }
    }

    assert_eq!(events.last(), Some(&RenderEvent::PageEnd));
    assert_eq!(text, "Hello");
}

#[test]
fn space_inference_via_tj() {
    let bytes = fixtures::single_page_helvetica(
        b"BT /F1 12 Tf 0 0 Td [(Hi) -500 (there)] TJ ET",
    );
    let (events, text) = render_text(bytes);

    let glyph_count = events
        .iter()
        .filter(|e| matches!(e, RenderEvent::GlyphDraw { .. }))
        .count();
    assert_eq!(glyph_count, 7);

    let space_draws: Vec<&RenderEvent> = events
        .iter()
        .filter(|e| matches!(e, RenderEvent::SpaceDraw { .. }))
        .collect();
    assert_eq!(space_draws, vec![&RenderEvent::SpaceDraw { width: -500.0 }]);

    assert_eq!(text, "Hithere");
    assert_eq!(
        extract_default(fixtures::single_page_helvetica(
            b"BT /F1 12 Tf 0 0 Td [(Hi) -500 (there)] TJ ET"
        )),
        "Hi there"
    );
}

#[test]
fn hex_string_with_identity_h() {
    // CIDs 1,2,3,3,4 through the fixture's ToUnicode bfchar table: H e l l o.
    let bytes = fixtures::single_page_identity_h(
        b"BT /F1 12 Tf 0 0 Td <0001000200030003 0004> Tj ET",
    );
    let (_, text) = render_text(bytes);
    assert_eq!(text, "Hello");
}

#[test]
fn bt_et_alone_emits_no_glyphs() {
    let bytes = fixtures::single_page_no_font(b"BT ET");
    let (events, text) = render_text(bytes);
    assert_eq!(
        events,
        vec![
            RenderEvent::RenderPagesStart,
            RenderEvent::PageStart,
            RenderEvent::PageEnd,
            RenderEvent::RenderPagesEnd,
        ]
    );
    assert!(text.is_empty());
}

#[test]
fn state_nesting_positions_glyphs_under_nested_cm() {
    let bytes = fixtures::single_page_helvetica(
        b"q 1 0 0 1 100 200 cm BT /F1 12 Tf 0 0 Td (A) Tj ET Q BT /F1 12 Tf 0 0 Td (B) Tj ET",
    );
    let (events, _) = render_text(bytes);
    let positions: Vec<(f64, f64)> = events
        .iter()
        .filter_map(|e| match e {
            RenderEvent::GlyphDraw { x, y, .. } => Some((*x, *y)),
            _ => None,
        })
        .collect();
    assert_eq!(positions, vec![(100.0, 200.0), (0.0, 0.0)]);
}
