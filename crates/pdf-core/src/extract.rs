//! Default text extractor (§8 scenario 2): joins the render driver's
//! glyph/space events into one string per page, inserting a space wherever
//! a `SpaceDraw` event's magnitude exceeds half the running average glyph
//! advance width seen so far.
//!
//! Grounded on `pypdfproc/__init__.py`'s `Tj`/`TJ` handling, which leaves
//! this decision as an unresolved `TODO` ("If sufficient width to
//! constitute a space, then inject that space") rather than a concrete
//! rule. The half-average-width threshold comes from spec.md §8 scenario
//! 2 itself.

use crate::render::RenderEvent;

/// Accumulates one page (or one document, if fed events across `PageEnd`
/// boundaries without calling [`Self::take_page`]) worth of extracted text.
#[derive(Debug, Default)]
pub struct DefaultExtractor {
    text: String,
    width_sum: f64,
    glyph_count: u32,
}

impl DefaultExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one render event. Non-text events (`PageStart`, `ChangeFont`,
    /// ...) are ignored.
    pub fn on_event(&mut self, event: &RenderEvent) {
        match event {
            RenderEvent::GlyphDraw { glyph, .. } => {
                self.text.push_str(&glyph.unicode);
                self.width_sum += glyph.width;
                self.glyph_count += 1;
            }
            RenderEvent::SpaceDraw { width } => {
                if self.glyph_count > 0 {
                    let average = self.width_sum / f64::from(self.glyph_count);
                    if width.abs() > 0.5 * average {
                        self.text.push(' ');
                    }
                }
            }
            _ => {}
        }
    }

    /// Returns the text accumulated so far and resets the average-width
    /// running state, ready for the next page.
    pub fn take_page(&mut self) -> String {
        self.width_sum = 0.0;
        self.glyph_count = 0;
        std::mem::take(&mut self.text)
    }

    pub fn finish(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::types::Glyph;

    fn glyph(unicode: &str, width: f64) -> Glyph {
        Glyph {
            cid: 0,
            unicode: unicode.to_string(),
            width,
        }
    }

    #[test]
    fn wide_gap_becomes_a_space() {
        let mut ex = DefaultExtractor::new();
        ex.on_event(&RenderEvent::GlyphDraw { x: 0.0, y: 0.0, glyph: glyph("H", 600.0) });
        ex.on_event(&RenderEvent::GlyphDraw { x: 0.0, y: 0.0, glyph: glyph("i", 600.0) });
        ex.on_event(&RenderEvent::SpaceDraw { width: -500.0 });
        ex.on_event(&RenderEvent::GlyphDraw { x: 0.0, y: 0.0, glyph: glyph("t", 600.0) });
        assert_eq!(ex.finish(), "Hi t");
    }

    #[test]
    fn narrow_gap_is_not_a_space() {
        let mut ex = DefaultExtractor::new();
        ex.on_event(&RenderEvent::GlyphDraw { x: 0.0, y: 0.0, glyph: glyph("H", 600.0) });
        ex.on_event(&RenderEvent::SpaceDraw { width: 50.0 });
        ex.on_event(&RenderEvent::GlyphDraw { x: 0.0, y: 0.0, glyph: glyph("i", 600.0) });
        assert_eq!(ex.finish(), "Hi");
    }

    #[test]
    fn take_page_resets_running_average() {
        let mut ex = DefaultExtractor::new();
        ex.on_event(&RenderEvent::GlyphDraw { x: 0.0, y: 0.0, glyph: glyph("A", 600.0) });
        assert_eq!(ex.take_page(), "A");
        ex.on_event(&RenderEvent::GlyphDraw { x: 0.0, y: 0.0, glyph: glyph("B", 600.0) });
        assert_eq!(ex.take_page(), "B");
    }
}
