//! Graphics/text state runtime (§3.4): the affine matrix type, the nested
//! `GraphicsState`/`TextState` pair the interpreter mutates per operator,
//! and the non-empty state stack `q`/`Q` push and pop.
//!
//! Grounded on `pypdfproc/parser/state.py`'s `StateManager`/`State`/`Mat3x3`
//! trio: a stack that always holds at least one state, deep-copied on push,
//! with `cm`/`Mat3x3` realized here as a value type with a `multiply`
//! composing two matrices in the same row-vector convention the original
//! implements by hand in its `Mat3x3` arithmetic helpers.

use crate::error::{Error, Result};
use crate::object::ObjectId;

/// A 3x3 affine matrix whose right column is implicitly `[0 0 1]ᵀ`,
/// matching the PDF `a b c d e f` operand convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self · other`: applies `self` first, then `other`, the standard
    /// row-vector composition a PDF `cm`/`Td`/`Tm` pre-multiplies under.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// The matrix's translation component, `(E, F)`.
    pub const fn translation_component(&self) -> (f64, f64) {
        (self.e, self.f)
    }
}

/// Stroking or non-stroking color, tagged by the operator family that set
/// it (`g`/`G` gray, `rg`/`RG` RGB, `k`/`K` CMYK, `sc`/`SC`/`scn`/`SCN`
/// device/pattern/separation components). The text-only core never paints
/// with these, but §3.4 requires the state to hold and mutate them.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    Gray(f64),
    Rgb(f64, f64, f64),
    Cmyk(f64, f64, f64, f64),
    Components(Vec<f64>),
}

impl Default for Color {
    fn default() -> Self {
        Self::Gray(0.0)
    }
}

/// Nested text state (§3.4): `Tm`/`Tlm` are `None` outside a `BT … ET`
/// block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    /// `Tf` resource name of the current font.
    pub font_name: Option<String>,
    /// `Tfs`, the font size operand of `Tf`.
    pub font_size: f64,
    /// `Tc`, character spacing.
    pub char_spacing: f64,
    /// `Tw`, word spacing.
    pub word_spacing: f64,
    /// `Tz`, horizontal scaling as a percentage (100 = unscaled).
    pub horiz_scale: f64,
    /// `TL`, leading.
    pub leading: f64,
    /// `Tr`, text rendering mode.
    pub render_mode: i64,
    /// `Ts`, text rise.
    pub rise: f64,
    pub text_matrix: Option<Matrix>,
    pub text_line_matrix: Option<Matrix>,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_name: None,
            font_size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horiz_scale: 100.0,
            leading: 0.0,
            render_mode: 0,
            rise: 0.0,
            text_matrix: None,
            text_line_matrix: None,
        }
    }
}

/// One entry of the graphics state stack (§3.4).
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    pub ctm: Matrix,
    pub stroke_color_space: Option<String>,
    pub fill_color_space: Option<String>,
    pub stroke_color: Color,
    pub fill_color: Color,
    pub line_width: f64,
    pub line_cap: i64,
    pub line_join: i64,
    pub miter_limit: f64,
    pub dash_pattern: (Vec<f64>, f64),
    pub rendering_intent: String,
    pub stroke_adjustment: bool,
    pub blend_mode: String,
    pub soft_mask: Option<String>,
    pub stroke_alpha: f64,
    pub fill_alpha: f64,
    pub alpha_is_shape: bool,
    /// `gs`'s `Font` entry: `[font_ref size]` overriding the resource-name
    /// lookup a bare `Tf` would otherwise do.
    pub font_ref_override: Option<ObjectId>,
    /// `gs`'s `FL`, flatness tolerance.
    pub flatness: f64,
    /// `gs`'s `SM`, smoothness tolerance.
    pub smoothness: f64,
    pub text: TextState,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            stroke_color_space: None,
            fill_color_space: None,
            stroke_color: Color::default(),
            fill_color: Color::default(),
            line_width: 1.0,
            line_cap: 0,
            line_join: 0,
            miter_limit: 10.0,
            dash_pattern: (Vec::new(), 0.0),
            rendering_intent: "RelativeColorimetric".to_string(),
            stroke_adjustment: false,
            blend_mode: "Normal".to_string(),
            soft_mask: None,
            stroke_alpha: 1.0,
            fill_alpha: 1.0,
            alpha_is_shape: false,
            font_ref_override: None,
            flatness: 1.0,
            smoothness: 0.0,
            text: TextState::default(),
        }
    }
}

/// Non-empty stack of graphics states. `q` deep-copies the top entry onto
/// the stack; `Q` pops, faulting (`StatePop`) if that would empty it.
#[derive(Debug, Clone)]
pub struct StateStack {
    stack: Vec<GraphicsState>,
}

impl Default for StateStack {
    fn default() -> Self {
        Self {
            stack: vec![GraphicsState::default()],
        }
    }
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top(&self) -> &GraphicsState {
        self.stack.last().unwrap_or_else(|| unreachable!("state stack is never empty"))
    }

    pub fn top_mut(&mut self) -> &mut GraphicsState {
        self.stack.last_mut().unwrap_or_else(|| unreachable!("state stack is never empty"))
    }

    pub fn push(&mut self) {
        let top = self.top().clone();
        self.stack.push(top);
    }

    pub fn pop(&mut self) -> Result<()> {
        if self.stack.len() <= 1 {
            return Err(Error::StatePop);
        }
        self.stack.pop();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_round_trip_leaves_state_identical() {
        let mut stack = StateStack::new();
        let before = stack.top().clone();
        stack.push();
        stack.top_mut().line_width = 42.0;
        stack.pop().unwrap();
        assert_eq!(*stack.top(), before);
    }

    #[test]
    fn pop_below_initial_state_faults() {
        let mut stack = StateStack::new();
        assert!(matches!(stack.pop(), Err(Error::StatePop)));
    }

    #[test]
    fn matrix_multiply_composes_translation_then_scale() {
        let t = Matrix::translation(10.0, 20.0);
        let s = Matrix::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let combined = t.multiply(&s);
        assert_eq!(combined.translation_component(), (20.0, 40.0));
    }

    #[test]
    fn cm_premultiplies_onto_existing_ctm() {
        let ctm = Matrix::translation(100.0, 200.0);
        let m = Matrix::new(1.0, 0.0, 0.0, 1.0, 5.0, 0.0);
        let new_ctm = m.multiply(&ctm);
        assert_eq!(new_ctm.translation_component(), (105.0, 200.0));
    }
}
