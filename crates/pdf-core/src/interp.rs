//! Content-stream interpreter (§4.9): consumes the prefix-form operator
//! list from [`crate::lex::content`], mutates a [`StateStack`], and emits
//! text-showing events to the caller-supplied sink.
//!
//! Grounded on `pypdfproc/parser/text.py`'s postfix->prefix regrouping (the
//! arity table this crate's `lex::content::lex_content` already applies)
//! together with `pypdfproc/parser/state.py`'s `StateManager`/`Mat3x3` pair
//! for the push/pop and matrix-composition semantics every operator below
//! drives.

use crate::content_state::{Color, GraphicsState, Matrix, StateStack};
use crate::error::{Error, Result};
use crate::font::{code_byte_width, resolve_glyph};
use crate::lex::content::{ContentOp, ContentValue};
use crate::object::cache::ObjectCache;
use crate::object::types::{Font, Glyph, GraphicsStateParameters, Resource};
use crate::object::ObjectId;

/// A text-showing event the interpreter emits as it advances the text
/// matrix. `"page start"`/`"page end"`/`"page exception"` and the two
/// document-level lifecycle events live in `render.rs`, one layer up;
/// this is only the subset §4.9 itself produces.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEvent {
    ChangeFont { name: String, size: f64 },
    GlyphDraw { x: f64, y: f64, glyph: Glyph },
    SpaceDraw { width: f64 },
}

/// Resolves to a font either by its resource-dictionary local name (the
/// common `Tf` path) or directly by object id (the `gs` `Font` field, which
/// names the font object itself rather than a page-resource key).
enum FontHandle {
    Named(String),
    Direct(ObjectId),
}

struct CurrentFont {
    font: Font,
}

/// Interprets one page's (already concatenated, filter-decoded) content
/// stream operators against `stack`, looking up fonts and `ExtGState`
/// resources through `resources`, emitting `TextEvent`s via `emit`.
pub fn interpret(
    cache: &ObjectCache,
    resources: Option<&Resource>,
    ops: &[ContentOp],
    stack: &mut StateStack,
    mut emit: impl FnMut(&GraphicsState, TextEvent) -> Result<()>,
) -> Result<()> {
    let mut current: Option<CurrentFont> = None;

    for op in ops {
        match op.op.as_str() {
            "q" => stack.push(),
            "Q" => stack.pop()?,
            "cm" => {
                let m = matrix_operand(op)?;
                stack.top_mut().ctm = m.multiply(&stack.top().ctm);
            }
            "gs" => apply_gs(cache, resources, op, stack, &mut current)?,
            "BT" => {
                let text = &mut stack.top_mut().text;
                text.text_matrix = Some(Matrix::IDENTITY);
                text.text_line_matrix = Some(Matrix::IDENTITY);
            }
            "ET" => {
                let text = &mut stack.top_mut().text;
                text.text_matrix = None;
                text.text_line_matrix = None;
            }
            "Tf" => {
                let name = op.operands[0].as_name().ok_or_else(|| malformed(op, "Tf name"))?;
                let size = op.operands[1].as_f64().ok_or_else(|| malformed(op, "Tf size"))?;
                stack.top_mut().text.font_name = Some(name.to_string());
                stack.top_mut().text.font_size = size;
                stack.top_mut().font_ref_override = None;
                current = load_font(cache, resources, &FontHandle::Named(name.to_string()))?;
                emit(
                    stack.top(),
                    TextEvent::ChangeFont {
                        name: name.to_string(),
                        size,
                    },
                )?;
            }
            "Tc" => stack.top_mut().text.char_spacing = num_operand(op, 0)?,
            "Tw" => stack.top_mut().text.word_spacing = num_operand(op, 0)?,
            "Tz" => stack.top_mut().text.horiz_scale = num_operand(op, 0)?,
            "TL" => stack.top_mut().text.leading = num_operand(op, 0)?,
            "Tr" => stack.top_mut().text.render_mode = num_operand(op, 0)? as i64,
            "Ts" => stack.top_mut().text.rise = num_operand(op, 0)?,
            "Td" => {
                let (tx, ty) = (num_operand(op, 0)?, num_operand(op, 1)?);
                apply_td(stack, tx, ty);
            }
            "TD" => {
                let (tx, ty) = (num_operand(op, 0)?, num_operand(op, 1)?);
                stack.top_mut().text.leading = -ty;
                apply_td(stack, tx, ty);
            }
            "T*" => {
                let leading = stack.top().text.leading;
                apply_td(stack, 0.0, -leading);
            }
            "Tm" => {
                let m = matrix_operand(op)?;
                let text = &mut stack.top_mut().text;
                text.text_matrix = Some(m);
                text.text_line_matrix = Some(m);
            }
            "Tj" => {
                let bytes = op.operands[0].as_bytes().ok_or_else(|| malformed(op, "Tj string"))?;
                show_text(cache, stack, current.as_ref(), bytes, &mut emit)?;
            }
            "'" => {
                let leading = stack.top().text.leading;
                apply_td(stack, 0.0, -leading);
                let bytes = op.operands[0].as_bytes().ok_or_else(|| malformed(op, "' string"))?;
                show_text(cache, stack, current.as_ref(), bytes, &mut emit)?;
            }
            "\"" => {
                let aw = num_operand(op, 0)?;
                let ac = num_operand(op, 1)?;
                stack.top_mut().text.word_spacing = aw;
                stack.top_mut().text.char_spacing = ac;
                let leading = stack.top().text.leading;
                apply_td(stack, 0.0, -leading);
                let bytes = op.operands[2].as_bytes().ok_or_else(|| malformed(op, "\" string"))?;
                show_text(cache, stack, current.as_ref(), bytes, &mut emit)?;
            }
            "TJ" => {
                let items = op.operands[0].as_array().ok_or_else(|| malformed(op, "TJ array"))?;
                for item in items {
                    if let Some(bytes) = item.as_bytes() {
                        show_text(cache, stack, current.as_ref(), bytes, &mut emit)?;
                    } else if let Some(n) = item.as_f64() {
                        let tfs = stack.top().text.font_size;
                        let tz = stack.top().text.horiz_scale / 100.0;
                        let tx = -(n / 1000.0) * tfs * tz;
                        let tm = stack.top().text.text_matrix.unwrap_or(Matrix::IDENTITY);
                        stack.top_mut().text.text_matrix = Some(Matrix::translation(tx, 0.0).multiply(&tm));
                        emit(stack.top(), TextEvent::SpaceDraw { width: n })?;
                    }
                }
            }
            "G" => {
                stack.top_mut().stroke_color = Color::Gray(num_operand(op, 0)?);
            }
            "g" => {
                stack.top_mut().fill_color = Color::Gray(num_operand(op, 0)?);
            }
            "RG" => {
                stack.top_mut().stroke_color =
                    Color::Rgb(num_operand(op, 0)?, num_operand(op, 1)?, num_operand(op, 2)?);
            }
            "rg" => {
                stack.top_mut().fill_color =
                    Color::Rgb(num_operand(op, 0)?, num_operand(op, 1)?, num_operand(op, 2)?);
            }
            "K" => {
                stack.top_mut().stroke_color = Color::Cmyk(
                    num_operand(op, 0)?,
                    num_operand(op, 1)?,
                    num_operand(op, 2)?,
                    num_operand(op, 3)?,
                );
            }
            "k" => {
                stack.top_mut().fill_color = Color::Cmyk(
                    num_operand(op, 0)?,
                    num_operand(op, 1)?,
                    num_operand(op, 2)?,
                    num_operand(op, 3)?,
                );
            }
            "CS" => {
                stack.top_mut().stroke_color_space =
                    Some(op.operands[0].as_name().unwrap_or_default().to_string());
            }
            "cs" => {
                stack.top_mut().fill_color_space =
                    Some(op.operands[0].as_name().unwrap_or_default().to_string());
            }
            "SC" | "SCN" => {
                stack.top_mut().stroke_color = Color::Components(numeric_operands(op));
            }
            "sc" | "scn" => {
                stack.top_mut().fill_color = Color::Components(numeric_operands(op));
            }
            "w" => stack.top_mut().line_width = num_operand(op, 0)?,
            "J" => stack.top_mut().line_cap = num_operand(op, 0)? as i64,
            "j" => stack.top_mut().line_join = num_operand(op, 0)? as i64,
            "M" => stack.top_mut().miter_limit = num_operand(op, 0)?,
            "ri" => stack.top_mut().rendering_intent = op.operands[0].as_name().unwrap_or_default().to_string(),
            "i" => stack.top_mut().flatness = num_operand(op, 0)?,
            "d" | "m" | "l" | "c" | "v" | "y" | "h" | "re" | "S" | "s" | "f" | "F" | "f*" | "B"
            | "B*" | "b" | "b*" | "n" | "W" | "W*" | "Do" | "MP" | "DP" | "BMC" | "BDC" | "EMC" => {
                // Path construction, painting, marked content and XObject
                // invocation: accepted but render nothing (text-only core,
                // spec.md §1/§4.9).
            }
            other => {
                return Err(Error::MalformedToken {
                    offset: op.offset,
                    reason: format!("unhandled content operator {other:?}"),
                })
            }
        }
    }
    Ok(())
}

fn apply_td(stack: &mut StateStack, tx: f64, ty: f64) {
    let tlm = stack.top().text.text_line_matrix.unwrap_or(Matrix::IDENTITY);
    let new = Matrix::translation(tx, ty).multiply(&tlm);
    let text = &mut stack.top_mut().text;
    text.text_matrix = Some(new);
    text.text_line_matrix = Some(new);
}

fn malformed(op: &ContentOp, what: &str) -> Error {
    Error::MalformedToken {
        offset: op.offset,
        reason: format!("{} operator {:?} missing {what}", op.op, op.op),
    }
}

fn num_operand(op: &ContentOp, idx: usize) -> Result<f64> {
    op.operands
        .get(idx)
        .and_then(ContentValue::as_f64)
        .ok_or_else(|| malformed(op, "numeric operand"))
}

fn numeric_operands(op: &ContentOp) -> Vec<f64> {
    op.operands.iter().filter_map(ContentValue::as_f64).collect()
}

fn matrix_operand(op: &ContentOp) -> Result<Matrix> {
    if op.operands.len() != 6 {
        return Err(malformed(op, "six matrix operands"));
    }
    let mut v = [0.0; 6];
    for (i, slot) in v.iter_mut().enumerate() {
        *slot = op.operands[i].as_f64().ok_or_else(|| malformed(op, "matrix operand"))?;
    }
    Ok(Matrix::new(v[0], v[1], v[2], v[3], v[4], v[5]))
}

fn load_font(
    cache: &ObjectCache,
    resources: Option<&Resource>,
    handle: &FontHandle,
) -> Result<Option<CurrentFont>> {
    let id = match handle {
        FontHandle::Named(name) => resources.and_then(|r| r.font_id(name)),
        FontHandle::Direct(id) => Some(*id),
    };
    let Some(id) = id else { return Ok(None) };
    let font = cache.get_font(id)?;
    Ok(Some(CurrentFont { font }))
}

/// Applies every `ExtGState` field present, in the order §4.9 specifies.
/// The four fields named explicitly unsupported (`D` dash pattern plus
/// `BG`/`BG2`/`UCR`/`UCR2`/`TR`/`HT`/`SMask`/`TK`) raise `Unsupported`;
/// `TR2` is tolerated and otherwise ignored.
fn apply_gs(
    cache: &ObjectCache,
    resources: Option<&Resource>,
    op: &ContentOp,
    stack: &mut StateStack,
    current: &mut Option<CurrentFont>,
) -> Result<()> {
    let name = op.operands[0].as_name().ok_or_else(|| malformed(op, "gs name"))?;
    let Some(id) = resources.and_then(|r| r.ext_gstate_id(name)) else {
        return Ok(());
    };
    let params = cache.get_ext_gstate(id)?;

    for unsupported in ["BG", "BG2", "UCR", "UCR2", "TR", "HT", "SMask", "TK", "D"] {
        if params.get(unsupported).is_some() {
            return Err(Error::Unsupported(unsupported.to_string()));
        }
    }

    let state = stack.top_mut();
    if let Some(v) = params.get("LW").and_then(crate::object::Object::as_f64) {
        state.line_width = v;
    }
    if let Some(v) = params.get("LC").and_then(crate::object::Object::as_i64) {
        state.line_cap = v;
    }
    if let Some(v) = params.get("LJ").and_then(crate::object::Object::as_i64) {
        state.line_join = v;
    }
    if let Some(v) = params.get("ML").and_then(crate::object::Object::as_f64) {
        state.miter_limit = v;
    }
    if let Some(v) = params.get("RI").and_then(crate::object::Object::as_name) {
        state.rendering_intent = v.to_string();
    }
    if let Some(v) = params.get("OP").and_then(crate::object::Object::as_name) {
        let _ = v; // overprint pair: tracked on the params dict only, not a modeled field.
    }
    if let Some(arr) = params.get("Font").and_then(crate::object::Object::as_array) {
        if let (Some(font_ref), Some(size)) = (
            arr.first().and_then(crate::object::Object::as_reference),
            arr.get(1).and_then(crate::object::Object::as_f64),
        ) {
            state.text.font_size = size;
            state.font_ref_override = Some(font_ref);
            *current = load_font(cache, resources, &FontHandle::Direct(font_ref))?;
        }
    }
    if let Some(v) = params.get("FL").and_then(crate::object::Object::as_f64) {
        state.flatness = v;
    }
    if let Some(v) = params.get("SM").and_then(crate::object::Object::as_f64) {
        state.smoothness = v;
    }
    if let Some(v) = params.get("SA").and_then(crate::object::Object::as_bool) {
        state.stroke_adjustment = v;
    }
    if let Some(v) = params.get("BM").and_then(crate::object::Object::as_name) {
        state.blend_mode = v.to_string();
    }
    if let Some(v) = params.get("CA").and_then(crate::object::Object::as_f64) {
        state.stroke_alpha = v;
    }
    if let Some(v) = params.get("ca").and_then(crate::object::Object::as_f64) {
        state.fill_alpha = v;
    }
    if let Some(v) = params.get("AIS").and_then(crate::object::Object::as_bool) {
        state.alpha_is_shape = v;
    }
    Ok(())
}

/// Shows one run of text-string bytes: chunks into character codes of the
/// current font's code width, resolving each to a `Glyph`, emitting a
/// `GlyphDraw` at the glyph's device-space origin, then advancing `Tm`.
fn show_text(
    cache: &ObjectCache,
    stack: &mut StateStack,
    current: Option<&CurrentFont>,
    bytes: &[u8],
    emit: &mut impl FnMut(&GraphicsState, TextEvent) -> Result<()>,
) -> Result<()> {
    let Some(current) = current else {
        return Err(Error::MalformedToken {
            offset: 0,
            reason: "text shown with no current font (missing Tf)".to_string(),
        });
    };
    let width = code_byte_width(&current.font);
    for chunk in bytes.chunks(width) {
        let code = chunk.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
        let glyph = resolve_glyph(&current.font, code, cache)?;

        let text = stack.top().text.clone();
        let tfs = text.font_size;
        let th = text.horiz_scale / 100.0;
        let tm = text.text_matrix.unwrap_or(Matrix::IDENTITY);
        let params = Matrix::new(tfs * th, 0.0, 0.0, tfs, 0.0, text.rise);
        let trm = params.multiply(&tm).multiply(&stack.top().ctm);
        let (x, y) = trm.translation_component();
        emit(
            stack.top(),
            TextEvent::GlyphDraw {
                x,
                y,
                glyph: glyph.clone(),
            },
        )?;

        let tx = ((glyph.width / 1000.0) * tfs + text.char_spacing + text.word_spacing) * th;
        let new_tm = Matrix::translation(tx, 0.0).multiply(&tm);
        stack.top_mut().text.text_matrix = Some(new_tm);
    }
    Ok(())
}
