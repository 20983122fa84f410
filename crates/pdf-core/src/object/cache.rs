//! Object cache: turns an `ObjectId` into a fully consolidated `Object`,
//! decoding streams and resolving compressed (object-stream-packed) objects
//! along the way, and remembers the result so the same id always yields the
//! same in-memory value.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use crate::consolidate::consolidate_object;
use crate::error::{Error, Result};
use crate::filter::{decode_flate, FlateParms};
use crate::lex::object::{lex, LexOutcome};
use crate::object::types::{
    Catalog, Font, FontDescriptor, FontToUnicode, GraphicsStateParameters, Page, PageNode,
    PageTreeNode, Resource,
};
use crate::object::{Dict, Name, Object, ObjectId, Stream};
use crate::xref::{build_xref_table, XrefEntry, XrefTable};

/// Default read window used for the first attempt at lexing an object at a
/// known offset, when no caller-supplied size overrides it. Generous enough
/// for the overwhelming majority of dictionaries and short streams; a
/// `NeedsStreamLength` pause re-reads with the stream's actual length once
/// `Length` is known.
const DEFAULT_READ_WINDOW: usize = 768 * 1024;

pub struct ObjectCache {
    bytes: Arc<[u8]>,
    xref: XrefTable,
    objects: RefCell<HashMap<ObjectId, Object>>,
    read_window: usize,
}

impl ObjectCache {
    pub fn open(bytes: Vec<u8>) -> Result<Self> {
        Self::open_with_read_window(bytes, DEFAULT_READ_WINDOW)
    }

    /// Opens with a caller-supplied read window (`DocumentConfig::read_window`).
    pub fn open_with_read_window(bytes: Vec<u8>, read_window: usize) -> Result<Self> {
        let xref = build_xref_table(&bytes)?;
        Ok(Self {
            bytes: Arc::from(bytes),
            xref,
            objects: RefCell::new(HashMap::new()),
            read_window,
        })
    }

    pub fn trailer(&self) -> &Dict {
        &self.xref.trailer
    }

    pub fn catalog(&self) -> Result<Catalog> {
        let root = self
            .trailer()
            .get(&Name::new("Root"))
            .and_then(Object::as_reference)
            .ok_or_else(|| Error::MalformedToken {
                offset: 0,
                reason: "trailer has no Root entry".to_string(),
            })?;
        let dict = self.resolve_dict(root)?;
        Ok(Catalog::from_dict(dict))
    }

    /// Resolves `id` to its consolidated value, serving from cache on a
    /// repeat lookup. Every typed-record accessor funnels through this, so
    /// resolving the same `(id, gen)` twice always returns an equal value.
    pub fn resolve(&self, id: ObjectId) -> Result<Object> {
        if let Some(obj) = self.objects.borrow().get(&id) {
            return Ok(obj.clone());
        }
        let obj = self.resolve_uncached(id)?;
        self.objects.borrow_mut().insert(id, obj.clone());
        Ok(obj)
    }

    fn resolve_uncached(&self, id: ObjectId) -> Result<Object> {
        match self.xref.lookup(id)? {
            XrefEntry::Offset(offset) => self.resolve_at_offset(id, offset),
            XrefEntry::Compressed { stream_id, index } => self.resolve_compressed(stream_id, index),
        }
    }

    fn resolve_at_offset(&self, id: ObjectId, offset: usize) -> Result<Object> {
        let end = (offset + self.read_window).min(self.bytes.len());
        let window = &self.bytes[offset..end];

        let tokens = match lex(window, offset, None)? {
            LexOutcome::Done(tokens) => tokens,
            LexOutcome::NeedsStreamLength { tokens_so_far } => {
                let (_, header_dict) = crate::consolidate::consolidate_object_header(&tokens_so_far)?;
                let length = self.resolve_length(&header_dict)?;
                match lex(window, offset, Some(length))? {
                    LexOutcome::Done(tokens) => tokens,
                    LexOutcome::NeedsStreamLength { .. } => {
                        // The window was too short to reach `endstream` even
                        // with a known length; retry against the whole file.
                        match lex(&self.bytes[offset..], offset, Some(length))? {
                            LexOutcome::Done(t) => t,
                            LexOutcome::NeedsStreamLength { tokens_so_far } => tokens_so_far,
                        }
                    }
                }
            }
        };

        let (found_id, value) = consolidate_object(&tokens)?;
        if found_id.id != id.id {
            return Err(Error::MalformedToken {
                offset,
                reason: format!("xref points at object {id} but found {found_id}"),
            });
        }
        Ok(value)
    }

    /// `Length` may itself be an indirect reference; this is the one place a
    /// field is resolved before its owning object has finished lexing; the
    /// referenced object must not itself be inside an unresolved stream, which
    /// direct PDF generators always guarantee for `Length`.
    fn resolve_length(&self, header_dict: &Dict) -> Result<usize> {
        let len_obj = header_dict
            .get(&Name::new("Length"))
            .ok_or_else(|| Error::MalformedToken {
                offset: 0,
                reason: "stream dictionary has no Length".to_string(),
            })?;
        let resolved = match len_obj {
            Object::Reference(r) => self.resolve(*r)?,
            other => other.clone(),
        };
        resolved.as_i64().map(|n| n.max(0) as usize).ok_or_else(|| Error::MalformedToken {
            offset: 0,
            reason: "Length did not resolve to an integer".to_string(),
        })
    }

    fn resolve_compressed(&self, stream_id: u32, index: u32) -> Result<Object> {
        let container = self.resolve(ObjectId::new(stream_id, 0))?;
        let stream = container.as_stream().ok_or_else(|| Error::MalformedToken {
            offset: 0,
            reason: format!("object stream {stream_id} is not a stream"),
        })?;
        let decoded = self.decode_stream_object(stream)?;

        let n = stream
            .dict
            .get(&Name::new("N"))
            .and_then(Object::as_i64)
            .unwrap_or(0) as usize;
        let first = stream
            .dict
            .get(&Name::new("First"))
            .and_then(Object::as_i64)
            .unwrap_or(0) as usize;

        let header_tokens = match lex(&decoded[..first.min(decoded.len())], 0, None)? {
            LexOutcome::Done(tokens) => tokens,
            LexOutcome::NeedsStreamLength { tokens_so_far } => tokens_so_far,
        };
        let mut pairs = Vec::with_capacity(n);
        let mut i = 0;
        while i + 1 < header_tokens.len() && pairs.len() < n {
            let Some(obj_id) = header_tokens[i].as_int() else { break };
            let Some(rel_offset) = header_tokens[i + 1].as_int() else { break };
            pairs.push((obj_id as u32, rel_offset as usize));
            i += 2;
        }

        let (_, rel_offset) = pairs.get(index as usize).copied().ok_or_else(|| {
            Error::MalformedToken {
                offset: 0,
                reason: format!("object stream {stream_id} has no entry at index {index}"),
            }
        })?;
        let start = first + rel_offset;
        let tokens = match lex(&decoded[start.min(decoded.len())..], 0, None)? {
            LexOutcome::Done(tokens) => tokens,
            LexOutcome::NeedsStreamLength { tokens_so_far } => tokens_so_far,
        };
        crate::consolidate::consolidate_value(&tokens)
    }

    /// Decodes a stream's raw bytes according to its `Filter`/`DecodeParms`.
    /// Only `FlateDecode` (with predictor absent, 0, or PNG-Up/12) is
    /// understood; anything else is the caller's problem to react to.
    pub fn decode_stream_object(&self, stream: &Stream) -> Result<Vec<u8>> {
        let filter_names = match stream.dict.get(&Name::new("Filter")) {
            None => return Ok(stream.raw.clone()),
            Some(Object::Name(n)) => vec![n.as_str().to_string()],
            Some(Object::Array(items)) => items
                .iter()
                .filter_map(Object::as_name)
                .map(str::to_string)
                .collect(),
            Some(_) => {
                return Err(Error::UnsupportedFilter(
                    "Filter is neither a name nor an array".to_string(),
                ))
            }
        };
        let parms_dict = stream.dict.get(&Name::new("DecodeParms")).and_then(Object::as_dict);

        let mut data = stream.raw.clone();
        for name in filter_names {
            match name.as_str() {
                "FlateDecode" | "Fl" => {
                    let predictor = parms_dict
                        .and_then(|d| d.get(&Name::new("Predictor")))
                        .and_then(Object::as_i64)
                        .unwrap_or(0);
                    let columns = parms_dict
                        .and_then(|d| d.get(&Name::new("Columns")))
                        .and_then(Object::as_i64)
                        .unwrap_or(1) as usize;
                    data = decode_flate(&data, FlateParms { predictor, columns })?;
                }
                other => return Err(Error::UnsupportedFilter(other.to_string())),
            }
        }
        Ok(data)
    }

    pub fn get_decoded_stream(&self, id: ObjectId) -> Result<Vec<u8>> {
        let obj = self.resolve(id)?;
        let stream = obj.as_stream().ok_or_else(|| Error::MalformedToken {
            offset: 0,
            reason: format!("object {id} is not a stream"),
        })?;
        self.decode_stream_object(stream)
    }

    fn resolve_dict(&self, id: ObjectId) -> Result<Dict> {
        let obj = self.resolve(id)?;
        obj.as_dict().cloned().ok_or_else(|| Error::MalformedToken {
            offset: 0,
            reason: format!("object {id} is not a dictionary"),
        })
    }

    fn deref(&self, obj: &Object) -> Result<Object> {
        match obj {
            Object::Reference(id) => self.resolve(*id),
            other => Ok(other.clone()),
        }
    }

    pub fn resolve_page_tree_node(&self, obj: &Object) -> Result<PageTreeNode> {
        let resolved = self.deref(obj)?;
        let dict = resolved.as_dict().ok_or_else(|| Error::MalformedToken {
            offset: 0,
            reason: "Pages did not resolve to a dictionary".to_string(),
        })?;
        Ok(PageTreeNode::from_dict(dict.clone()))
    }

    pub fn get_page_tree_node_by_id(&self, id: ObjectId) -> Result<PageTreeNode> {
        Ok(PageTreeNode::from_dict(self.resolve_dict(id)?))
    }

    pub fn get_page(&self, id: ObjectId) -> Result<Page> {
        Ok(Page::from_dict(self.resolve_dict(id)?))
    }

    /// Distinguishes a `Page` leaf from an interior `Pages` node by the
    /// `Type` entry, falling back to "has Kids => tree" for the rare
    /// dictionary that omits `Type`.
    pub fn classify_page_node(&self, id: ObjectId) -> Result<PageNode> {
        let dict = self.resolve_dict(id)?;
        let is_tree = match dict.get(&Name::new("Type")).and_then(Object::as_name) {
            Some("Pages") => true,
            Some("Page") => false,
            _ => dict.contains_key(&Name::new("Kids")),
        };
        Ok(if is_tree {
            PageNode::Tree(id)
        } else {
            PageNode::Leaf(id)
        })
    }

    pub fn resolve_resource(&self, obj: &Object) -> Result<Resource> {
        let resolved = self.deref(obj)?;
        let dict = resolved.as_dict().ok_or_else(|| Error::MalformedToken {
            offset: 0,
            reason: "Resources did not resolve to a dictionary".to_string(),
        })?;
        Ok(Resource::from_dict(dict.clone()))
    }

    pub fn resolve_font(&self, obj: &Object) -> Result<Font> {
        let resolved = self.deref(obj)?;
        let dict = resolved.as_dict().ok_or_else(|| Error::MalformedToken {
            offset: 0,
            reason: "font entry did not resolve to a dictionary".to_string(),
        })?;
        Font::from_dict(dict.clone())
    }

    pub fn get_font(&self, id: ObjectId) -> Result<Font> {
        Font::from_dict(self.resolve_dict(id)?)
    }

    pub fn resolve_font_descriptor(&self, obj: &Object) -> Result<FontDescriptor> {
        let resolved = self.deref(obj)?;
        let dict = resolved.as_dict().ok_or_else(|| Error::MalformedToken {
            offset: 0,
            reason: "FontDescriptor did not resolve to a dictionary".to_string(),
        })?;
        Ok(FontDescriptor::from_dict(dict.clone()))
    }

    pub fn resolve_font_to_unicode(&self, obj: &Object) -> Result<FontToUnicode> {
        let resolved = self.deref(obj)?;
        let stream = resolved.as_stream().ok_or_else(|| Error::MalformedToken {
            offset: 0,
            reason: "ToUnicode did not resolve to a stream".to_string(),
        })?;
        let bytes = self.decode_stream_object(stream)?;
        Ok(FontToUnicode::from_stream_bytes(bytes))
    }

    /// Loads an `ExtGState` resource by id (`gs` operator, §4.9).
    pub fn get_ext_gstate(&self, id: ObjectId) -> Result<GraphicsStateParameters> {
        Ok(GraphicsStateParameters::from_dict(self.resolve_dict(id)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_pdf() -> Vec<u8> {
        let obj1 = b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n";
        let obj2 = b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n";
        let obj3 = b"3 0 obj\n<< /Type /Page /Parent 2 0 R >>\nendobj\n";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"%PDF-1.7\n");
        let off1 = bytes.len();
        bytes.extend_from_slice(obj1);
        let off2 = bytes.len();
        bytes.extend_from_slice(obj2);
        let off3 = bytes.len();
        bytes.extend_from_slice(obj3);
        let xref_offset = bytes.len();
        bytes.extend_from_slice(b"xref\n0 4\n");
        bytes.extend_from_slice(b"0000000000 65535 f \n");
        bytes.extend_from_slice(format!("{off1:010} 00000 n \n").as_bytes());
        bytes.extend_from_slice(format!("{off2:010} 00000 n \n").as_bytes());
        bytes.extend_from_slice(format!("{off3:010} 00000 n \n").as_bytes());
        bytes.extend_from_slice(b"trailer\n<< /Size 4 /Root 1 0 R >>\n");
        bytes.extend_from_slice(format!("startxref\n{xref_offset}\n%%EOF").as_bytes());
        bytes
    }

    #[test]
    fn resolves_same_object_to_equal_values() {
        let cache = ObjectCache::open(minimal_pdf()).unwrap();
        let a = cache.resolve(ObjectId::new(1, 0)).unwrap();
        let b = cache.resolve(ObjectId::new(1, 0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn walks_page_tree_to_one_leaf() {
        let cache = ObjectCache::open(minimal_pdf()).unwrap();
        let catalog = cache.catalog().unwrap();
        let tree = catalog.pages(&cache).unwrap().unwrap();
        let leaves = tree.leaf_pages(&cache).unwrap();
        assert_eq!(leaves.len(), 1);
    }

    #[test]
    fn caller_supplied_read_window_is_honored() {
        // Smaller than the 768 KiB default, but comfortably larger than any
        // object in `minimal_pdf`.
        let cache = ObjectCache::open_with_read_window(minimal_pdf(), 128).unwrap();
        let obj = cache.resolve(ObjectId::new(1, 0)).unwrap();
        assert!(obj.as_dict().is_some());
    }
}
