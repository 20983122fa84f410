//! Typed document records, lazily resolved against the object cache.
//!
//! Each record wraps the dictionary it was built from plus a handful of
//! `LazyField` slots for fields whose declared type is another typed
//! record. Scalars and already-decoded collections are read straight off
//! `dict` with no lazy indirection; promotion only matters where a field
//! might be an indirect reference to something this crate models as a
//! first-class type.

use std::cell::RefCell;

use crate::error::{Error, Result};
use crate::lex::cmap::{build_mapper, CMapData, CidRanges};
use crate::object::cache::ObjectCache;
use crate::object::field::{FieldRef, LazyField};
use crate::object::{Dict, Name, Object, ObjectId};

fn field_raw(dict: &Dict, key: &str) -> FieldRef<Object> {
    // This crate never needs to "resolve" a field into the generic Object
    // type itself (that would be circular); `field_raw` is only used as the
    // seed value for record-typed LazyFields below.
    FieldRef::raw(dict.get(&Name::new(key)).cloned())
}

/// Root document object: links to the page tree plus assorted metadata.
#[derive(Debug)]
pub struct Catalog {
    pub dict: Dict,
    pages: LazyField<PageTreeNode>,
}

impl Catalog {
    pub fn from_dict(dict: Dict) -> Self {
        let pages = field_raw(&dict, "Pages");
        Self {
            pages: LazyField::new(pages),
            dict,
        }
    }

    pub fn pages(&self, cache: &ObjectCache) -> Result<Option<PageTreeNode>> {
        self.pages.get(|obj| cache.resolve_page_tree_node(obj))
    }
}

/// An interior page-tree node, or one of its leaves.
#[derive(Debug, Clone)]
pub enum PageNode {
    Tree(ObjectId),
    Leaf(ObjectId),
}

#[derive(Debug)]
pub struct PageTreeNode {
    pub dict: Dict,
    pub count: Option<i64>,
    kids_raw: Option<Object>,
}

impl PageTreeNode {
    pub fn from_dict(dict: Dict) -> Self {
        let count = dict.get(&Name::new("Count")).and_then(Object::as_i64);
        let kids_raw = dict.get(&Name::new("Kids")).cloned();
        Self {
            dict,
            count,
            kids_raw,
        }
    }

    /// Direct children as `(is-leaf, object-id)` pairs, resolved just far
    /// enough to tell a `Page` apart from another `PageTreeNode`; full
    /// resolution happens during the depth-first walk in `leaf_pages`.
    fn kid_ids(&self, cache: &ObjectCache) -> Result<Vec<ObjectId>> {
        let Some(kids) = &self.kids_raw else {
            return Ok(Vec::new());
        };
        let arr = kids.as_array().ok_or_else(|| Error::MalformedToken {
            offset: 0,
            reason: "Kids is not an array".to_string(),
        })?;
        Ok(arr.iter().filter_map(Object::as_reference).collect())
    }

    /// Depth-first, in-order leaf enumeration (spec's page-tree traversal):
    /// visits `Kids` left to right, recursing into interior nodes and
    /// collecting `Page` leaves.
    pub fn leaf_pages(&self, cache: &ObjectCache) -> Result<Vec<Page>> {
        let mut out = Vec::new();
        for id in self.kid_ids(cache)? {
            Self::walk(cache, id, &mut out, 0)?;
        }
        Ok(out)
    }

    fn walk(cache: &ObjectCache, id: ObjectId, out: &mut Vec<Page>, depth: u32) -> Result<()> {
        // A malformed Kids cycle would otherwise recurse forever.
        const MAX_DEPTH: u32 = 64;
        if depth > MAX_DEPTH {
            return Err(Error::MalformedToken {
                offset: 0,
                reason: "page tree exceeds maximum nesting depth".to_string(),
            });
        }
        match cache.classify_page_node(id)? {
            PageNode::Leaf(leaf_id) => out.push(cache.get_page(leaf_id)?),
            PageNode::Tree(tree_id) => {
                let node = cache.get_page_tree_node_by_id(tree_id)?;
                for child in node.kid_ids(cache)? {
                    Self::walk(cache, child, out, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

/// A leaf page: content streams plus an inheritable `Resources` dictionary.
#[derive(Debug)]
pub struct Page {
    pub dict: Dict,
    resources: LazyField<Resource>,
}

impl Page {
    pub fn from_dict(dict: Dict) -> Self {
        let resources = field_raw(&dict, "Resources");
        Self {
            resources: LazyField::new(resources),
            dict,
        }
    }

    pub fn resources(&self, cache: &ObjectCache) -> Result<Option<Resource>> {
        self.resources.get(|obj| cache.resolve_resource(obj))
    }

    /// Concatenates every `Contents` stream with a single-space separator
    /// between streams, per the cross-content-stream token boundary rule.
    pub fn content_bytes(&self, cache: &ObjectCache) -> Result<Vec<u8>> {
        let Some(contents) = self.dict.get(&Name::new("Contents")) else {
            return Ok(Vec::new());
        };
        let ids: Vec<ObjectId> = match contents {
            Object::Reference(id) => vec![*id],
            Object::Array(items) => items.iter().filter_map(Object::as_reference).collect(),
            _ => {
                return Err(Error::MalformedToken {
                    offset: 0,
                    reason: "Contents is neither a reference nor an array".to_string(),
                })
            }
        };
        let mut out = Vec::new();
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                out.push(b' ');
            }
            out.extend_from_slice(&cache.get_decoded_stream(*id)?);
        }
        Ok(out)
    }
}

/// Bag of sub-resources keyed by local name within one category
/// (`Font`, `ExtGState`, `XObject`, ...).
#[derive(Debug)]
pub struct Resource {
    pub dict: Dict,
}

impl Resource {
    pub fn from_dict(dict: Dict) -> Self {
        Self { dict }
    }

    fn category(&self, category: &str) -> Option<&Dict> {
        self.dict.get(&Name::new(category)).and_then(Object::as_dict)
    }

    pub fn font_id(&self, local_name: &str) -> Option<ObjectId> {
        self.category("Font")
            .and_then(|d| d.get(&Name::new(local_name)))
            .and_then(Object::as_reference)
    }

    pub fn ext_gstate_id(&self, local_name: &str) -> Option<ObjectId> {
        self.category("ExtGState")
            .and_then(|d| d.get(&Name::new(local_name)))
            .and_then(Object::as_reference)
    }

    pub fn xobject_id(&self, local_name: &str) -> Option<ObjectId> {
        self.category("XObject")
            .and_then(|d| d.get(&Name::new(local_name)))
            .and_then(Object::as_reference)
    }
}

/// The six font-dictionary variants dispatched on `Subtype`, sharing the
/// fields every converter needs plus the ones specific to a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind {
    Type1,
    Type3,
    TrueType,
    Type0,
    CidType0,
    CidType2,
}

#[derive(Debug)]
pub struct Font {
    pub kind: FontKind,
    pub dict: Dict,
    pub base_font: Option<String>,
    pub first_char: Option<i64>,
    pub last_char: Option<i64>,
    pub widths: Vec<f64>,
    descriptor: LazyField<FontDescriptor>,
    to_unicode: LazyField<FontToUnicode>,
    /// `Type0` only: the single descendant CIDFont dictionary.
    descendant: LazyField<Font>,
    /// The `W` array for `Type0` descendants, left raw for `font::width`
    /// to consume directly (it needs the full `Object`, not a promoted
    /// typed record).
    pub w_array: Option<Object>,
    pub dw: Option<f64>,
}

impl Font {
    pub fn from_dict(dict: Dict) -> Result<Self> {
        let subtype = dict
            .get(&Name::new("Subtype"))
            .and_then(Object::as_name)
            .unwrap_or("");
        let kind = match subtype {
            "Type1" | "MMType1" => FontKind::Type1,
            "Type3" => FontKind::Type3,
            "TrueType" => FontKind::TrueType,
            "Type0" => FontKind::Type0,
            "CIDFontType0" => FontKind::CidType0,
            "CIDFontType2" => FontKind::CidType2,
            other => {
                return Err(Error::UnknownEncoding(format!(
                    "unrecognized font Subtype {other:?}"
                )))
            }
        };
        let base_font = dict
            .get(&Name::new("BaseFont"))
            .and_then(Object::as_name)
            .map(str::to_string);
        let first_char = dict.get(&Name::new("FirstChar")).and_then(Object::as_i64);
        let last_char = dict.get(&Name::new("LastChar")).and_then(Object::as_i64);
        let widths = dict
            .get(&Name::new("Widths"))
            .and_then(Object::as_array)
            .map(|a| a.iter().filter_map(Object::as_f64).collect())
            .unwrap_or_default();
        let dw = dict.get(&Name::new("DW")).and_then(Object::as_f64);
        let w_array = dict.get(&Name::new("W")).cloned();

        let descendant = if kind == FontKind::Type0 {
            let first = dict
                .get(&Name::new("DescendantFonts"))
                .and_then(Object::as_array)
                .and_then(|a| a.first())
                .cloned();
            FieldRef::raw(first)
        } else {
            FieldRef::Absent
        };

        let descriptor = field_raw(&dict, "FontDescriptor");
        let to_unicode = field_raw(&dict, "ToUnicode");

        Ok(Self {
            kind,
            base_font,
            first_char,
            last_char,
            widths,
            descriptor: LazyField::new(descriptor),
            to_unicode: LazyField::new(to_unicode),
            descendant: LazyField::new(descendant),
            w_array,
            dw,
            dict,
        })
    }

    pub fn encoding_name(&self) -> Option<&str> {
        self.dict.get(&Name::new("Encoding")).and_then(Object::as_name)
    }

    pub fn encoding_dict_id(&self) -> Option<ObjectId> {
        self.dict.get(&Name::new("Encoding")).and_then(Object::as_reference)
    }

    pub fn descriptor(&self, cache: &ObjectCache) -> Result<Option<FontDescriptor>> {
        self.descriptor.get(|obj| cache.resolve_font_descriptor(obj))
    }

    pub fn to_unicode(&self, cache: &ObjectCache) -> Result<Option<FontToUnicode>> {
        self.to_unicode.get(|obj| cache.resolve_font_to_unicode(obj))
    }

    pub fn descendant(&self, cache: &ObjectCache) -> Result<Option<Font>> {
        self.descendant.get(|obj| cache.resolve_font(obj))
    }
}

#[derive(Debug)]
pub struct FontDescriptor {
    pub dict: Dict,
}

impl FontDescriptor {
    pub fn from_dict(dict: Dict) -> Self {
        Self { dict }
    }
}

/// A `/Encoding` dictionary: base encoding name plus a `Differences` array.
#[derive(Debug)]
pub struct FontEncoding {
    pub dict: Dict,
    pub base_encoding: Option<String>,
    differences: RefCell<Option<std::collections::HashMap<i64, String>>>,
}

impl FontEncoding {
    pub fn from_dict(dict: Dict) -> Self {
        let base_encoding = dict
            .get(&Name::new("BaseEncoding"))
            .and_then(Object::as_name)
            .map(str::to_string);
        Self {
            base_encoding,
            differences: RefCell::new(None),
            dict,
        }
    }

    /// Builds (once) the code->glyph-name map from `Differences`: the array
    /// interleaves integer start-codes and runs of glyph names, each name
    /// auto-incrementing the running code.
    pub fn differences(&self) -> std::collections::HashMap<i64, String> {
        if let Some(map) = self.differences.borrow().as_ref() {
            return map.clone();
        }
        let mut map = std::collections::HashMap::new();
        if let Some(arr) = self
            .dict
            .get(&Name::new("Differences"))
            .and_then(Object::as_array)
        {
            let mut code = 0i64;
            for item in arr {
                match item {
                    Object::Number(_) => code = item.as_i64().unwrap_or(code),
                    Object::Name(n) => {
                        map.insert(code, n.as_str().to_string());
                        code += 1;
                    }
                    _ => {}
                }
            }
        }
        *self.differences.borrow_mut() = Some(map.clone());
        map
    }
}

/// A `ToUnicode` CMap stream. The parsed mapper is cached on first use.
#[derive(Debug)]
pub struct FontToUnicode {
    pub raw: Vec<u8>,
    mapper: RefCell<Option<(CMapData, CidRanges)>>,
}

impl FontToUnicode {
    pub fn from_stream_bytes(raw: Vec<u8>) -> Self {
        Self {
            raw,
            mapper: RefCell::new(None),
        }
    }

    pub fn lookup(&self, code: u32) -> Result<String> {
        if self.mapper.borrow().is_none() {
            let text = String::from_utf8_lossy(&self.raw).into_owned();
            let built = build_mapper(&text);
            *self.mapper.borrow_mut() = Some(built);
        }
        let borrow = self.mapper.borrow();
        let (map, _) = borrow.as_ref().unwrap();
        map.lookup(code)
    }
}

#[derive(Debug)]
pub struct XObjectImage {
    pub dict: Dict,
    pub raw: Vec<u8>,
}

#[derive(Debug)]
pub struct XObjectForm {
    pub dict: Dict,
    pub raw: Vec<u8>,
}

/// A decoded content stream (already filter-applied).
#[derive(Debug, Clone)]
pub struct Content {
    pub bytes: Vec<u8>,
}

/// Resolved `ExtGState` parameters.
#[derive(Debug)]
pub struct GraphicsStateParameters {
    pub dict: Dict,
}

impl GraphicsStateParameters {
    pub fn from_dict(dict: Dict) -> Self {
        Self { dict }
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.dict.get(&Name::new(key))
    }
}

/// `(character-id, unicode-string, advance-width)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub cid: u32,
    pub unicode: String,
    pub width: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn differences_array_auto_increments_codes() {
        let mut dict = Dict::new();
        dict.insert(
            Name::new("Differences"),
            Object::Array(vec![
                Object::Number(crate::object::Number::Int(10)),
                Object::Name(Name::new("a")),
                Object::Name(Name::new("b")),
                Object::Number(crate::object::Number::Int(20)),
                Object::Name(Name::new("z")),
            ]),
        );
        let enc = FontEncoding::from_dict(dict);
        let diffs = enc.differences();
        assert_eq!(diffs.get(&10), Some(&"a".to_string()));
        assert_eq!(diffs.get(&11), Some(&"b".to_string()));
        assert_eq!(diffs.get(&20), Some(&"z".to_string()));
    }
}
