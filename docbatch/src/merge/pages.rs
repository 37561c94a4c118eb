//! Page tree helpers.
//!
//! Lookups and edits on a document's page tree shared by the merger and
//! the splitter:
//! - locating the root `Pages` node
//! - resolving attributes inherited through `/Parent`
//! - reading and writing page boxes
//! - replacing or extending the root's `Kids`

use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;

use crate::error::{DocBatchError, Result};

/// Page attributes a page may inherit from its ancestors.
pub const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"Resources", b"Rotate", b"CropBox"];

/// Page trees deeper than this are treated as cyclic.
const MAX_TREE_DEPTH: usize = 64;

/// A rectangle in PDF user space, origin at the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageBox {
    /// Lower-left x.
    pub left: f64,
    /// Lower-left y.
    pub bottom: f64,
    /// Upper-right x.
    pub right: f64,
    /// Upper-right y.
    pub top: f64,
}

impl PageBox {
    /// Create a box from its corners.
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Parse a `[x0 y0 x1 y1]` array, normalizing swapped corners.
    pub fn from_array(array: &[Object]) -> Option<Self> {
        if array.len() != 4 {
            return None;
        }
        let mut values = [0.0_f64; 4];
        for (slot, obj) in values.iter_mut().zip(array) {
            *slot = number(obj)?;
        }
        let [x0, y0, x1, y1] = values;
        Some(Self::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)))
    }

    /// Render as a PDF rectangle array of reals.
    pub fn to_object(self) -> Object {
        Object::Array(vec![
            Object::Real(self.left as f32),
            Object::Real(self.bottom as f32),
            Object::Real(self.right as f32),
            Object::Real(self.top as f32),
        ])
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

/// Object id of the document's root `Pages` node.
pub fn root_pages_id(doc: &Document) -> Result<ObjectId> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| DocBatchError::merge_failed(format!("Failed to get pages reference: {e}")))
}

fn dictionary(doc: &Document, id: ObjectId) -> Result<&Dictionary> {
    doc.get_object(id)
        .and_then(Object::as_dict)
        .map_err(|e| DocBatchError::merge_failed(format!("Failed to get page dictionary: {e}")))
}

fn dictionary_mut(doc: &mut Document, id: ObjectId) -> Result<&mut Dictionary> {
    doc.get_object_mut(id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| DocBatchError::merge_failed(format!("Failed to get page dictionary: {e}")))
}

/// Look up `key` on a page, walking up `/Parent` links until found.
pub fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut current = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let dict = dictionary(doc, current)?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => current = parent,
            Err(_) => return Ok(None),
        }
    }
    Err(DocBatchError::merge_failed("Page tree is cyclic or too deep"))
}

/// Follow a single level of indirection.
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// The page's effective media box, inherited if necessary.
pub fn media_box(doc: &Document, page_id: ObjectId) -> Result<PageBox> {
    let obj = resolve_inherited(doc, page_id, b"MediaBox")?
        .ok_or_else(|| DocBatchError::merge_failed("MediaBox not found on page or ancestors"))?;
    resolve(doc, obj)
        .as_array()
        .ok()
        .and_then(|array| PageBox::from_array(array))
        .ok_or_else(|| DocBatchError::merge_failed("MediaBox is not a rectangle"))
}

/// A copy of the page dictionary with inherited attributes made explicit.
///
/// The copy no longer depends on its ancestors, so it can be re-parented
/// anywhere in the tree.
pub fn materialized_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut page = dictionary(doc, page_id)?.clone();
    for key in INHERITABLE_KEYS {
        if page.has(key) {
            continue;
        }
        if let Some(value) = resolve_inherited(doc, page_id, key)? {
            page.set(key.to_vec(), value.clone());
        }
    }
    Ok(page)
}

/// Replace the root `Pages` node's children.
pub fn set_root_kids(doc: &mut Document, kids: &[ObjectId], count: usize) -> Result<()> {
    let pages_id = root_pages_id(doc)?;
    let pages = dictionary_mut(doc, pages_id)?;
    pages.set(
        "Kids",
        Object::Array(kids.iter().map(|&id| Object::Reference(id)).collect()),
    );
    pages.set("Count", Object::Integer(count as i64));
    Ok(())
}

/// Hang `subtree` (a `Pages` node already present in `doc`) under the root
/// `Pages` node, after the existing children.
pub fn append_subtree(doc: &mut Document, subtree: ObjectId, page_count: usize) -> Result<()> {
    let pages_id = root_pages_id(doc)?;

    let node = dictionary_mut(doc, subtree)?;
    node.set("Parent", Object::Reference(pages_id));

    let pages = dictionary_mut(doc, pages_id)?;
    let kids = pages
        .get_mut(b"Kids")
        .and_then(Object::as_array_mut)
        .map_err(|_| DocBatchError::merge_failed("Pages dictionary missing Kids array"))?;
    kids.push(Object::Reference(subtree));

    let current_count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
    pages.set("Count", Object::Integer(current_count + page_count as i64));
    Ok(())
}
