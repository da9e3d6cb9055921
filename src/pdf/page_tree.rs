//! Page tree navigation helpers for lopdf documents

use lopdf::{Document, Object, ObjectId};
use crate::error::{Error, Result};
use crate::geometry::PageBox;

/// Page attributes a page inherits from its ancestors when it doesn't set them
pub(crate) const INHERITABLE_ATTRIBUTES: [&str; 4] = ["Resources", "MediaBox", "CropBox", "Rotate"];

/// Boxes that are resized together with the MediaBox when they match it
pub(crate) const SECONDARY_BOXES: [&str; 4] = ["CropBox", "BleedBox", "TrimBox", "ArtBox"];

/// Guard against Parent cycles in broken files
const MAX_TREE_DEPTH: usize = 64;

/// Object id of the root Pages node
pub(crate) fn pages_root_id(doc: &Document) -> Result<ObjectId> {
    let catalog = doc.catalog()?;
    let pages = catalog
        .get(b"Pages")
        .map_err(|_| Error::MalformedDocument("No Pages in catalog".to_string()))?;

    pages
        .as_reference()
        .map_err(|_| Error::MalformedDocument("Pages is not a reference".to_string()))
}

/// Page object ids in document order
pub(crate) fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Object id of the page at zero-based `index`
pub(crate) fn page_id(doc: &Document, index: usize) -> Result<ObjectId> {
    let pages = doc.get_pages();
    let count = pages.len();
    pages
        .into_values()
        .nth(index)
        .ok_or(Error::PageOutOfRange { index, count })
}

/// Look up `key` on a page, falling back to its ancestors in the page tree
///
/// Returns the raw value (possibly a reference) from the nearest node that
/// defines it.
pub(crate) fn inherited_attribute(
    doc: &Document,
    page_id: ObjectId,
    key: &str,
) -> Result<Option<Object>> {
    let mut node_id = page_id;

    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(node_id)?;

        if let Ok(value) = node.get(key.as_bytes()) {
            return Ok(Some(value.clone()));
        }

        match node.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent_id) => node_id = parent_id,
            Err(_) => return Ok(None),
        }
    }

    Err(Error::MalformedDocument(format!(
        "Page tree deeper than {} levels (cycle?) above object {:?}",
        MAX_TREE_DEPTH, page_id
    )))
}

/// Read a page box (MediaBox, CropBox, ...) that may be inherited
pub(crate) fn inherited_box(doc: &Document, page_id: ObjectId, key: &str) -> Result<Option<PageBox>> {
    match inherited_attribute(doc, page_id, key)? {
        Some(value) => parse_box(doc, &value).map(Some),
        None => Ok(None),
    }
}

/// Parse `[llx lly urx ury]`, following references for the array and its items
fn parse_box(doc: &Document, value: &Object) -> Result<PageBox> {
    let array = resolve(doc, value)?
        .as_array()
        .map_err(|_| Error::MalformedDocument("Page box is not an array".to_string()))?;

    let coords = array
        .iter()
        .map(|item| resolve(doc, item).ok().and_then(number))
        .collect::<Option<Vec<f64>>>()
        .filter(|coords| coords.len() == 4)
        .ok_or_else(|| Error::MalformedDocument("Page box must hold 4 numbers".to_string()))?;

    Ok(PageBox::from_corners(coords[0], coords[1], coords[2], coords[3]))
}

/// Encode a page box as a PDF array
pub(crate) fn box_object(page_box: &PageBox) -> Object {
    Object::Array(
        [page_box.llx, page_box.lly, page_box.urx, page_box.ury]
            .iter()
            .map(|&v| Object::Real(v as f32))
            .collect(),
    )
}

fn resolve<'a>(doc: &'a Document, value: &'a Object) -> Result<&'a Object> {
    match value {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

fn number(value: &Object) -> Option<f64> {
    match value {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

/// Whether an object is a leaf page dictionary
pub(crate) fn is_page(object: &Object) -> bool {
    object
        .as_dict()
        .ok()
        .and_then(|dict| dict.get(b"Type").ok())
        .and_then(|kind| kind.as_name().ok())
        == Some(&b"Page"[..])
}
