//! Deep copy of page object graphs between lopdf documents
//!
//! Copies a page and everything it references into another document under
//! fresh object ids. The copied page no longer points at its old page tree:
//! inheritable attributes are written onto the page itself and `Parent` is
//! dropped, so the destination never pulls in the rest of the source.

use std::collections::HashMap;
use log::debug;
use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::error::Result;
use super::page_tree::{inherited_attribute, is_page, INHERITABLE_ATTRIBUTES};

/// Copies objects from `source` into `dest`, remembering what was copied
///
/// Objects referenced by several pages copied through the same copier (shared
/// fonts, images) are only copied once.
pub(crate) struct PageCopier<'a> {
    source: &'a Document,
    dest: &'a mut Document,
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'a> PageCopier<'a> {
    pub(crate) fn new(source: &'a Document, dest: &'a mut Document) -> Self {
        Self {
            source,
            dest,
            copied: HashMap::new(),
        }
    }

    /// Copy the page with `page_id` and return its id in the destination
    ///
    /// Every call creates a new page object, even for a page copied before;
    /// only the objects it references are shared.
    pub(crate) fn copy_page(&mut self, page_id: ObjectId) -> Result<ObjectId> {
        let source = self.source;
        let object = source.get_object(page_id)?;

        let new_id = self.dest.new_object_id();
        self.copied.entry(page_id).or_insert(new_id);

        let copy = self.copy_page_object(page_id, object)?;
        self.dest.objects.insert(new_id, copy);
        Ok(new_id)
    }

    fn copy_reference(&mut self, id: ObjectId) -> Result<ObjectId> {
        if let Some(&new_id) = self.copied.get(&id) {
            return Ok(new_id);
        }

        // Reserve the id before descending so cycles resolve to it
        let new_id = self.dest.new_object_id();
        self.copied.insert(id, new_id);

        let source = self.source;
        let copy = match source.get_object(id) {
            Ok(object) if is_page(object) => self.copy_page_object(id, object)?,
            Ok(object) => self.copy_object(object)?,
            Err(_) => {
                debug!("Dangling reference {:?} copied as null", id);
                Object::Null
            }
        };

        self.dest.objects.insert(new_id, copy);
        Ok(new_id)
    }

    fn copy_page_object(&mut self, page_id: ObjectId, object: &Object) -> Result<Object> {
        let mut page = object.as_dict()?.clone();

        for key in INHERITABLE_ATTRIBUTES {
            if page.has(key.as_bytes()) {
                continue;
            }
            if let Some(value) = inherited_attribute(self.source, page_id, key)? {
                page.set(key, value);
            }
        }
        page.remove(b"Parent");

        Ok(Object::Dictionary(self.copy_dictionary(&page)?))
    }

    fn copy_object(&mut self, object: &Object) -> Result<Object> {
        let copy = match object {
            Object::Reference(id) => Object::Reference(self.copy_reference(*id)?),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy_object(item))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(dict)?),
            Object::Stream(stream) => {
                let mut stream = stream.clone();
                stream.dict = self.copy_dictionary(&stream.dict)?;
                Object::Stream(stream)
            }
            other => other.clone(),
        };
        Ok(copy)
    }

    fn copy_dictionary(&mut self, dict: &Dictionary) -> Result<Dictionary> {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            copy.set(key.clone(), self.copy_object(value)?);
        }
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Stream;

    /// Two pages sharing one font, inheriting Resources and MediaBox from the tree
    fn shared_resources_doc() -> (Document, Vec<ObjectId>, ObjectId) {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut font = Dictionary::new();
        font.set("Type", Object::Name(b"Font".to_vec()));
        font.set("Subtype", Object::Name(b"Type1".to_vec()));
        font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
        let font_id = doc.add_object(font);

        let mut page_ids = Vec::new();
        for i in 0..2 {
            let content = format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", i + 1);
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

            let mut page = Dictionary::new();
            page.set("Type", Object::Name(b"Page".to_vec()));
            page.set("Parent", Object::Reference(pages_id));
            page.set("Contents", Object::Reference(content_id));
            page_ids.push(doc.add_object(page));
        }

        let mut fonts = Dictionary::new();
        fonts.set("F1", Object::Reference(font_id));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set(
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        );
        pages.set("Count", Object::Integer(2));
        pages.set("Resources", Object::Dictionary(resources));
        pages.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        );
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        (doc, page_ids, font_id)
    }

    #[test]
    fn test_copied_page_has_no_parent_and_flattened_attributes() {
        let (source, page_ids, _) = shared_resources_doc();
        let mut dest = Document::with_version("1.7");

        let new_id = PageCopier::new(&source, &mut dest).copy_page(page_ids[0]).unwrap();

        let page = dest.get_dictionary(new_id).unwrap();
        assert!(!page.has(b"Parent"));
        assert!(page.has(b"MediaBox"));
        assert!(page.has(b"Resources"));
        assert!(page.has(b"Contents"));
    }

    #[test]
    fn test_shared_objects_copied_once() {
        let (source, page_ids, _) = shared_resources_doc();
        let mut dest = Document::with_version("1.7");

        let mut copier = PageCopier::new(&source, &mut dest);
        copier.copy_page(page_ids[0]).unwrap();
        copier.copy_page(page_ids[1]).unwrap();

        // 2 pages + 2 content streams + 1 shared font
        assert_eq!(dest.objects.len(), 5);
        let fonts = dest
            .objects
            .values()
            .filter(|object| {
                object
                    .as_dict()
                    .ok()
                    .and_then(|d| d.get(b"Type").ok())
                    .and_then(|t| t.as_name().ok())
                    == Some(&b"Font"[..])
            })
            .count();
        assert_eq!(fonts, 1);
    }

    #[test]
    fn test_source_page_tree_not_copied() {
        let (source, page_ids, _) = shared_resources_doc();
        let mut dest = Document::with_version("1.7");

        PageCopier::new(&source, &mut dest).copy_page(page_ids[1]).unwrap();

        let has_pages_node = dest.objects.values().any(|object| {
            object
                .as_dict()
                .ok()
                .and_then(|d| d.get(b"Type").ok())
                .and_then(|t| t.as_name().ok())
                == Some(&b"Pages"[..])
        });
        assert!(!has_pages_node);
    }

    #[test]
    fn test_dangling_reference_becomes_null() {
        let (mut source, page_ids, _) = shared_resources_doc();
        source
            .get_dictionary_mut(page_ids[0])
            .unwrap()
            .set("Thumb", Object::Reference((999, 0)));
        let mut dest = Document::with_version("1.7");

        let new_id = PageCopier::new(&source, &mut dest).copy_page(page_ids[0]).unwrap();

        let thumb_id = dest
            .get_dictionary(new_id)
            .unwrap()
            .get(b"Thumb")
            .unwrap()
            .as_reference()
            .unwrap();
        assert!(matches!(dest.get_object(thumb_id), Ok(Object::Null)));
    }
}
