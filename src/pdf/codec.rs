//! The document codec boundary
//!
//! Page operations only talk to documents through [`DocumentCodec`]: they
//! ask for page counts and sizes, resize pages, copy pages between
//! documents and serialize. [`LopdfCodec`] is the implementation backed by
//! lopdf.

use log::{debug, warn};
use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::error::{Error, Result};
use crate::geometry::{PageBox, PageSize};
use super::compact::{self, SaveOptions};
use super::copy::PageCopier;
use super::page_tree::{box_object, inherited_box, page_id, page_ids, pages_root_id, SECONDARY_BOXES};

/// Operations the page transformations need from a document format
pub trait DocumentCodec {
    /// An in-memory document
    type Document;
    /// A page copied into a destination document but not yet placed in its page order
    type PageHandle;

    /// Parse bytes into a document; fails with [`Error::CorruptDocument`]
    fn load(&self, bytes: &[u8]) -> Result<Self::Document>;

    /// A valid document with no pages
    fn create_empty(&self) -> Self::Document;

    fn page_count(&self, doc: &Self::Document) -> usize;

    /// Size of the page at zero-based `index`
    fn page_size(&self, doc: &Self::Document, index: usize) -> Result<PageSize>;

    /// Sizes of every page in document order
    fn page_sizes(&self, doc: &Self::Document) -> Result<Vec<PageSize>>;

    /// Change the page box of the page at `index` without touching its content
    fn set_page_size(&self, doc: &mut Self::Document, index: usize, size: PageSize) -> Result<()> {
        self.set_page_sizes(doc, &[(index, size)])
    }

    /// Resize several pages at once, given as `(index, size)` pairs
    ///
    /// Either every page is resized or, on failure, none is.
    fn set_page_sizes(&self, doc: &mut Self::Document, sizes: &[(usize, PageSize)]) -> Result<()>;

    /// Copy pages of `source` into `dest`, returning handles in the order of `indices`
    ///
    /// Copied pages are not part of `dest`'s page order until appended.
    fn copy_pages(
        &self,
        dest: &mut Self::Document,
        source: &Self::Document,
        indices: &[usize],
    ) -> Result<Vec<Self::PageHandle>>;

    /// Add a copied page at the end of `dest`
    fn append_page(&self, dest: &mut Self::Document, page: Self::PageHandle) -> Result<()>;

    /// Write the document; fails with [`Error::Serialization`]
    ///
    /// Compaction works on a copy, so `doc` itself is left as it was.
    fn serialize(&self, doc: &Self::Document, options: &SaveOptions) -> Result<Vec<u8>>;
}

/// [`DocumentCodec`] for PDF files using lopdf
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfCodec;

/// A page object that was copied into a destination document
///
/// Only meaningful for the document it was copied into, and consumed when
/// appended so a page can't be placed twice.
#[derive(Debug)]
pub struct CopiedPage(ObjectId);

impl CopiedPage {
    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl DocumentCodec for LopdfCodec {
    type Document = Document;
    type PageHandle = CopiedPage;

    fn load(&self, bytes: &[u8]) -> Result<Document> {
        let doc = Document::load_mem(bytes).map_err(|e| Error::CorruptDocument(e.to_string()))?;

        // A document we can't find pages in is as good as unreadable
        pages_root_id(&doc).map_err(|e| Error::CorruptDocument(e.to_string()))?;

        debug!("Loaded PDF {} with {} pages", doc.version, doc.get_pages().len());
        Ok(doc)
    }

    fn create_empty(&self) -> Document {
        let mut doc = Document::with_version("1.7");

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Kids", Object::Array(vec![]));
        pages.set("Count", Object::Integer(0));
        let pages_id = doc.add_object(pages);

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(catalog);

        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc
    }

    fn page_count(&self, doc: &Document) -> usize {
        doc.get_pages().len()
    }

    fn page_size(&self, doc: &Document, index: usize) -> Result<PageSize> {
        let page_id = page_id(doc, index)?;
        Ok(media_box(doc, page_id)?.size())
    }

    fn page_sizes(&self, doc: &Document) -> Result<Vec<PageSize>> {
        page_ids(doc)
            .into_iter()
            .map(|page_id| media_box(doc, page_id).map(|media_box| media_box.size()))
            .collect()
    }

    fn set_page_sizes(&self, doc: &mut Document, sizes: &[(usize, PageSize)]) -> Result<()> {
        let ids = page_ids(doc);
        let count = ids.len();

        // Read every box first; writing starts only once nothing can fail
        let updates = sizes
            .iter()
            .map(|&(index, size)| {
                let page_id = *ids.get(index).ok_or(Error::PageOutOfRange { index, count })?;
                BoxUpdate::plan(doc, page_id, size)
            })
            .collect::<Result<Vec<_>>>()?;

        for (update, &(index, size)) in updates.into_iter().zip(sizes) {
            debug!(
                "Page {}: {:.2}x{:.2} -> {:.2}x{:.2}",
                index + 1,
                update.old_size.width,
                update.old_size.height,
                size.width,
                size.height
            );
            update.apply(doc)?;
        }
        Ok(())
    }

    fn copy_pages(&self, dest: &mut Document, source: &Document, indices: &[usize]) -> Result<Vec<CopiedPage>> {
        let source_pages = page_ids(source);
        let count = source_pages.len();

        // Resolve every index before writing anything into dest
        let ids = indices
            .iter()
            .map(|&index| {
                source_pages
                    .get(index)
                    .copied()
                    .ok_or(Error::PageOutOfRange { index, count })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut copier = PageCopier::new(source, dest);
        ids.into_iter()
            .map(|id| copier.copy_page(id).map(CopiedPage))
            .collect()
    }

    fn append_page(&self, dest: &mut Document, page: CopiedPage) -> Result<()> {
        let pages_id = pages_root_id(dest)?;

        dest.get_dictionary_mut(page.0)?
            .set("Parent", Object::Reference(pages_id));

        let pages = dest.get_dictionary_mut(pages_id)?;
        if !matches!(pages.get(b"Kids"), Ok(Object::Array(_))) {
            pages.set("Kids", Object::Array(vec![]));
        }
        if let Ok(Object::Array(kids)) = pages.get_mut(b"Kids") {
            kids.push(Object::Reference(page.0));
        }
        let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
        pages.set("Count", Object::Integer(count + 1));
        Ok(())
    }

    fn serialize(&self, doc: &Document, options: &SaveOptions) -> Result<Vec<u8>> {
        let mut working = doc.clone();
        compact::apply(&mut working, options);

        let buffer = compact::write(&mut working, options)
            .map_err(|e| Error::Serialization(e.to_string()))?;

        debug!("Serialized {} bytes", buffer.len());
        Ok(buffer)
    }
}

/// New boxes for one page, computed before anything is written
struct BoxUpdate {
    page_id: ObjectId,
    old_size: PageSize,
    media_box: PageBox,
    /// Secondary boxes that matched the old MediaBox
    following: Vec<&'static str>,
}

impl BoxUpdate {
    fn plan(doc: &Document, page_id: ObjectId, size: PageSize) -> Result<Self> {
        let old_media_box = media_box(doc, page_id)?;

        // Boxes equal to the MediaBox follow it, others keep their own geometry
        let mut following = Vec::new();
        for key in SECONDARY_BOXES {
            if let Some(page_box) = inherited_box(doc, page_id, key)? {
                if page_box.approx_eq(&old_media_box) {
                    following.push(key);
                }
            }
        }

        Ok(Self {
            page_id,
            old_size: old_media_box.size(),
            media_box: old_media_box.with_size(size),
            following,
        })
    }

    fn apply(self, doc: &mut Document) -> Result<()> {
        let page = doc.get_dictionary_mut(self.page_id)?;
        page.set("MediaBox", box_object(&self.media_box));
        for key in self.following {
            page.set(key, box_object(&self.media_box));
        }
        Ok(())
    }
}

/// The page's MediaBox, or US Letter when neither the page nor its ancestors set one
fn media_box(doc: &Document, page_id: ObjectId) -> Result<PageBox> {
    match inherited_box(doc, page_id, "MediaBox")? {
        Some(page_box) => Ok(page_box),
        None => {
            warn!("Page {:?} has no MediaBox, assuming US Letter", page_id);
            let letter = PageSize::letter();
            Ok(PageBox::from_corners(0.0, 0.0, letter.width, letter.height))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter_page(doc: &mut Document) -> ObjectId {
        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set(
            "MediaBox",
            box_object(&PageBox::from_corners(0.0, 0.0, 612.0, 792.0)),
        );
        page.set(
            "CropBox",
            box_object(&PageBox::from_corners(0.0, 0.0, 612.0, 792.0)),
        );
        page.set(
            "TrimBox",
            box_object(&PageBox::from_corners(10.0, 10.0, 602.0, 782.0)),
        );
        doc.add_object(page)
    }

    fn one_page_doc() -> Document {
        let codec = LopdfCodec;
        let mut doc = codec.create_empty();
        let page_id = letter_page(&mut doc);
        codec.append_page(&mut doc, CopiedPage(page_id)).unwrap();
        doc
    }

    #[test]
    fn test_create_empty_has_no_pages() {
        let codec = LopdfCodec;
        let doc = codec.create_empty();
        assert_eq!(codec.page_count(&doc), 0);

        let bytes = codec.serialize(&doc, &SaveOptions::default()).unwrap();
        let reloaded = codec.load(&bytes).unwrap();
        assert_eq!(codec.page_count(&reloaded), 0);
    }

    #[test]
    fn test_load_garbage_is_corrupt() {
        let result = LopdfCodec.load(b"definitely not a pdf");
        assert!(matches!(result, Err(Error::CorruptDocument(_))));
    }

    #[test]
    fn test_set_page_size_moves_matching_boxes_only() {
        let codec = LopdfCodec;
        let mut doc = one_page_doc();

        codec.set_page_size(&mut doc, 0, PageSize::new(306.0, 396.0)).unwrap();
        assert_eq!(codec.page_size(&doc, 0).unwrap(), PageSize::new(306.0, 396.0));

        let page_id = page_ids(&doc)[0];
        let crop = inherited_box(&doc, page_id, "CropBox").unwrap().unwrap();
        let trim = inherited_box(&doc, page_id, "TrimBox").unwrap().unwrap();
        assert!(crop.approx_eq(&PageBox::from_corners(0.0, 0.0, 306.0, 396.0)));
        assert!(trim.approx_eq(&PageBox::from_corners(10.0, 10.0, 602.0, 782.0)));
    }

    #[test]
    fn test_set_page_sizes_is_all_or_nothing() {
        let codec = LopdfCodec;
        let mut doc = one_page_doc();
        let second = letter_page(&mut doc);
        codec.append_page(&mut doc, CopiedPage(second)).unwrap();
        doc.get_dictionary_mut(second).unwrap().set(
            "CropBox",
            Object::Array(vec![Object::Integer(0), Object::Name(b"Bad".to_vec())]),
        );

        let half = PageSize::new(306.0, 396.0);
        let result = codec.set_page_sizes(&mut doc, &[(0, half), (1, half)]);

        assert!(result.is_err());
        assert_eq!(codec.page_size(&doc, 0).unwrap(), PageSize::letter());
        assert_eq!(codec.page_size(&doc, 1).unwrap(), PageSize::letter());
    }

    #[test]
    fn test_set_page_sizes_rejects_bad_index_without_writing() {
        let codec = LopdfCodec;
        let mut doc = one_page_doc();

        let result = codec.set_page_sizes(&mut doc, &[(0, PageSize::a4()), (4, PageSize::a4())]);

        assert!(matches!(result, Err(Error::PageOutOfRange { index: 4, count: 1 })));
        assert_eq!(codec.page_size(&doc, 0).unwrap(), PageSize::letter());
    }

    #[test]
    fn test_page_sizes_in_document_order() {
        let codec = LopdfCodec;
        let mut doc = one_page_doc();
        let second = letter_page(&mut doc);
        codec.append_page(&mut doc, CopiedPage(second)).unwrap();
        codec.set_page_size(&mut doc, 1, PageSize::a4()).unwrap();

        assert_eq!(codec.page_sizes(&doc).unwrap(), vec![PageSize::letter(), PageSize::a4()]);
    }

    #[test]
    fn test_serialize_leaves_document_untouched() {
        let codec = LopdfCodec;
        let mut doc = one_page_doc();
        let orphan = doc.add_object(Object::Integer(42));
        let ids_before: Vec<ObjectId> = doc.objects.keys().copied().collect();

        let bytes = codec.serialize(&doc, &SaveOptions::compact()).unwrap();

        let ids_after: Vec<ObjectId> = doc.objects.keys().copied().collect();
        assert_eq!(ids_before, ids_after);
        assert!(doc.objects.contains_key(&orphan));
        assert_eq!(codec.page_count(&codec.load(&bytes).unwrap()), 1);
    }

    #[test]
    fn test_page_index_out_of_range() {
        let codec = LopdfCodec;
        let mut doc = one_page_doc();
        assert!(matches!(
            codec.page_size(&doc, 3),
            Err(Error::PageOutOfRange { index: 3, count: 1 })
        ));
        assert!(codec.set_page_size(&mut doc, 1, PageSize::letter()).is_err());
    }

    #[test]
    fn test_copy_pages_rejects_bad_index_without_writing() {
        let codec = LopdfCodec;
        let source = one_page_doc();
        let mut dest = codec.create_empty();
        let objects_before = dest.objects.len();

        let result = codec.copy_pages(&mut dest, &source, &[0, 5]);
        assert!(matches!(result, Err(Error::PageOutOfRange { index: 5, .. })));
        assert_eq!(dest.objects.len(), objects_before);
    }

    #[test]
    fn test_copy_and_append_keeps_order() {
        let codec = LopdfCodec;
        let source = one_page_doc();
        let mut dest = codec.create_empty();

        let pages = codec.copy_pages(&mut dest, &source, &[0, 0]).unwrap();
        assert_eq!(pages.len(), 2);
        assert_ne!(pages[0].object_id(), pages[1].object_id());

        for page in pages {
            codec.append_page(&mut dest, page).unwrap();
        }
        assert_eq!(codec.page_count(&dest), 2);
        assert_eq!(codec.page_size(&dest, 1).unwrap(), PageSize::letter());
    }
}
