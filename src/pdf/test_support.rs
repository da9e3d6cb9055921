//! In-memory PDF fixtures for unit tests

use lopdf::{Dictionary, Document, Object, Stream, StringFormat};
use crate::geometry::{PageBox, PageSize};
use super::codec::{DocumentCodec, LopdfCodec};
use super::page_tree::box_object;

/// Build a PDF whose pages have the given sizes, labelled "p1", "p2", ...
pub(crate) fn pdf_with_pages(sizes: &[PageSize]) -> Vec<u8> {
    let labels: Vec<String> = (1..=sizes.len()).map(|i| format!("p{}", i)).collect();
    let pages: Vec<(&str, PageSize)> = labels
        .iter()
        .map(String::as_str)
        .zip(sizes.iter().copied())
        .collect();
    labelled_pdf(&pages)
}

/// Build a PDF with one page per `(label, size)`
///
/// The label is stored under a `/TestLabel` key on the page dictionary and
/// also drawn as text so each page has its own content stream.
pub(crate) fn labelled_pdf(pages: &[(&str, PageSize)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    let font_id = doc.add_object(font);

    let mut fonts = Dictionary::new();
    fonts.set("F1", Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));
    let resources_id = doc.add_object(resources);

    let mut kids = Vec::new();
    for (label, size) in pages {
        let content = format!("BT /F1 24 Tf 72 72 Td ({}) Tj ET", label);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set(
            "MediaBox",
            box_object(&PageBox::from_corners(0.0, 0.0, size.width, size.height)),
        );
        page.set("Contents", Object::Reference(content_id));
        page.set("Resources", Object::Reference(resources_id));
        page.set(
            "TestLabel",
            Object::String(label.as_bytes().to_vec(), StringFormat::Literal),
        );
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", Object::Integer(kids.len() as i64));
    pages_dict.set("Kids", Object::Array(kids));
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("fixture PDF should serialize");
    buffer
}

/// Page sizes of PDF bytes, in page order
pub(crate) fn page_sizes(bytes: &[u8]) -> Vec<PageSize> {
    let codec = LopdfCodec;
    let doc = codec.load(bytes).expect("output should be a valid PDF");
    codec.page_sizes(&doc).expect("pages should have sizes")
}

/// `/TestLabel` of every page, in page order
pub(crate) fn page_labels(bytes: &[u8]) -> Vec<String> {
    let doc = LopdfCodec.load(bytes).expect("output should be a valid PDF");
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).expect("page should be a dictionary");
            let label = page
                .get(b"TestLabel")
                .and_then(Object::as_str)
                .expect("page should carry a label");
            String::from_utf8_lossy(label).into_owned()
        })
        .collect()
}
