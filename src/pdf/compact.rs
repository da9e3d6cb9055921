//! Structural compaction applied before writing a document

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use log::debug;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Which compaction passes run when a document is serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Flate-compress streams that allow it
    pub compress_streams: bool,
    /// Drop objects unreachable from the trailer
    pub prune_objects: bool,
    /// Replace byte-identical streams with a single shared object
    pub dedupe_streams: bool,
    /// Renumber objects densely from 1
    pub renumber_objects: bool,
    /// Pack non-stream objects into compressed object streams with an xref stream
    pub use_object_streams: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            compress_streams: true,
            prune_objects: true,
            dedupe_streams: false,
            renumber_objects: false,
            use_object_streams: false,
        }
    }
}

impl SaveOptions {
    /// Every structural pass, for size reduction
    pub fn compact() -> Self {
        Self {
            compress_streams: true,
            prune_objects: true,
            dedupe_streams: true,
            renumber_objects: true,
            use_object_streams: true,
        }
    }
}

/// Flate level for object streams, lopdf's own default for streams it builds
const OBJECT_STREAM_COMPRESSION_LEVEL: u32 = 6;

/// Run the passes selected by `options` on `doc`
pub(crate) fn apply(doc: &mut Document, options: &SaveOptions) {
    if options.dedupe_streams {
        let merged = dedupe_streams(doc);
        debug!("Merged {} duplicate streams", merged);
    }
    if options.prune_objects {
        let pruned = doc.prune_objects();
        debug!("Pruned {} unreachable objects", pruned.len());
    }
    if options.compress_streams {
        doc.compress();
    }
    if options.renumber_objects {
        doc.renumber_objects();
    }
}

/// Write `doc`, packing objects into object streams when `options` asks for it
pub(crate) fn write(doc: &mut Document, options: &SaveOptions) -> lopdf::Result<Vec<u8>> {
    let mut buffer = Vec::new();

    if options.use_object_streams {
        let writer_options = lopdf::SaveOptions::builder()
            .use_object_streams(true)
            .use_xref_streams(true)
            .compression_level(OBJECT_STREAM_COMPRESSION_LEVEL)
            .build();
        doc.save_with_options(&mut buffer, writer_options)?;
    } else {
        doc.save_to(&mut buffer)?;
    }

    Ok(buffer)
}

/// Point every reference to a duplicate stream at its first occurrence
///
/// Two streams are duplicates when both their dictionaries and their raw
/// content bytes match. Returns the number of objects removed.
pub(crate) fn dedupe_streams(doc: &mut Document) -> usize {
    let mut buckets: HashMap<u64, Vec<ObjectId>> = HashMap::new();
    let mut replacements: BTreeMap<ObjectId, ObjectId> = BTreeMap::new();

    for (&id, object) in doc.objects.iter() {
        let Object::Stream(stream) = object else {
            continue;
        };

        let bucket = buckets.entry(stream_hash(stream)).or_default();
        let original = bucket.iter().copied().find(|candidate| {
            matches!(doc.objects.get(candidate), Some(Object::Stream(other)) if same_stream(stream, other))
        });

        match original {
            Some(original) => {
                replacements.insert(id, original);
            }
            None => bucket.push(id),
        }
    }

    if replacements.is_empty() {
        return 0;
    }

    for object in doc.objects.values_mut() {
        replace_references(object, &replacements);
    }
    for (_, value) in doc.trailer.iter_mut() {
        replace_references(value, &replacements);
    }
    for id in replacements.keys() {
        doc.objects.remove(id);
    }

    replacements.len()
}

fn stream_hash(stream: &Stream) -> u64 {
    let mut hasher = DefaultHasher::new();
    stream.content.hash(&mut hasher);
    format!("{:?}", stream.dict).hash(&mut hasher);
    hasher.finish()
}

fn same_stream(a: &Stream, b: &Stream) -> bool {
    a.content == b.content && format!("{:?}", a.dict) == format!("{:?}", b.dict)
}

fn replace_references(object: &mut Object, replacements: &BTreeMap<ObjectId, ObjectId>) {
    match object {
        Object::Reference(id) => {
            if let Some(new_id) = replacements.get(id) {
                *id = *new_id;
            }
        }
        Object::Array(items) => {
            for item in items.iter_mut() {
                replace_references(item, replacements);
            }
        }
        Object::Dictionary(dict) => replace_in_dictionary(dict, replacements),
        Object::Stream(stream) => replace_in_dictionary(&mut stream.dict, replacements),
        _ => {}
    }
}

fn replace_in_dictionary(dict: &mut Dictionary, replacements: &BTreeMap<ObjectId, ObjectId>) {
    for (_, value) in dict.iter_mut() {
        replace_references(value, replacements);
    }
}
