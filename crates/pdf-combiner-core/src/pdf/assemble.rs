//! Page-level concatenation of parsed documents with lopdf.
//!
//! Every appended document is renumbered above the objects already taken, its
//! page dictionaries are collected in reading order and everything except the
//! page tree and outline is carried over as-is. [`PageAccumulator::finish`]
//! then builds a fresh `Pages` node and `Catalog` around the collected pages.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use super::PdfDocument;
use crate::config::MergeOptions;
use crate::error::{Error, Result};

/// Page attributes a page may inherit from its ancestors in the page tree.
///
/// The source `Pages` nodes are dropped, so these are copied onto each page.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// Output accumulator: append whole documents, then serialize once.
pub struct PageAccumulator {
    /// Next free object number
    max_id: u32,
    /// Page dictionaries in output order
    pages: Vec<(ObjectId, Dictionary)>,
    /// Non page-tree objects of all appended documents
    objects: BTreeMap<ObjectId, Object>,
}

impl Default for PageAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PageAccumulator {
    pub const fn new() -> Self {
        Self {
            max_id: 1,
            pages: Vec::new(),
            objects: BTreeMap::new(),
        }
    }

    /// Number of pages appended so far
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append every page of `document`, in its original order.
    ///
    /// Returns the number of pages added.
    pub fn append_document(&mut self, document: PdfDocument) -> Result<usize> {
        let name = document.name().to_string();
        let mut doc = document.into_inner();

        doc.renumber_objects_with(self.max_id);
        self.max_id = doc.max_id + 1;

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let mut added = Vec::with_capacity(page_ids.len());

        for page_id in page_ids {
            let page = doc
                .get_dictionary(page_id)
                .map_err(|e| Error::Lopdf(format!("page {page_id:?} of '{name}': {e}")))?
                .clone();
            added.push((page_id, inherit_attributes(&doc, page)));
        }

        for (object_id, object) in doc.objects {
            match object.type_name().unwrap_or(b"") {
                b"Catalog" | b"Pages" | b"Page" | b"Outlines" | b"Outline" => {}
                _ => {
                    self.objects.insert(object_id, object);
                }
            }
        }

        debug!("Appended {} pages from '{}'", added.len(), name);
        let count = added.len();
        self.pages.extend(added);
        Ok(count)
    }

    /// Build the page tree and serialize the combined document.
    ///
    /// Fails with [`Error::NoValidSources`] if no page was ever appended.
    pub fn finish(self, options: &MergeOptions) -> Result<Vec<u8>> {
        if self.pages.is_empty() {
            return Err(Error::NoValidSources);
        }

        let mut document = Document::with_version(options.pdf_version.as_str());
        document.objects.extend(self.objects);
        document.max_id = self.max_id.saturating_sub(1);

        let pages_id = document.new_object_id();

        let kids: Vec<Object> = self
            .pages
            .iter()
            .map(|&(id, _)| Object::Reference(id))
            .collect();
        let total_pages = i64::try_from(kids.len())
            .map_err(|_| Error::Lopdf("page count does not fit a PDF integer".to_string()))?;

        for (page_id, mut page) in self.pages {
            page.set("Parent", Object::Reference(pages_id));
            document.objects.insert(page_id, Object::Dictionary(page));
        }

        let pages_dict_obj = Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(total_pages)),
        ]);
        document.objects.insert(pages_id, Object::Dictionary(pages_dict_obj));

        let catalog_id = document.new_object_id();
        let catalog_dict_obj = Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        document.objects.insert(catalog_id, Object::Dictionary(catalog_dict_obj));

        document.trailer.set("Root", Object::Reference(catalog_id));

        // Document info dictionaries of the sources are no longer referenced
        document.prune_objects();
        document.renumber_objects();
        if options.compress {
            document.compress();
        }

        let mut output = Vec::new();
        document
            .save_to(&mut output)
            .map_err(|e| Error::PdfSave(format!("Failed to save combined PDF: {e}")))?;

        Ok(output)
    }
}

/// Copy inheritable attributes from the ancestors of `page` onto it.
fn inherit_attributes(doc: &Document, mut page: Dictionary) -> Dictionary {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let Some(parent_id) = parent else { break };
        let Ok(node) = doc.get_dictionary(parent_id) else { break };

        for key in INHERITABLE {
            if !page.has(key)
                && let Ok(value) = node.get(key)
            {
                page.set(key, value.clone());
            }
        }

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    page
}

// =============================================================================
// Tests
// =============================================================================
