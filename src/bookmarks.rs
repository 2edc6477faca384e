//! Outline (bookmark) injection for rendered reports, built on top of `lopdf`.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};

use crate::model::ReportPage;

/// Errors that can occur while embedding bookmarks into a rendered PDF document.
#[derive(Debug)]
pub enum BookmarkError {
    /// The PDF bytes could not be parsed by `lopdf`.
    Parse(lopdf::Error),
    /// A required catalog entry was missing from the document trailer.
    MissingCatalog,
    /// The catalog object was not a dictionary, preventing outline injection.
    InvalidCatalog,
    /// A bookmarked page did not exist in the rendered document.
    MissingPage {
        /// The requested (1-indexed) page number that could not be resolved.
        page_number: usize,
    },
}

impl From<lopdf::Error> for BookmarkError {
    fn from(err: lopdf::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for BookmarkError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.into())
    }
}

impl std::fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "Failed to parse PDF bytes: {err}"),
            Self::MissingCatalog => write!(f, "PDF catalog entry is missing"),
            Self::InvalidCatalog => write!(f, "PDF catalog entry is not a dictionary"),
            Self::MissingPage { page_number } => {
                write!(f, "Bookmark refers to missing page {page_number}")
            }
        }
    }
}

impl std::error::Error for BookmarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::MissingCatalog | Self::InvalidCatalog | Self::MissingPage { .. } => None,
        }
    }
}

/// Pairs each titled report page with the PDF page it lands on.
///
/// Body pages follow the cover, so the image at index `i` sits on page `i + 2`.
pub fn page_bookmarks(pages: &[ReportPage]) -> Vec<(usize, String)> {
    pages
        .iter()
        .enumerate()
        .filter_map(|(index, page)| page.title().map(|title| (index + 2, title.to_owned())))
        .collect()
}

/// Adds a flat outline with one `/Dest [page /Fit]` entry per `(page_number, title)` pair.
///
/// Returns the input unchanged when there is nothing to bookmark.
pub fn apply_page_bookmarks(
    pdf_bytes: &[u8],
    bookmarks: &[(usize, String)],
) -> Result<Vec<u8>, BookmarkError> {
    if bookmarks.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let pages = document.get_pages();
    let mut outline_entries = collect_outline_entries(&mut document, bookmarks, &pages)?;

    let outlines_id = document.new_object_id();
    link_outline_entries(outlines_id, &mut document, &mut outline_entries);
    insert_outlines_root(outlines_id, &mut document, &outline_entries)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Encodes `text` as a PDF text string: UTF-16BE behind a byte order mark.
///
/// Raw UTF-8 would be read as PDFDocEncoding and garble anything outside ASCII.
fn encode_text_string(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}

struct OutlineEntry {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
}

fn collect_outline_entries(
    document: &mut Document,
    bookmarks: &[(usize, String)],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<OutlineEntry>, BookmarkError> {
    let mut entries = Vec::with_capacity(bookmarks.len());

    for (page_number, title) in bookmarks {
        let page_ref = u32::try_from(*page_number)
            .ok()
            .and_then(|number| pages.get(&number).copied())
            .ok_or(BookmarkError::MissingPage {
                page_number: *page_number,
            })?;

        entries.push(OutlineEntry {
            object_id: document.new_object_id(),
            page_ref,
            title: title.clone(),
        });
    }

    Ok(entries)
}

fn link_outline_entries(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &mut [OutlineEntry],
) {
    for index in 0..entries.len() {
        let mut dictionary = Dictionary::new();
        dictionary.set("Title", encode_text_string(&entries[index].title));
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(entries[index].page_ref),
                Object::Name("Fit".into()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));

        if index > 0 {
            dictionary.set("Prev", Object::Reference(entries[index - 1].object_id));
        }

        if index + 1 < entries.len() {
            dictionary.set("Next", Object::Reference(entries[index + 1].object_id));
        }

        document
            .objects
            .insert(entries[index].object_id, Object::Dictionary(dictionary));
    }
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &[OutlineEntry],
) -> Result<(), BookmarkError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)?;

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Outlines".into()));
    dictionary.set("Count", Object::Integer(entries.len() as i64));
    if let Some(first) = entries.first() {
        dictionary.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = entries.last() {
        dictionary.set("Last", Object::Reference(last.object_id));
    }

    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));
    catalog.set("PageMode", Object::Name("UseOutlines".into()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_titled_pages_are_bookmarked() {
        let pages = vec![
            ReportPage::new("hours.png").with_title(Some("Access hours".to_owned())),
            ReportPage::new("untitled.png"),
            ReportPage::new("days.png").with_title(Some("Access days".to_owned())),
        ];
        assert_eq!(
            page_bookmarks(&pages),
            vec![
                (2, "Access hours".to_owned()),
                (4, "Access days".to_owned())
            ]
        );
    }

    #[test]
    fn titles_are_utf16_with_byte_order_mark() {
        match encode_text_string("Días") {
            Object::String(bytes, StringFormat::Hexadecimal) => assert_eq!(
                bytes,
                vec![0xFE, 0xFF, 0x00, 0x44, 0x00, 0xED, 0x00, 0x61, 0x00, 0x73]
            ),
            other => panic!("unexpected title object: {other:?}"),
        }
    }

    #[test]
    fn no_bookmarks_leaves_bytes_untouched() {
        let bytes = b"%PDF-1.3 not parsed".to_vec();
        assert_eq!(apply_page_bookmarks(&bytes, &[]).unwrap(), bytes);
    }
}
