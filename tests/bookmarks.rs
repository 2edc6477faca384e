#![cfg(feature = "bookmarks")]

mod common;

use lopdf::{Document, Object, ObjectId};
use visitor_report_pdf::builder::ReportBuilder;
use visitor_report_pdf::model::{ReportPage, ReportRequest};

use common::{fonts_ready, resolve_dict, Fixture};

fn decode_text_string(object: &Object) -> String {
    let Object::String(bytes, _) = object else {
        panic!("title is not a string: {object:?}");
    };
    assert_eq!(&bytes[..2], &[0xFE, 0xFF], "title lacks a UTF-16 byte order mark");
    let units: Vec<u16> = bytes[2..]
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).expect("valid UTF-16 title")
}

/// `(title, destination page)` for every outline entry, in outline order.
fn outline_entries(document: &Document) -> Vec<(String, ObjectId)> {
    let root = document.trailer.get(b"Root").expect("catalog reference");
    let catalog = resolve_dict(document, root).expect("catalog dictionary");
    let outlines = resolve_dict(document, catalog.get(b"Outlines").expect("outline root"))
        .expect("outline dictionary");

    let mut entries = Vec::new();
    let mut next = outlines.get(b"First").ok();
    while let Some(object) = next {
        let entry = resolve_dict(document, object).expect("outline entry");
        let title = decode_text_string(entry.get(b"Title").expect("entry title"));
        let destination = entry
            .get(b"Dest")
            .and_then(Object::as_array)
            .expect("entry destination")[0]
            .as_reference()
            .expect("destination page reference");
        entries.push((title, destination));
        next = entry.get(b"Next").ok();
    }
    entries
}

#[test]
fn outline_entries_target_the_image_pages() {
    if !fonts_ready("outline_entries_target_the_image_pages") {
        return;
    }
    let fixture = Fixture::new();
    let request = ReportRequest::new("Visitor statistics", "June 2025")
        .with_page(
            ReportPage::new(fixture.chart("days.png", 640, 360))
                .with_title(Some("Días de acceso".to_owned())),
        )
        .with_page(fixture.chart("untitled.png", 500, 300))
        .with_page(
            ReportPage::new(fixture.chart("hours.png", 820, 400))
                .with_title(Some("Access hours".to_owned())),
        );

    let report = ReportBuilder::new()
        .with_assets(fixture.assets(true))
        .with_bookmarks(true)
        .render(&request)
        .expect("render bookmarked report");

    let document = Document::load_mem(&report.bytes).expect("parse rendered pdf");
    let pages = document.get_pages();
    assert_eq!(pages.len(), 4);

    assert_eq!(
        outline_entries(&document),
        vec![
            ("Días de acceso".to_owned(), pages[&2]),
            ("Access hours".to_owned(), pages[&4]),
        ]
    );
}

#[test]
fn bookmarks_are_off_by_default() {
    if !fonts_ready("bookmarks_are_off_by_default") {
        return;
    }
    let fixture = Fixture::new();
    let request = ReportRequest::new("Visitor statistics", "June 2025").with_page(
        ReportPage::new(fixture.chart("days.png", 640, 360)).with_title(Some("Days".to_owned())),
    );

    let report = ReportBuilder::new()
        .with_assets(fixture.assets(false))
        .render(&request)
        .expect("render report");

    let document = Document::load_mem(&report.bytes).expect("parse rendered pdf");
    let root = document.trailer.get(b"Root").expect("catalog reference");
    let catalog = resolve_dict(&document, root).expect("catalog dictionary");
    assert!(catalog.get(b"Outlines").is_err());
}
