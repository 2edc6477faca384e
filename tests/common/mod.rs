//! Fixtures shared by the rendering test binaries.

#![allow(dead_code)]

use std::env;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb, Rgba};
use lopdf::{Dictionary, Document, Object};
use tempfile::TempDir;
use visitor_report_pdf::config::AssetPaths;
use visitor_report_pdf::fonts;

pub const COVER_WIDTH_PX: u32 = 300;
pub const LOGO_WIDTH_PX: u32 = 48;

/// Set to make missing fonts fail the rendering tests instead of skipping them.
pub const REQUIRE_FONTS_ENV: &str = "VISITOR_REPORT_REQUIRE_FONTS";

/// Regular/bold pairs commonly installed on Linux and macOS build machines.
const SYSTEM_FONT_PAIRS: &[(&str, &str)] = &[
    (
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    ),
    ("/Library/Fonts/Arial.ttf", "/Library/Fonts/Arial Bold.ttf"),
];

/// Registers the report fonts, falling back to a system sans-serif pair.
pub fn fonts_ready(test: &str) -> bool {
    if fonts::is_ready() || fonts::initialize_default().is_ok() {
        return true;
    }

    for (regular, bold) in SYSTEM_FONT_PAIRS {
        if Path::new(regular).is_file()
            && Path::new(bold).is_file()
            && fonts::initialize_faces(regular, bold).is_ok()
        {
            return true;
        }
    }

    if env::var_os(REQUIRE_FONTS_ENV).is_some() {
        panic!("{test}: no usable fonts found and {REQUIRE_FONTS_ENV} is set");
    }
    eprintln!(
        "Skipping {test}: report fonts missing. Set VISITOR_REPORT_FONTS_DIR or install DejaVu Sans."
    );
    false
}

pub struct Fixture {
    directory: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            directory: tempfile::tempdir().expect("create fixture directory"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.directory.path().join(name)
    }

    pub fn chart(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.path(name);
        let image = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 180u8])
        });
        image.save(&path).expect("write chart fixture");
        path
    }

    pub fn transparent_chart(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.path(name);
        let image = ImageBuffer::from_fn(width, height, |x, _| {
            Rgba([40u8, 90, 200, if x % 2 == 0 { 0 } else { 255 }])
        });
        image.save(&path).expect("write transparent fixture");
        path
    }

    pub fn assets(&self, with_logo: bool) -> AssetPaths {
        let cover = self.chart("cover.png", COVER_WIDTH_PX, 200);
        let logo = if with_logo {
            self.chart("logo.png", LOGO_WIDTH_PX, 24)
        } else {
            self.path("missing-logo.png")
        };
        AssetPaths::in_directory(self.directory.path())
            .with_cover_image(cover)
            .with_logo_image(logo)
    }
}

pub fn resolve<'a>(document: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => document.get_object(*id).unwrap_or(object),
        other => other,
    }
}

pub fn resolve_dict<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    resolve(document, object).as_dict().ok()
}

pub fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes)
        .expect("parse rendered pdf")
        .get_pages()
        .len()
}
