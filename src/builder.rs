//! Report assembly: from a [`ReportRequest`] to finished PDF bytes.
//!
//! A build loads every raster it needs before laying out a single page, renders the whole
//! document into memory, and only then hands the bytes to the caller's sink.  The first
//! page is the cover; each image in the request follows on its own body page, in request
//! order.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use genpdf::elements::PageBreak;
use genpdf::{self, Size};
use log::{debug, info, warn};

use crate::config::{AssetPaths, Labels, PageLayout};
use crate::elements::{self, CenteredImage};
use crate::fonts;
use crate::geometry::{mm_from_f64, SizeHints};
use crate::model::ReportRequest;
use crate::template::{BodyChrome, CoverPainter, PageTally, ReportPageDecorator};

#[cfg(feature = "bookmarks")]
use crate::bookmarks::{self, BookmarkError};

/// Errors that abort a report build.
#[derive(Debug)]
pub enum ComposeError {
    /// [`fonts::initialize`] has not completed successfully in this process.
    FontsNotReady,
    /// The registered font data could not be turned into a font family.
    FontLoad(genpdf::error::Error),
    /// A required static asset, such as the cover background, could not be loaded.
    AssetMissing {
        /// Path of the asset.
        path: PathBuf,
        /// Underlying failure.
        source: genpdf::error::Error,
    },
    /// Two pages of the request reference the same image.
    DuplicatePage {
        /// Index of the first occurrence.
        first: usize,
        /// Index of the repeated occurrence.
        second: usize,
        /// The repeated path.
        path: PathBuf,
    },
    /// A page image could not be opened or decoded.
    ImageUnreadable {
        /// Position of the image in the request.
        index: usize,
        /// Path of the image.
        path: PathBuf,
        /// Underlying failure.
        source: genpdf::error::Error,
    },
    /// The layout engine failed while producing the document.
    Render(genpdf::error::Error),
    /// The laid-out document does not have one cover plus one page per image.
    PageCountMismatch {
        /// Pages the request calls for.
        expected: usize,
        /// Pages actually laid out.
        actual: usize,
    },
    /// The finished document could not be written to the output.
    OutputWrite(io::Error),
    /// The outline could not be added to the rendered document.
    #[cfg(feature = "bookmarks")]
    Bookmarks(BookmarkError),
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontsNotReady => write!(
                f,
                "Report fonts are not registered; call fonts::initialize before building"
            ),
            Self::FontLoad(err) => write!(f, "Failed to prepare report fonts: {err}"),
            Self::AssetMissing { path, .. } => {
                write!(f, "Required asset {} could not be loaded", path.display())
            }
            Self::DuplicatePage {
                first,
                second,
                path,
            } => write!(
                f,
                "Pages {first} and {second} both use the image {}",
                path.display()
            ),
            Self::ImageUnreadable { index, path, .. } => write!(
                f,
                "Page image {index} at {} could not be read",
                path.display()
            ),
            Self::Render(err) => write!(f, "Failed to render report: {err}"),
            Self::PageCountMismatch { expected, actual } => write!(
                f,
                "Report laid out {actual} pages, expected {expected}"
            ),
            Self::OutputWrite(err) => write!(f, "Failed to write report: {err}"),
            #[cfg(feature = "bookmarks")]
            Self::Bookmarks(err) => write!(f, "Failed to add bookmarks: {err}"),
        }
    }
}

impl std::error::Error for ComposeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FontLoad(err) | Self::Render(err) => Some(err),
            Self::AssetMissing { source, .. } | Self::ImageUnreadable { source, .. } => {
                Some(source)
            }
            Self::OutputWrite(err) => Some(err),
            #[cfg(feature = "bookmarks")]
            Self::Bookmarks(err) => Some(err),
            Self::FontsNotReady | Self::DuplicatePage { .. } | Self::PageCountMismatch { .. } => {
                None
            }
        }
    }
}

fn check_page_count(expected: usize, actual: usize) -> Result<(), ComposeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ComposeError::PageCountMismatch { expected, actual })
    }
}

/// Result of rendering a report.
#[derive(Clone, Debug)]
pub struct RenderedReport {
    /// The serialized PDF document.
    pub bytes: Vec<u8>,
    /// Number of pages laid out, cover included.
    pub page_count: usize,
}

/// Builds report PDFs from [`ReportRequest`]s.
///
/// The builder holds configuration only; every call to [`render`](Self::render) is
/// independent of previous ones.
#[derive(Clone, Debug, Default)]
pub struct ReportBuilder {
    assets: AssetPaths,
    layout: PageLayout,
    labels: Labels,
    #[cfg(feature = "bookmarks")]
    bookmarks: bool,
}

impl ReportBuilder {
    /// Creates a builder with assets from the environment and the default layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the locations of the cover background and the logo.
    pub fn with_assets(mut self, assets: AssetPaths) -> Self {
        self.assets = assets;
        self
    }

    /// Sets the page geometry.
    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the header and footer labels.
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Adds an outline entry for every page that carries a title.
    #[cfg(feature = "bookmarks")]
    pub fn with_bookmarks(mut self, bookmarks: bool) -> Self {
        self.bookmarks = bookmarks;
        self
    }

    /// Renders the report into memory.
    pub fn render(&self, request: &ReportRequest) -> Result<RenderedReport, ComposeError> {
        let family = match fonts::registered_family() {
            Some(family) => family.map_err(ComposeError::FontLoad)?,
            None => return Err(ComposeError::FontsNotReady),
        };

        if let Some((first, second)) = request.find_duplicate_page() {
            return Err(ComposeError::DuplicatePage {
                first,
                second,
                path: request.pages()[second].path().to_path_buf(),
            });
        }

        let background = elements::load_raster(self.assets.cover_image()).map_err(|source| {
            ComposeError::AssetMissing {
                path: self.assets.cover_image().to_path_buf(),
                source,
            }
        })?;

        let hints = SizeHints::new()
            .with_width(self.layout.image_width)
            .with_fit(self.layout.image_fit);
        let mut page_elements = Vec::with_capacity(request.pages().len());
        for (index, page) in request.pages().iter().enumerate() {
            let element = CenteredImage::from_path(page.path(), hints).map_err(|source| {
                ComposeError::ImageUnreadable {
                    index,
                    path: page.path().to_path_buf(),
                    source,
                }
            })?;
            debug!(
                "Loaded page image {} ({}) from {}",
                index,
                page.title().unwrap_or("untitled"),
                page.path().display()
            );
            page_elements.push(
                element.with_horizontal_correction(self.layout.image_horizontal_correction),
            );
        }

        let logo = match elements::load_raster(self.assets.logo_image()) {
            Ok(logo) => Some(logo),
            Err(err) => {
                warn!("Header logo unavailable, rendering without it: {}", err);
                None
            }
        };

        let tally = PageTally::new();
        let decorator = ReportPageDecorator::new(
            self.layout.page_size,
            self.layout.body_margins,
            CoverPainter::new(background, request.file_name(), self.layout.cover),
            BodyChrome::new(
                request.title(),
                request.file_name(),
                request.total_visitors(),
                &self.labels,
                logo,
                self.layout.chrome,
            ),
            tally.clone(),
        );

        let mut document = genpdf::Document::new(family);
        document.set_title(request.title());
        document.set_paper_size(Size::new(
            mm_from_f64(self.layout.page_size.width),
            mm_from_f64(self.layout.page_size.height),
        ));
        document.set_page_decorator(decorator);

        // Leave the cover page before the first image; the decorator switches templates.
        // Each image claims its whole frame, so the next one starts a fresh page on its own.
        if !page_elements.is_empty() {
            document.push(PageBreak::new());
        }
        for element in page_elements {
            document.push(element);
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes).map_err(ComposeError::Render)?;

        #[cfg(feature = "bookmarks")]
        let bytes = if self.bookmarks {
            let entries = bookmarks::page_bookmarks(request.pages());
            bookmarks::apply_page_bookmarks(&bytes, &entries).map_err(ComposeError::Bookmarks)?
        } else {
            bytes
        };

        let page_count = tally.pages();
        check_page_count(request.expected_page_count(), page_count)?;
        info!(
            "Rendered report \"{}\": {} pages, {} bytes",
            request.title(),
            page_count,
            bytes.len()
        );

        Ok(RenderedReport { bytes, page_count })
    }

    /// Renders the report and writes it to `sink`.
    ///
    /// Nothing is written unless rendering succeeds.
    pub fn write_to<W: Write>(
        &self,
        request: &ReportRequest,
        mut sink: W,
    ) -> Result<RenderedReport, ComposeError> {
        let report = self.render(request)?;
        sink.write_all(&report.bytes)
            .and_then(|()| sink.flush())
            .map_err(ComposeError::OutputWrite)?;
        Ok(report)
    }

    /// Renders the report and writes it to the file at `path`.
    ///
    /// The file is only created once rendering succeeded, and is removed again if writing
    /// fails part-way.
    pub fn write_to_file(
        &self,
        request: &ReportRequest,
        path: impl AsRef<Path>,
    ) -> Result<RenderedReport, ComposeError> {
        let path = path.as_ref();
        let report = self.render(request)?;
        if let Err(err) = fs::write(path, &report.bytes) {
            let _ = fs::remove_file(path);
            return Err(ComposeError::OutputWrite(err));
        }
        debug!("Wrote {}", path.display());
        Ok(report)
    }
}
