//! Raster loading and the centred page-image element.
//!
//! Images are decoded eagerly with the [`image`] crate so that unreadable files surface
//! before any page is laid out, and the file handle is released as soon as decoding
//! returns.  Transparent pixels are composited on white because the PDF backend embeds
//! plain RGB data.

use std::path::Path;

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

use genpdf::error::{Context as _, Error};
use genpdf::render::Area;
use genpdf::style::Style;
use genpdf::{Element, Position, RenderResult, Rotation, Scale};

use crate::geometry::{mm_from_f64, mm_to_f64, Dimensions, Rect, SizeHints, INTRINSIC_DPI};

/// Loads an image from in-memory bytes using the [`image`] crate with descriptive errors.
pub fn decode_image_from_bytes(bytes: impl AsRef<[u8]>) -> Result<DynamicImage, Error> {
    image::load_from_memory(bytes.as_ref()).context("Failed to decode image from provided bytes")
}

/// Loads an image from the given path using the [`image`] crate with descriptive errors.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<DynamicImage, Error> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open image file {}", path.display()))?;
    reader
        .with_guessed_format()
        .context("Unable to determine image format")?
        .decode()
        .with_context(|| format!("Failed to decode image file {}", path.display()))
}

/// Converts any decoded image to 8-bit RGB, blending transparent pixels onto white.
pub fn flatten_to_rgb(image: DynamicImage) -> DynamicImage {
    if let DynamicImage::ImageRgb8(_) = image {
        return image;
    }
    if !image.color().has_alpha() {
        return DynamicImage::ImageRgb8(image.to_rgb8());
    }

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let flattened = RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |channel: u8| -> u8 {
            ((u16::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([blend(r), blend(g), blend(b)])
    });
    DynamicImage::ImageRgb8(flattened)
}

/// Decodes the image at `path` and prepares it for embedding.
pub fn load_raster(path: impl AsRef<Path>) -> Result<DynamicImage, Error> {
    decode_image_from_path(path).map(flatten_to_rgb)
}

/// Intrinsic size of a decoded image in millimetres.
pub fn intrinsic_size(image: &DynamicImage) -> Dimensions {
    let (width, height) = image.dimensions();
    Dimensions::from_pixels(width, height)
}

/// Paints `image` stretched to `rect`, with `rect` given relative to `area`.
///
/// Callers pass rectangles that keep the image's aspect ratio.
pub(crate) fn paint_image(area: &Area<'_>, image: &DynamicImage, rect: Rect) {
    let intrinsic = intrinsic_size(image);
    if intrinsic.width <= f64::EPSILON || intrinsic.height <= f64::EPSILON {
        return;
    }
    let scale = Scale::new(
        rect.size.width / intrinsic.width,
        rect.size.height / intrinsic.height,
    );
    // The backend anchors images at their bottom-left corner.
    let anchor = Position::new(mm_from_f64(rect.x), mm_from_f64(rect.bottom()));
    area.add_image(image, anchor, scale, Rotation::default(), Some(INTRINSIC_DPI));
}

/// A page image that fills its frame: the picture is sized by [`SizeHints`] and centred on
/// both axes of the space available when it is laid out.
///
/// The element always claims the whole frame, so each instance occupies one page.
pub struct CenteredImage {
    image: DynamicImage,
    hints: SizeHints,
    horizontal_correction: f64,
}

impl CenteredImage {
    /// Wraps an already decoded image.
    pub fn new(image: DynamicImage, hints: SizeHints) -> Self {
        Self {
            image,
            hints,
            horizontal_correction: 0.0,
        }
    }

    /// Decodes the image at `path`.
    pub fn from_path(path: impl AsRef<Path>, hints: SizeHints) -> Result<Self, Error> {
        Ok(Self::new(load_raster(path)?, hints))
    }

    /// Shifts the centred image left by `correction` millimetres.
    pub fn with_horizontal_correction(mut self, correction: f64) -> Self {
        self.horizontal_correction = correction;
        self
    }

    /// Intrinsic size of the wrapped image.
    pub fn intrinsic_size(&self) -> Dimensions {
        intrinsic_size(&self.image)
    }

    /// Computes where the image lands inside a frame of the given size.
    pub fn layout(&self, available: Dimensions) -> Rect {
        let drawn = self.hints.resolve(self.intrinsic_size(), available);
        crate::geometry::centered_rect(available, drawn, self.horizontal_correction)
    }
}

impl Element for CenteredImage {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let size = area.size();
        let available = Dimensions::new(mm_to_f64(size.width), mm_to_f64(size.height));
        let rect = self.layout(available);
        paint_image(&area, &self.image, rect);

        // Claim the whole frame so the layout moves on to a new page.
        let mut result = RenderResult::default();
        result.size = size;
        Ok(result)
    }
}
