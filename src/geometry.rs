//! Millimetre geometry used to size and place images and text on report pages.
//!
//! Everything in this module is pure arithmetic over `f64` millimetres with a top-down
//! coordinate system (origin in the top-left corner of the page or frame), matching the
//! coordinates used by [`genpdf::render::Area`].  Keeping the math free of rendering types
//! lets the layout rules be checked without fonts or a PDF backend.

use genpdf::Mm;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Points per inch, as used for font sizes and the label gap.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Resolution used to derive the intrinsic size of a raster image: one pixel per point.
pub const INTRINSIC_DPI: f64 = 72.0;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Converts a length in points to millimetres.
pub fn points_to_mm(points: f64) -> f64 {
    points * MM_PER_INCH / POINTS_PER_INCH
}

/// Width and height in millimetres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Dimensions {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Dimensions {
    /// Creates a new set of dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Intrinsic size of a raster image with the given pixel dimensions at [`INTRINSIC_DPI`].
    pub fn from_pixels(width_px: u32, height_px: u32) -> Self {
        let per_pixel = MM_PER_INCH / INTRINSIC_DPI;
        Self::new(f64::from(width_px) * per_pixel, f64::from(height_px) * per_pixel)
    }

    /// Returns `width / height`, or `None` for a degenerate height.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height > f64::EPSILON {
            Some(self.width / self.height)
        } else {
            None
        }
    }

    /// Scales both axes by the same factor.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    fn is_degenerate(&self) -> bool {
        self.width <= f64::EPSILON || self.height <= f64::EPSILON
    }
}

/// Axis-aligned rectangle in top-down page coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Distance of the left edge from the left side of the reference area.
    pub x: f64,
    /// Distance of the top edge from the top of the reference area.
    pub y: f64,
    /// Size of the rectangle.
    pub size: Dimensions,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub fn new(x: f64, y: f64, size: Dimensions) -> Self {
        Self { x, y, size }
    }

    /// Y coordinate of the bottom edge, which is where images are anchored when drawn.
    pub fn bottom(&self) -> f64 {
        self.y + self.size.height
    }
}

/// Sizing hints for an image drawn by [`crate::elements::CenteredImage`].
///
/// The hints are resolved in a fixed order of precedence: a uniform `scale` wins over
/// explicit target dimensions, two target dimensions letterbox the image into a box, a
/// single target dimension scales by that ratio alone, and no hints keep the intrinsic
/// size.  `fit` then shrinks (never enlarges) the result into the space available at
/// layout time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizeHints {
    width: Option<f64>,
    height: Option<f64>,
    scale: Option<f64>,
    fit: bool,
}

impl SizeHints {
    /// Creates an empty set of hints that keeps the intrinsic size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a target width in millimetres.
    pub fn with_width(mut self, width: impl Into<Option<f64>>) -> Self {
        self.width = width.into();
        self
    }

    /// Requests a target height in millimetres.
    pub fn with_height(mut self, height: impl Into<Option<f64>>) -> Self {
        self.height = height.into();
        self
    }

    /// Requests a uniform scale factor applied to the intrinsic size.
    pub fn with_scale(mut self, scale: impl Into<Option<f64>>) -> Self {
        self.scale = scale.into();
        self
    }

    /// Enables shrinking into the available layout area.
    pub fn with_fit(mut self, fit: bool) -> Self {
        self.fit = fit;
        self
    }

    /// Returns the requested target width.
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    /// Returns the requested target height.
    pub fn height(&self) -> Option<f64> {
        self.height
    }

    /// Returns the requested scale factor.
    pub fn scale(&self) -> Option<f64> {
        self.scale
    }

    /// Returns whether the image is shrunk into the available area.
    pub fn fit(&self) -> bool {
        self.fit
    }

    /// Size requested by the hints alone, before the available area is known.
    pub fn requested_size(&self, intrinsic: Dimensions) -> Dimensions {
        if intrinsic.is_degenerate() {
            return intrinsic;
        }

        let ratio = match (self.scale, self.width, self.height) {
            (Some(scale), _, _) => scale,
            (None, Some(width), Some(height)) => {
                (width / intrinsic.width).min(height / intrinsic.height)
            }
            (None, Some(width), None) => width / intrinsic.width,
            (None, None, Some(height)) => height / intrinsic.height,
            (None, None, None) => 1.0,
        };

        intrinsic.scaled(ratio)
    }

    /// Final draw size once the available area of the frame is known.
    pub fn resolve(&self, intrinsic: Dimensions, available: Dimensions) -> Dimensions {
        let requested = self.requested_size(intrinsic);
        if !self.fit || requested.is_degenerate() {
            return requested;
        }

        let ratio = (available.width / requested.width)
            .min(available.height / requested.height)
            .min(1.0)
            .max(0.0);
        requested.scaled(ratio)
    }
}

/// Scales `intrinsic` uniformly so it fits inside `bounds`; may enlarge.
pub fn fit_within(intrinsic: Dimensions, bounds: Dimensions) -> Dimensions {
    if intrinsic.is_degenerate() {
        return intrinsic;
    }
    let ratio = (bounds.width / intrinsic.width).min(bounds.height / intrinsic.height);
    intrinsic.scaled(ratio)
}

/// Centres `drawn` inside `available` on both axes, then shifts it left by
/// `horizontal_correction`.
pub fn centered_rect(available: Dimensions, drawn: Dimensions, horizontal_correction: f64) -> Rect {
    let x = (available.width - drawn.width) / 2.0 - horizontal_correction;
    let y = (available.height - drawn.height) / 2.0;
    Rect::new(x, y, drawn)
}

/// Places the cover background: fitted into a box of `max_width_ratio × page width` by
/// `max_height_ratio × page height`, centred horizontally, and centred vertically before
/// being moved up by `vertical_offset` (negative values move it down).
///
/// The box may be wider than the page, in which case the image bleeds past both sides.
pub fn cover_background_rect(
    page: Dimensions,
    intrinsic: Dimensions,
    max_width_ratio: f64,
    max_height_ratio: f64,
    vertical_offset: f64,
) -> Rect {
    let bounds = Dimensions::new(page.width * max_width_ratio, page.height * max_height_ratio);
    let size = fit_within(intrinsic, bounds);
    let x = (page.width - size.width) / 2.0;
    let y = (page.height - size.height) / 2.0 - vertical_offset;
    Rect::new(x, y, size)
}

/// Clamps a baseline distance from the bottom edge to
/// `[min_from_bottom, page_height - min_from_top]`.
///
/// The lower bound wins when the page is too short for both bounds to hold.
pub fn clamp_baseline_from_bottom(
    requested: f64,
    page_height: f64,
    min_from_bottom: f64,
    min_from_top: f64,
) -> f64 {
    requested.min(page_height - min_from_top).max(min_from_bottom)
}

/// Scales an image to `target_height`, right-aligns it at `page_width - right_margin`,
/// and centres it vertically on the line `center_y`.
pub fn logo_rect(
    page_width: f64,
    intrinsic: Dimensions,
    target_height: f64,
    right_margin: f64,
    center_y: f64,
) -> Rect {
    let size = if intrinsic.is_degenerate() {
        intrinsic
    } else {
        intrinsic.scaled(target_height / intrinsic.height)
    };
    Rect::new(
        page_width - right_margin - size.width,
        center_y - size.height / 2.0,
        size,
    )
}

/// Left edge that centres a run of `run_width` on a page of `page_width`.
pub fn centered_start(page_width: f64, run_width: f64) -> f64 {
    (page_width - run_width) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_same_aspect(a: Dimensions, b: Dimensions) {
        assert_close(a.aspect_ratio().unwrap(), b.aspect_ratio().unwrap());
    }

    #[test]
    fn scale_takes_precedence_over_targets() {
        let intrinsic = Dimensions::new(100.0, 50.0);
        let hints = SizeHints::new()
            .with_scale(0.5)
            .with_width(400.0)
            .with_height(10.0);
        assert_eq!(hints.requested_size(intrinsic), Dimensions::new(50.0, 25.0));
    }

    #[test]
    fn both_targets_letterbox_without_distortion() {
        let intrinsic = Dimensions::new(200.0, 100.0);
        let hints = SizeHints::new().with_width(100.0).with_height(100.0);
        let size = hints.requested_size(intrinsic);
        assert_close(size.width, 100.0);
        assert_close(size.height, 50.0);
        assert_same_aspect(size, intrinsic);
    }

    #[test]
    fn single_target_scales_by_that_ratio() {
        let intrinsic = Dimensions::new(200.0, 100.0);
        let by_width = SizeHints::new().with_width(260.0).requested_size(intrinsic);
        assert_close(by_width.width, 260.0);
        assert_close(by_width.height, 130.0);

        let by_height = SizeHints::new().with_height(25.0).requested_size(intrinsic);
        assert_close(by_height.width, 50.0);
        assert_close(by_height.height, 25.0);
    }

    #[test]
    fn no_hints_keep_intrinsic_size() {
        let intrinsic = Dimensions::new(123.0, 45.0);
        assert_eq!(SizeHints::new().requested_size(intrinsic), intrinsic);
    }

    #[test]
    fn fit_shrinks_into_available_area() {
        let intrinsic = Dimensions::new(100.0, 100.0);
        let available = Dimensions::new(272.0, 155.0);
        let size = SizeHints::new()
            .with_width(260.0)
            .with_fit(true)
            .resolve(intrinsic, available);
        assert!(size.width <= available.width + TOLERANCE);
        assert!(size.height <= available.height + TOLERANCE);
        assert_close(size.height, 155.0);
        assert_same_aspect(size, intrinsic);
    }

    #[test]
    fn fit_never_enlarges() {
        let intrinsic = Dimensions::new(40.0, 20.0);
        let size = SizeHints::new()
            .with_fit(true)
            .resolve(intrinsic, Dimensions::new(400.0, 400.0));
        assert_eq!(size, intrinsic);
    }

    #[test]
    fn without_fit_the_available_area_is_ignored() {
        let intrinsic = Dimensions::new(100.0, 100.0);
        let size = SizeHints::new()
            .with_width(260.0)
            .resolve(intrinsic, Dimensions::new(10.0, 10.0));
        assert_close(size.width, 260.0);
    }

    #[test]
    fn degenerate_images_are_left_untouched() {
        let intrinsic = Dimensions::new(0.0, 10.0);
        let hints = SizeHints::new().with_width(100.0).with_fit(true);
        assert_eq!(hints.resolve(intrinsic, Dimensions::new(5.0, 5.0)), intrinsic);
    }

    #[test]
    fn centering_applies_horizontal_correction_only() {
        let rect = centered_rect(
            Dimensions::new(277.0, 160.0),
            Dimensions::new(260.0, 100.0),
            10.0,
        );
        assert_close(rect.x, -1.5);
        assert_close(rect.y, 30.0);
        assert_close(rect.bottom(), 130.0);
    }

    #[test]
    fn cover_background_may_bleed_past_the_page() {
        let page = Dimensions::new(297.0, 210.0);
        let rect = cover_background_rect(page, Dimensions::new(1000.0, 400.0), 1.2, 0.9, -10.0);
        assert_close(rect.size.width, 297.0 * 1.2);
        assert!(rect.x < 0.0);
        assert_close(rect.x + rect.size.width / 2.0, page.width / 2.0);
        // Moved down by ten millimetres from the vertical centre.
        assert_close(rect.y, (210.0 - rect.size.height) / 2.0 + 10.0);
    }

    #[test]
    fn cover_title_baseline_is_clamped() {
        assert_close(clamp_baseline_from_bottom(58.0, 210.0, 10.0, 15.0), 58.0);
        assert_close(clamp_baseline_from_bottom(500.0, 210.0, 10.0, 15.0), 195.0);
        assert_close(clamp_baseline_from_bottom(2.0, 210.0, 10.0, 15.0), 10.0);
        assert_close(clamp_baseline_from_bottom(58.0, 20.0, 10.0, 15.0), 10.0);
    }

    #[test]
    fn logo_keeps_aspect_ratio_at_target_height() {
        let intrinsic = Dimensions::new(60.0, 30.0);
        let rect = logo_rect(297.0, intrinsic, 12.0, 20.0, 12.0);
        assert_close(rect.size.height, 12.0);
        assert_close(rect.size.width, 24.0);
        assert_close(rect.x + rect.size.width, 277.0);
        assert_close(rect.y, 6.0);
    }

    #[test]
    fn pixels_map_to_points() {
        let size = Dimensions::from_pixels(72, 144);
        assert_close(size.width, 25.4);
        assert_close(size.height, 50.8);
        assert_close(points_to_mm(4.0), 4.0 * 25.4 / 72.0);
    }
}
