//! Asset locations, page layout constants and label strings for report rendering.

use std::env;
use std::path::{Path, PathBuf};

use crate::geometry::Dimensions;

/// Environment variable that overrides the directory holding the cover and logo images.
pub const ASSETS_DIR_ENV: &str = "VISITOR_REPORT_ASSETS_DIR";

/// File name of the cover background inside the assets directory.
pub const COVER_IMAGE_FILE: &str = "cover.jpg";

/// File name of the header logo inside the assets directory.
pub const LOGO_IMAGE_FILE: &str = "logo.png";

/// Directory with the static assets shipped next to the crate manifest.
pub fn bundled_assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// Locations of the static images drawn on every report.
///
/// The cover background is required; the logo is decorative and a missing logo only
/// removes it from the page header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPaths {
    cover_image: PathBuf,
    logo_image: PathBuf,
}

impl AssetPaths {
    /// Uses `cover.jpg` and `logo.png` inside `directory`.
    pub fn in_directory(directory: impl AsRef<Path>) -> Self {
        let directory = directory.as_ref();
        Self {
            cover_image: directory.join(COVER_IMAGE_FILE),
            logo_image: directory.join(LOGO_IMAGE_FILE),
        }
    }

    /// Uses the directory named by [`ASSETS_DIR_ENV`], falling back to [`bundled_assets_dir`].
    pub fn from_env() -> Self {
        match env::var_os(ASSETS_DIR_ENV) {
            Some(value) if !value.is_empty() => Self::in_directory(PathBuf::from(value)),
            _ => Self::in_directory(bundled_assets_dir()),
        }
    }

    /// Returns the cover background path.
    pub fn cover_image(&self) -> &Path {
        &self.cover_image
    }

    /// Returns the header logo path.
    pub fn logo_image(&self) -> &Path {
        &self.logo_image
    }

    /// Overrides the cover background path.
    pub fn with_cover_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.cover_image = path.into();
        self
    }

    /// Overrides the header logo path.
    pub fn with_logo_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo_image = path.into();
        self
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Placement of the cover background and the cover title.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverLayout {
    /// Width of the background bounding box as a fraction of the page width.
    pub max_width_ratio: f64,
    /// Height of the background bounding box as a fraction of the page height.
    pub max_height_ratio: f64,
    /// Upward shift of the background from the vertical centre; negative moves it down.
    pub vertical_offset: f64,
    /// Requested distance of the title baseline from the bottom edge.
    pub title_from_bottom: f64,
    /// Smallest allowed distance of the title baseline from the bottom edge.
    pub title_min_from_bottom: f64,
    /// Smallest allowed distance of the title baseline from the top edge.
    pub title_min_from_top: f64,
    /// Font size of the cover title in points.
    pub title_font_size: u8,
}

impl Default for CoverLayout {
    fn default() -> Self {
        Self {
            max_width_ratio: 1.2,
            max_height_ratio: 0.9,
            vertical_offset: -10.0,
            title_from_bottom: 58.0,
            title_min_from_bottom: 10.0,
            title_min_from_top: 15.0,
            title_font_size: 28,
        }
    }
}

/// Placement of the header and footer drawn on body pages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChromeLayout {
    /// Horizontal inset of the date label, the logo and the page number.
    pub side_inset: f64,
    /// Distance of the header baseline from the top edge.
    pub header_baseline: f64,
    /// Distance of the footer baseline from the bottom edge.
    pub footer_baseline: f64,
    /// Font size of the centred header title in points.
    pub title_font_size: u8,
    /// Font size of the labels, values and page number in points.
    pub text_font_size: u8,
    /// Gap between a bold label and its value, in points.
    pub label_gap_pt: f64,
    /// Rendered height of the logo.
    pub logo_height: f64,
}

impl Default for ChromeLayout {
    fn default() -> Self {
        Self {
            side_inset: 20.0,
            header_baseline: 12.0,
            footer_baseline: 12.0,
            title_font_size: 14,
            text_font_size: 10,
            label_gap_pt: 4.0,
            logo_height: 12.0,
        }
    }
}

/// Margins of the body frame, measured from each page edge.
///
/// The frame carries no inner padding, so images may use all of it.  Frame-based layout
/// engines commonly inset their frames by 6 pt on every side; reproducing that
/// usable area (about 272.8 × 155.8 mm on the default frame) means growing each margin by
/// [`points_to_mm(6.0)`](crate::geometry::points_to_mm).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameMargins {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl FrameMargins {
    /// Size of the frame left on a page of the given size.
    pub fn inner(&self, page: Dimensions) -> Dimensions {
        Dimensions::new(
            page.width - self.left - self.right,
            page.height - self.top - self.bottom,
        )
    }
}

impl Default for FrameMargins {
    /// A 277 × 160 mm frame starting 20 mm from the left and 25 mm from the bottom of a
    /// landscape A4 sheet, flush with the right edge.
    fn default() -> Self {
        Self {
            top: 25.0,
            right: 0.0,
            bottom: 25.0,
            left: 20.0,
        }
    }
}

/// Page geometry shared by the cover and the body pages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageLayout {
    /// Sheet size; landscape A4 by default.
    pub page_size: Dimensions,
    /// Margins of the body frame.
    pub body_margins: FrameMargins,
    /// Target width of each page image.
    pub image_width: f64,
    /// Whether page images are shrunk to stay inside the body frame.
    pub image_fit: bool,
    /// Leftward shift applied after centring a page image in the body frame.
    pub image_horizontal_correction: f64,
    /// Cover placement.
    pub cover: CoverLayout,
    /// Header and footer placement.
    pub chrome: ChromeLayout,
}

impl PageLayout {
    /// Returns the layout with a different sheet size.
    pub fn with_page_size(mut self, page_size: Dimensions) -> Self {
        self.page_size = page_size;
        self
    }

    /// Returns the layout with a different page image width.
    pub fn with_image_width(mut self, image_width: f64) -> Self {
        self.image_width = image_width;
        self
    }

    /// Returns the layout with fitting into the body frame switched on or off.
    pub fn with_image_fit(mut self, image_fit: bool) -> Self {
        self.image_fit = image_fit;
        self
    }

    /// Size of the body frame.
    pub fn body_frame(&self) -> Dimensions {
        self.body_margins.inner(self.page_size)
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_size: Dimensions::new(297.0, 210.0),
            body_margins: FrameMargins::default(),
            image_width: 260.0,
            image_fit: true,
            image_horizontal_correction: 10.0,
            cover: CoverLayout::default(),
            chrome: ChromeLayout::default(),
        }
    }
}

/// Fixed strings printed in the header and footer of body pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labels {
    date: String,
    total_visitors: String,
    thousands_separator: char,
}

impl Labels {
    /// Returns the bold label preceding the report identifier in the header.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Returns the bold label preceding the visitor count in the footer.
    pub fn total_visitors(&self) -> &str {
        &self.total_visitors
    }

    /// Returns the separator placed between digit groups of the visitor count.
    pub fn thousands_separator(&self) -> char {
        self.thousands_separator
    }

    /// Sets the header date label.
    pub fn with_date(mut self, label: impl Into<String>) -> Self {
        self.date = label.into();
        self
    }

    /// Sets the footer visitor label.
    pub fn with_total_visitors(mut self, label: impl Into<String>) -> Self {
        self.total_visitors = label.into();
        self
    }

    /// Sets the digit group separator.
    pub fn with_thousands_separator(mut self, separator: char) -> Self {
        self.thousands_separator = separator;
        self
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            date: "Date:".to_owned(),
            total_visitors: "Total visitors:".to_owned(),
            thousands_separator: '.',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_body_frame_matches_landscape_a4_layout() {
        let frame = PageLayout::default().body_frame();
        assert!((frame.width - 277.0).abs() < 1e-9);
        assert!((frame.height - 160.0).abs() < 1e-9);
    }

    #[test]
    fn six_point_inset_leaves_padded_frame() {
        let padding = crate::geometry::points_to_mm(6.0);
        let defaults = FrameMargins::default();
        let padded = FrameMargins {
            top: defaults.top + padding,
            right: defaults.right + padding,
            bottom: defaults.bottom + padding,
            left: defaults.left + padding,
        };
        let frame = padded.inner(Dimensions::new(297.0, 210.0));
        assert!((frame.width - 272.767).abs() < 1e-3);
        assert!((frame.height - 155.767).abs() < 1e-3);
    }

    #[test]
    fn assets_resolve_inside_directory() {
        let assets = AssetPaths::in_directory("/srv/report")
            .with_logo_image("/elsewhere/mark.png");
        assert_eq!(assets.cover_image(), Path::new("/srv/report/cover.jpg"));
        assert_eq!(assets.logo_image(), Path::new("/elsewhere/mark.png"));
    }
}
