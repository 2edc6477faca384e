//! Text runs drawn directly on the page by the cover and header/footer painters.
//!
//! Unlike flowing paragraphs, these strings are placed at absolute baselines.  A
//! [`LabelRun`] pairs a bold label with a regular value and measures both with the
//! registered fonts so the value always starts after the label, whatever its length.

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::FontCache;
use genpdf::render::Area;
use genpdf::style::{Style, StyledString};
use genpdf::Position;

use crate::geometry::{mm_from_f64, mm_to_f64, points_to_mm};

/// A single string with a weight and a font size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    font_size: u8,
}

impl Span {
    /// Creates a regular-weight span.
    pub fn new(text: impl Into<String>, font_size: u8) -> Self {
        Self {
            text: text.into(),
            bold: false,
            font_size,
        }
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Returns the text of the span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span is bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns the font size in points.
    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    fn to_style(&self, base: Style) -> Style {
        let mut style = base.with_font_size(self.font_size);
        if self.bold {
            style.set_bold();
        }
        style
    }

    /// Converts the span into a styled string on top of the document style.
    pub fn to_styled_string(&self, base: Style) -> StyledString {
        StyledString::new(self.text.clone(), self.to_style(base))
    }

    /// Measured width in millimetres.
    pub fn width(&self, font_cache: &FontCache, base: Style) -> f64 {
        mm_to_f64(self.to_styled_string(base).width(font_cache))
    }

    /// Draws the span with its left edge at `x` and its baseline `baseline` millimetres
    /// below the top of `area`.
    pub fn draw(
        &self,
        area: &Area<'_>,
        font_cache: &FontCache,
        base: Style,
        x: f64,
        baseline: f64,
    ) -> Result<(), Error> {
        let string = self.to_styled_string(base);
        let ascent = mm_to_f64(
            string
                .style
                .font(font_cache)
                .glyph_height(string.style.font_size()),
        );
        let position = Position::new(mm_from_f64(x), mm_from_f64(baseline - ascent));

        match area.text_section(font_cache, position, string.style) {
            Some(mut section) => section.print_str(&string.s, string.style),
            None => Err(Error::new(
                format!("Text \"{}\" does not fit on the page", self.text),
                ErrorKind::PageSizeExceeded,
            )),
        }
    }
}

/// A bold label followed by a regular value, separated by a fixed gap.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelRun {
    label: Span,
    value: Span,
    gap: f64,
}

impl LabelRun {
    /// Creates a run with both parts at `font_size` and a gap of `gap_pt` points.
    pub fn new(label: impl Into<String>, value: impl Into<String>, font_size: u8, gap_pt: f64) -> Self {
        Self {
            label: Span::new(label, font_size).bold(),
            value: Span::new(value, font_size),
            gap: points_to_mm(gap_pt),
        }
    }

    /// Returns the bold label.
    pub fn label(&self) -> &Span {
        &self.label
    }

    /// Returns the regular value.
    pub fn value(&self) -> &Span {
        &self.value
    }

    /// Offset of the value from the start of the run.
    pub fn value_offset(&self, font_cache: &FontCache, base: Style) -> f64 {
        self.label.width(font_cache, base) + self.gap
    }

    /// Total width of label, gap and value.
    pub fn width(&self, font_cache: &FontCache, base: Style) -> f64 {
        self.value_offset(font_cache, base) + self.value.width(font_cache, base)
    }

    /// Draws the run starting at `x` on the given baseline.
    pub fn draw(
        &self,
        area: &Area<'_>,
        font_cache: &FontCache,
        base: Style,
        x: f64,
        baseline: f64,
    ) -> Result<(), Error> {
        self.label.draw(area, font_cache, base, x, baseline)?;
        let value_x = x + self.value_offset(font_cache, base);
        self.value.draw(area, font_cache, base, value_x, baseline)
    }
}

/// Formats `value` with digit groups of three separated by `separator`.
///
/// `format_thousands(1_234_567, '.')` yields `"1.234.567"`.
pub fn format_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(separator);
        }
        formatted.push(digit);
    }
    formatted
}
