//! Page templates for the report: a full-bleed cover followed by body pages.
//!
//! [`ReportPageDecorator`] is installed as the document's page decorator and is invoked by
//! `genpdf` whenever a new page starts.  It tracks which [`PageTemplate`] applies: the first
//! page is painted as the cover and gets the whole sheet as its frame, and every later page
//! gets the header and footer drawn directly on the sheet before its flowing content is
//! confined to the margined body frame.

use std::cell::Cell;
use std::rc::Rc;

use genpdf::error::Error;
use genpdf::render::Area;
use genpdf::style::Style;
use genpdf::{Margins, PageDecorator};
use image::DynamicImage;
use log::debug;

use crate::config::{ChromeLayout, CoverLayout, FrameMargins, Labels};
use crate::elements::{intrinsic_size, paint_image};
use crate::geometry::{self, mm_from_f64, Dimensions};
use crate::text::{format_thousands, LabelRun, Span};

/// Layout applied to a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageTemplate {
    /// Branded first page without header, footer or page number.
    Cover,
    /// Page carrying one report image plus header and footer.
    Body,
}

impl PageTemplate {
    /// Template of the page following a page laid out with `self`.
    ///
    /// The only transition is from the cover to the body; body pages never switch back.
    pub fn advance(self) -> Self {
        match self {
            PageTemplate::Cover | PageTemplate::Body => PageTemplate::Body,
        }
    }

    /// Number printed in the footer of the page with the given 1-based index.
    ///
    /// The cover is not numbered, so the first body page shows `1`.
    pub fn visible_page_number(self, page_index: usize) -> Option<usize> {
        match self {
            PageTemplate::Cover => None,
            PageTemplate::Body => Some(page_index.saturating_sub(1)),
        }
    }
}

/// Draws the cover: the background image and the report identifier near the bottom.
pub struct CoverPainter {
    background: DynamicImage,
    title: String,
    layout: CoverLayout,
}

impl CoverPainter {
    /// Creates a painter for the given background and title.
    pub fn new(background: DynamicImage, title: impl Into<String>, layout: CoverLayout) -> Self {
        Self {
            background,
            title: title.into(),
            layout,
        }
    }

    /// Paints the cover onto the full-sheet `area` of size `page`.
    pub fn paint(
        &self,
        context: &genpdf::Context,
        area: &Area<'_>,
        style: Style,
        page: Dimensions,
    ) -> Result<(), Error> {
        let rect = geometry::cover_background_rect(
            page,
            intrinsic_size(&self.background),
            self.layout.max_width_ratio,
            self.layout.max_height_ratio,
            self.layout.vertical_offset,
        );
        paint_image(area, &self.background, rect);

        let title = Span::new(self.title.as_str(), self.layout.title_font_size).bold();
        let from_bottom = geometry::clamp_baseline_from_bottom(
            self.layout.title_from_bottom,
            page.height,
            self.layout.title_min_from_bottom,
            self.layout.title_min_from_top,
        );
        let width = title.width(&context.font_cache, style);
        let x = geometry::centered_start(page.width, width);
        title.draw(area, &context.font_cache, style, x, page.height - from_bottom)
    }
}

/// Draws the header and footer of body pages.
pub struct BodyChrome {
    title: String,
    date_run: LabelRun,
    visitors_run: LabelRun,
    logo: Option<DynamicImage>,
    layout: ChromeLayout,
}

impl BodyChrome {
    /// Creates the header/footer painter.
    ///
    /// `date_value` is printed after the date label in the header, and `total_visitors` is
    /// grouped with the label's thousands separator in the footer.  Without a logo the
    /// header is drawn without one.
    pub fn new(
        title: impl Into<String>,
        date_value: impl Into<String>,
        total_visitors: u64,
        labels: &Labels,
        logo: Option<DynamicImage>,
        layout: ChromeLayout,
    ) -> Self {
        let visitors = format_thousands(total_visitors, labels.thousands_separator());
        Self {
            title: title.into(),
            date_run: LabelRun::new(
                labels.date(),
                date_value,
                layout.text_font_size,
                layout.label_gap_pt,
            ),
            visitors_run: LabelRun::new(
                labels.total_visitors(),
                visitors,
                layout.text_font_size,
                layout.label_gap_pt,
            ),
            logo,
            layout,
        }
    }

    /// Returns whether a logo will be drawn in the header.
    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }

    /// Returns the footer run holding the formatted visitor count.
    pub fn visitors_run(&self) -> &LabelRun {
        &self.visitors_run
    }

    /// Paints header and footer onto the full-sheet `area`.
    pub fn paint(
        &self,
        context: &genpdf::Context,
        area: &Area<'_>,
        style: Style,
        page: Dimensions,
        page_number: usize,
    ) -> Result<(), Error> {
        let font_cache = &context.font_cache;
        let inset = self.layout.side_inset;
        let header = self.layout.header_baseline;
        let footer = page.height - self.layout.footer_baseline;

        let title = Span::new(self.title.as_str(), self.layout.title_font_size).bold();
        let title_x = geometry::centered_start(page.width, title.width(font_cache, style));
        title.draw(area, font_cache, style, title_x, header)?;

        self.date_run.draw(area, font_cache, style, inset, header)?;

        if let Some(logo) = &self.logo {
            let rect = geometry::logo_rect(
                page.width,
                intrinsic_size(logo),
                self.layout.logo_height,
                inset,
                header,
            );
            paint_image(area, logo, rect);
        }

        let run_width = self.visitors_run.width(font_cache, style);
        let run_x = geometry::centered_start(page.width, run_width);
        self.visitors_run.draw(area, font_cache, style, run_x, footer)?;

        let number = Span::new(page_number.to_string(), self.layout.text_font_size);
        let number_x = page.width - inset - number.width(font_cache, style);
        number.draw(area, font_cache, style, number_x, footer)
    }
}

/// Shared count of pages started by a [`ReportPageDecorator`].
#[derive(Clone, Debug, Default)]
pub struct PageTally(Rc<Cell<usize>>);

impl PageTally {
    /// Creates a tally starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages started so far.
    pub fn pages(&self) -> usize {
        self.0.get()
    }

    fn increment(&self) -> usize {
        let next = self.0.get() + 1;
        self.0.set(next);
        next
    }
}

/// Page decorator that applies the cover template once and the body template afterwards.
pub struct ReportPageDecorator {
    template: PageTemplate,
    tally: PageTally,
    page_size: Dimensions,
    body_margins: Margins,
    cover: CoverPainter,
    chrome: BodyChrome,
}

impl ReportPageDecorator {
    /// Creates a decorator that starts on the cover template.
    pub fn new(
        page_size: Dimensions,
        body_margins: FrameMargins,
        cover: CoverPainter,
        chrome: BodyChrome,
        tally: PageTally,
    ) -> Self {
        Self {
            template: PageTemplate::Cover,
            tally,
            page_size,
            body_margins: Margins::trbl(
                mm_from_f64(body_margins.top),
                mm_from_f64(body_margins.right),
                mm_from_f64(body_margins.bottom),
                mm_from_f64(body_margins.left),
            ),
            cover,
            chrome,
        }
    }

    /// Template that the next page will use.
    pub fn template(&self) -> PageTemplate {
        self.template
    }
}

impl PageDecorator for ReportPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: Area<'a>,
        style: Style,
    ) -> Result<Area<'a>, Error> {
        let page_index = self.tally.increment();
        let template = self.template;
        debug!("Laying out page {} with the {:?} template", page_index, template);

        match template.visible_page_number(page_index) {
            None => {
                self.cover.paint(context, &area, style, self.page_size)?;
            }
            Some(number) => {
                self.chrome
                    .paint(context, &area, style, self.page_size, number)?;
                area.add_margins(self.body_margins);
            }
        }

        self.template = template.advance();
        Ok(area)
    }
}
