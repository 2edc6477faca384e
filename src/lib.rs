//! Landscape visitor-statistics reports assembled from chart screenshots.
//!
//! A report is a branded cover followed by one page per screenshot.  Body pages carry a
//! header (title, report identifier, logo) and a footer (visitor total, page number)
//! drawn independently of the centred image.
//!
//! ```no_run
//! use visitor_report_pdf::builder::ReportBuilder;
//! use visitor_report_pdf::fonts;
//! use visitor_report_pdf::model::ReportRequest;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! fonts::initialize_default()?;
//! let request = ReportRequest::new("Visitor statistics", "01/06/2025 - 30/06/2025")
//!     .with_total_visitors(1_234_567)
//!     .with_pages(["hours.png", "weekdays.png"]);
//! ReportBuilder::new().write_to_file(&request, "report.pdf")?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod elements;
pub mod fonts;
pub mod geometry;
pub mod model;
pub mod template;
pub mod text;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;
