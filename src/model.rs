//! Inputs of a report build.
//!
//! A [`ReportRequest`] carries everything that changes from one report to the next: the
//! header title, the report identifier shown on the cover and next to the date label,
//! the visitor total for the footer, and the ordered page images.  Static assets and
//! layout live in [`crate::config`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One body page of the report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportPage {
    path: PathBuf,
    title: Option<String>,
}

impl ReportPage {
    /// Creates a page from the image at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            title: None,
        }
    }

    /// Returns the image path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the caption naming the chart on this page, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Sets the caption and returns the updated page.
    ///
    /// Captions do not change the page layout; they name bookmark entries and log lines.
    pub fn with_title(mut self, title: impl Into<Option<String>>) -> Self {
        self.title = title.into();
        self
    }
}

impl From<PathBuf> for ReportPage {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for ReportPage {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<String> for ReportPage {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl From<&str> for ReportPage {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Everything needed to build one report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportRequest {
    title: String,
    file_name: String,
    total_visitors: u64,
    pages: Vec<ReportPage>,
}

impl ReportRequest {
    /// Creates a request without pages.
    ///
    /// `title` is centred in the header of body pages and stored as document metadata;
    /// `file_name` identifies the report on the cover and after the header date label.
    pub fn new(title: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    /// Returns the header title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the report identifier.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the visitor total printed in the footer.
    pub fn total_visitors(&self) -> u64 {
        self.total_visitors
    }

    /// Returns the body pages in output order.
    pub fn pages(&self) -> &[ReportPage] {
        &self.pages
    }

    /// Sets the visitor total and returns the updated request.
    pub fn with_total_visitors(mut self, total_visitors: u64) -> Self {
        self.total_visitors = total_visitors;
        self
    }

    /// Appends a body page and returns the updated request.
    pub fn with_page(mut self, page: impl Into<ReportPage>) -> Self {
        self.pages.push(page.into());
        self
    }

    /// Appends several body pages and returns the updated request.
    pub fn with_pages<I>(mut self, pages: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ReportPage>,
    {
        self.pages.extend(pages.into_iter().map(Into::into));
        self
    }

    /// Number of pages the rendered document will have: the cover plus one per image.
    pub fn expected_page_count(&self) -> usize {
        1 + self.pages.len()
    }

    /// Returns the first pair of page indices that reference the same image path.
    pub fn find_duplicate_page(&self) -> Option<(usize, usize)> {
        let mut seen: HashMap<&Path, usize> = HashMap::with_capacity(self.pages.len());
        for (index, page) in self.pages.iter().enumerate() {
            if let Some(first) = seen.insert(page.path(), index) {
                return Some((first, index));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request_renders_cover_only() {
        let request = ReportRequest::new("Visitor statistics", "June 2025");
        assert_eq!(request.expected_page_count(), 1);
        assert_eq!(request.find_duplicate_page(), None);
    }

    #[test]
    fn pages_keep_insertion_order() {
        let request = ReportRequest::new("Stats", "Q2")
            .with_page("b.png")
            .with_pages(["a.png", "c.png"])
            .with_page(ReportPage::new("d.png").with_title(Some("Access hours".to_owned())));

        let paths: Vec<_> = request.pages().iter().map(|page| page.path()).collect();
        assert_eq!(
            paths,
            vec![
                Path::new("b.png"),
                Path::new("a.png"),
                Path::new("c.png"),
                Path::new("d.png")
            ]
        );
        assert_eq!(request.pages()[3].title(), Some("Access hours"));
        assert_eq!(request.expected_page_count(), 5);
    }

    #[test]
    fn duplicate_paths_are_detected() {
        let request = ReportRequest::new("Stats", "Q2").with_pages(["a.png", "b.png", "a.png"]);
        assert_eq!(request.find_duplicate_page(), Some((0, 2)));
    }
}
