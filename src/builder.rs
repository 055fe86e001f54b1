//! Document construction helpers.

use genpdf::{self, PaperSize, Size};

use crate::fonts::FontSource;

/// Default font size of body text, in points.
pub const DEFAULT_FONT_SIZE: u8 = 12;

/// Builder for `genpdf::Document` instances pre-configured with the crate defaults.
///
/// Documents default to US Letter paper, no page margins and 12 pt text.
#[derive(Clone, Debug)]
pub struct DocumentBuilder {
    paper_size: Size,
    title: Option<String>,
    font_size: u8,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::Letter.into(),
            title: None,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl DocumentBuilder {
    /// Creates a new builder instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the default font size in points.
    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = font_size;
        self
    }

    /// Builds a document using the fonts in `fonts`.
    pub fn build(self, fonts: &FontSource) -> genpdf::Document {
        let mut document = genpdf::Document::new(fonts.family());
        document.set_paper_size(self.paper_size);
        document.set_font_size(self.font_size);
        if let Some(title) = self.title {
            document.set_title(title);
        }
        document
    }
}
