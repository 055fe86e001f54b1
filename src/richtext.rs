//! Styled text fragments used for the lines of a report card.
//!
//! A [`Span`] carries the handful of inline attributes the report card needs
//! (weight, color and size) and converts into the [`StyledString`] consumed by
//! `genpdf` elements.

use genpdf::style::{Color, Style, StyledString};

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    color: Option<Color>,
    font_size: Option<u8>,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Creates a `label: value` span, the shape of every detail line.
    pub fn labelled(label: &str, value: impl std::fmt::Display) -> Self {
        Self::new(format!("{}: {}", label, value))
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span should be rendered in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns the configured color for the span, if any.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Returns the font size in points, if one was set.
    pub fn font_size(&self) -> Option<u8> {
        self.font_size
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Assigns a color to the span.
    pub fn colored(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the font size in points.
    pub fn sized(mut self, font_size: u8) -> Self {
        self.font_size = Some(font_size);
        self
    }

    fn to_style(&self) -> Style {
        let mut style = Style::new();
        if let Some(color) = self.color {
            style.set_color(color);
        }
        if let Some(font_size) = self.font_size {
            style.set_font_size(font_size);
        }
        if self.bold {
            style.set_bold();
        }
        style
    }

    /// Converts the span to a [`StyledString`].
    pub fn to_styled_string(&self) -> StyledString {
        StyledString::new(self.text.clone(), self.to_style())
    }
}

impl From<Span> for StyledString {
    fn from(span: Span) -> Self {
        span.to_styled_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_to_style_reflects_attributes() {
        let styled = Span::new("Report Card")
            .bold()
            .sized(16)
            .colored(Color::Rgb(0, 0, 139))
            .to_styled_string();
        assert_eq!(styled.s, "Report Card");
        assert!(styled.style.is_bold());
        assert_eq!(styled.style.font_size(), 16);
        assert_eq!(styled.style.color(), Some(Color::Rgb(0, 0, 139)));
    }

    #[test]
    fn labelled_span_joins_label_and_value() {
        let span = Span::labelled("Average Score", "80.00");
        assert_eq!(span.text(), "Average Score: 80.00");
        assert!(!span.is_bold());
        assert_eq!(span.font_size(), None);
    }
}
