//! Element implementations built on top of `genpdf` primitives.
//!
//! `genpdf` lays elements out in a vertical flow.  Report cards use a fixed
//! layout instead, so this module provides [`FixedLayout`] for placing text
//! lines by their baseline and tables by their bottom edge, and [`GridTable`],
//! a bordered table with a shaded header row and centered cells.

use genpdf::error::Error;
use genpdf::fonts::FontCache;
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Element, Mm, Position, RenderResult, Size};
use log::debug;

const DEFAULT_CELL_PADDING_MM: f64 = 1.5;
const FILL_STROKE_STEP_MM: f64 = 0.1;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Distance from the top of a text box to its baseline.
///
/// `genpdf` starts every text section one glyph height above the baseline.
fn baseline_offset(font_cache: &FontCache, style: Style) -> Mm {
    style.font(font_cache).glyph_height(style.font_size())
}

enum Placed {
    Text {
        x: Mm,
        baseline: Mm,
        text: StyledString,
    },
    Table {
        x: Mm,
        bottom: Mm,
        table: GridTable,
    },
}

/// Places single text lines and tables at fixed positions on the page.
///
/// Positions are measured from the top left corner of the area.  Text is
/// anchored at its baseline and tables at their bottom edge, so placement does
/// not depend on font metrics.  Children never push each other around and
/// nothing is paginated.
#[derive(Default)]
pub struct FixedLayout {
    items: Vec<Placed>,
}

impl FixedLayout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a single line of text with its baseline at `baseline`.
    pub fn push_text(
        &mut self,
        x: impl Into<Mm>,
        baseline: impl Into<Mm>,
        text: impl Into<StyledString>,
    ) {
        self.items.push(Placed::Text {
            x: x.into(),
            baseline: baseline.into(),
            text: text.into(),
        });
    }

    /// Places `table` with its bottom edge at `bottom`.
    pub fn push_table(&mut self, x: impl Into<Mm>, bottom: impl Into<Mm>, table: GridTable) {
        self.items.push(Placed::Table {
            x: x.into(),
            bottom: bottom.into(),
            table,
        });
    }

    /// Places a line of text and returns the updated layout.
    pub fn with_text(
        mut self,
        x: impl Into<Mm>,
        baseline: impl Into<Mm>,
        text: impl Into<StyledString>,
    ) -> Self {
        self.push_text(x, baseline, text);
        self
    }

    /// Places a table and returns the updated layout.
    pub fn with_table(mut self, x: impl Into<Mm>, bottom: impl Into<Mm>, table: GridTable) -> Self {
        self.push_table(x, bottom, table);
        self
    }

    /// Number of placed items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Element for FixedLayout {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        for item in &mut self.items {
            match item {
                Placed::Text { x, baseline, text } => {
                    let line_style = style.and(text.style);
                    let top = mm_to_f64(*baseline)
                        - mm_to_f64(baseline_offset(&context.font_cache, line_style));
                    let position = Position::new(*x, mm_from_f64(top.max(0.0)));
                    match area.text_section(&context.font_cache, position, line_style) {
                        Some(mut section) => section.print_str(&text.s, line_style)?,
                        None => debug!("Text '{}' does not fit on the page", text.s),
                    }
                }
                Placed::Table { x, bottom, table } => {
                    let height = mm_to_f64(table.height(&context.font_cache, style));
                    let top = (mm_to_f64(*bottom) - height).max(0.0);
                    let mut table_area = area.clone();
                    table_area.add_offset(Position::new(*x, mm_from_f64(top)));
                    table.render(context, table_area, style)?;
                }
            }
        }

        let mut result = RenderResult::default();
        result.size = area.size();
        Ok(result)
    }
}

/// A column of a [`GridTable`].
#[derive(Clone, Debug)]
pub struct GridColumn {
    title: String,
    width: Mm,
}

impl GridColumn {
    /// Creates a column with a header title and a fixed width.
    pub fn new(title: impl Into<String>, width: impl Into<Mm>) -> Self {
        Self {
            title: title.into(),
            width: width.into(),
        }
    }

    /// Returns the header title.
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// A table with fixed column widths, a shaded header row and grid borders.
///
/// Every cell is centered horizontally.  Header cells use the bold variant of
/// the current font in the header text color; body cells inherit the style
/// passed in by the parent element.  [`GridTable::with_font_size`] overrides
/// the font size of both.
pub struct GridTable {
    columns: Vec<GridColumn>,
    rows: Vec<Vec<String>>,
    header_background: Color,
    header_text: Color,
    border: Color,
    padding: Mm,
    font_size: Option<u8>,
}

impl GridTable {
    /// Creates a table with the given columns and no body rows.
    pub fn new(columns: Vec<GridColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            header_background: Color::Rgb(128, 128, 128),
            header_text: Color::Rgb(255, 255, 255),
            border: Color::Rgb(0, 0, 0),
            padding: mm_from_f64(DEFAULT_CELL_PADDING_MM),
            font_size: None,
        }
    }

    /// Returns the columns.
    pub fn columns(&self) -> &[GridColumn] {
        &self.columns
    }

    /// Returns the body rows in insertion order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Appends a body row.  Cells beyond the number of columns are ignored.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Sets the header background color and returns the updated table.
    pub fn with_header_background(mut self, color: Color) -> Self {
        self.header_background = color;
        self
    }

    /// Sets the header text color and returns the updated table.
    pub fn with_header_text(mut self, color: Color) -> Self {
        self.header_text = color;
        self
    }

    /// Sets the grid line color and returns the updated table.
    pub fn with_border(mut self, color: Color) -> Self {
        self.border = color;
        self
    }

    /// Sets the vertical padding inside every cell and returns the updated table.
    pub fn with_padding(mut self, padding: impl Into<Mm>) -> Self {
        self.padding = padding.into();
        self
    }

    /// Sets the font size of every cell and returns the updated table.
    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Total height of the table when rendered with `style`.
    pub fn height(&self, font_cache: &FontCache, style: Style) -> Mm {
        let (body, header) = self.styles(style);
        let row_height = self.row_height(font_cache, body, header);
        mm_from_f64(row_height * (self.rows.len() + 1) as f64)
    }

    fn styles(&self, style: Style) -> (Style, Style) {
        let mut body = style;
        if let Some(font_size) = self.font_size {
            body.set_font_size(font_size);
        }
        let mut header = body.with_color(self.header_text);
        header.set_bold();
        (body, header)
    }

    fn row_height(&self, font_cache: &FontCache, body: Style, header: Style) -> f64 {
        let line_height = mm_to_f64(header.line_height(font_cache))
            .max(mm_to_f64(body.line_height(font_cache)));
        line_height + 2.0 * mm_to_f64(self.padding)
    }

    fn column_edges(&self) -> Vec<f64> {
        let mut edges = Vec::with_capacity(self.columns.len() + 1);
        let mut cursor = 0.0;
        edges.push(cursor);
        for column in &self.columns {
            cursor += mm_to_f64(column.width);
            edges.push(cursor);
        }
        edges
    }

    fn fill_header(&self, area: &render::Area<'_>, width: f64, height: f64) {
        let fill = Style::new().with_color(self.header_background);
        let mut y = 0.0;
        while y <= height {
            area.draw_line(
                vec![
                    Position::new(0, mm_from_f64(y)),
                    Position::new(mm_from_f64(width), mm_from_f64(y)),
                ],
                fill,
            );
            y += FILL_STROKE_STEP_MM;
        }
    }

    fn draw_grid(&self, area: &render::Area<'_>, edges: &[f64], row_height: f64, rows: usize) {
        let line = Style::new().with_color(self.border);
        let width = edges.last().copied().unwrap_or_default();
        let height = row_height * rows as f64;

        for row in 0..=rows {
            let y = mm_from_f64(row_height * row as f64);
            area.draw_line(
                vec![Position::new(0, y), Position::new(mm_from_f64(width), y)],
                line,
            );
        }
        for x in edges {
            let x = mm_from_f64(*x);
            area.draw_line(
                vec![Position::new(x, 0), Position::new(x, mm_from_f64(height))],
                line,
            );
        }
    }

    fn print_row<'s, I>(
        &self,
        context: &genpdf::Context,
        area: &render::Area<'_>,
        cells: I,
        edges: &[f64],
        top: f64,
        style: Style,
    ) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let padding = mm_to_f64(self.padding);
        for (text, bounds) in cells.into_iter().zip(edges.windows(2)) {
            let string = StyledString::new(text.to_owned(), style);
            let text_width = mm_to_f64(string.width(&context.font_cache));
            let x = bounds[0] + (bounds[1] - bounds[0] - text_width) / 2.0;
            let position = Position::new(mm_from_f64(x), mm_from_f64(top + padding));

            if let Some(mut section) = area.text_section(&context.font_cache, position, style) {
                section.print_str(&string.s, string.style)?;
            }
        }
        Ok(())
    }
}

impl Element for GridTable {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let (body_style, header_style) = self.styles(style);
        let row_height = self.row_height(&context.font_cache, body_style, header_style);
        let edges = self.column_edges();
        let width = edges.last().copied().unwrap_or_default();
        let row_count = self.rows.len() + 1;

        self.fill_header(&area, width, row_height);
        self.print_row(
            context,
            &area,
            self.columns.iter().map(GridColumn::title),
            &edges,
            0.0,
            header_style,
        )?;
        for (index, row) in self.rows.iter().enumerate() {
            let top = row_height * (index + 1) as f64;
            self.print_row(
                context,
                &area,
                row.iter().map(String::as_str),
                &edges,
                top,
                body_style,
            )?;
        }
        self.draw_grid(&area, &edges, row_height, row_count);

        let mut result = RenderResult::default();
        result.size = Size::new(
            mm_from_f64(width),
            mm_from_f64(row_height * row_count as f64),
        );
        Ok(result)
    }
}
