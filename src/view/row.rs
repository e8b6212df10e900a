//! Drawing one console row.
//!
//! Each row is a gutter (selection mark, category label, expansion marker)
//! followed by the wrapped message and, when expanded, the wrapped details.
//! Text is wrapped with [`WrappedTextMeasurer::wrap`] at the same width the
//! console measures against, so the drawn line count equals the row height.

use super::styles::ConsoleStyles;
use crate::console::{RowBinding, RowHandle};
use crate::measure::WrappedTextMeasurer;
use crate::model::RowKind;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// Cells taken by the gutter left of the text.
pub const GUTTER_WIDTH: u16 = 8;

const SEPARATOR_CHAR: &str = "─";

/// [`RowHandle`] producing ratatui lines.
#[derive(Debug, Clone)]
pub struct RowRenderer {
    text_width: u16,
    styles: ConsoleStyles,
    lines: Vec<Line<'static>>,
}

impl RowRenderer {
    /// Renderer wrapping text at `text_width` cells (gutter excluded).
    pub fn new(text_width: u16, styles: ConsoleStyles) -> Self {
        Self {
            text_width,
            styles,
            lines: Vec::new(),
        }
    }

    /// Lines of the most recently bound row.
    pub fn take_lines(&mut self) -> Vec<Line<'static>> {
        std::mem::take(&mut self.lines)
    }
}

impl RowHandle for RowRenderer {
    fn bind(&mut self, row: RowBinding<'_>) {
        let entity = row.entity;
        let mut lines = match entity.kind() {
            RowKind::Separator => vec![Line::styled(
                SEPARATOR_CHAR.repeat(usize::from(self.text_width + GUTTER_WIDTH)),
                self.styles.separator(),
            )],
            RowKind::Banner => vec![
                Line::styled(entity.message().to_string(), self.styles.banner()),
                Line::default(),
            ],
            RowKind::Entry => self.entry_lines(&row),
        };

        let height = usize::from(row.height.get());
        lines.resize(height, Line::default());
        self.lines = lines;
    }
}

impl RowRenderer {
    fn entry_lines(&self, row: &RowBinding<'_>) -> Vec<Line<'static>> {
        let entity = row.entity;
        let category = entity.category();
        let message_style = self.styles.message(category);

        let selection = match (row.selection_mode && entity.is_selectable(), entity.is_selected()) {
            (false, _) => "  ",
            (true, true) => "● ",
            (true, false) => "○ ",
        };
        let marker = match (entity.has_details(), entity.is_expanded()) {
            (false, _) => " ",
            (true, false) => "▸",
            (true, true) => "▾",
        };
        let gutter = vec![
            Span::raw(selection),
            Span::styled(category.label(), self.styles.label(category)),
            Span::raw(" "),
            Span::styled(marker, message_style),
            Span::raw(" "),
        ];
        let blank_gutter = " ".repeat(usize::from(GUTTER_WIDTH));

        let mut lines = Vec::new();
        for (i, text) in WrappedTextMeasurer::wrap(entity.message(), self.text_width)
            .into_iter()
            .enumerate()
        {
            let mut spans = if i == 0 {
                gutter.clone()
            } else {
                vec![Span::raw(blank_gutter.clone())]
            };
            spans.extend(highlight(
                &text,
                row.search,
                row.case_insensitive,
                message_style,
                self.styles.search_match(),
            ));
            lines.push(Line::from(spans));
        }

        if entity.is_expanded() && entity.has_details() {
            let style = self.styles.context();
            for text in WrappedTextMeasurer::wrap(entity.context(), self.text_width) {
                lines.push(Line::from(vec![
                    Span::raw(blank_gutter.clone()),
                    Span::styled(text, style),
                ]));
            }
        }
        lines
    }
}

/// Split `text` into spans, styling each occurrence of `needle` with
/// `matched`.
///
/// Case-insensitive matching is skipped for text whose lowercase form has a
/// different byte length, since match positions would not line up.
pub fn highlight(
    text: &str,
    needle: &str,
    case_insensitive: bool,
    base: Style,
    matched: Style,
) -> Vec<Span<'static>> {
    if needle.is_empty() {
        return vec![Span::styled(text.to_string(), base)];
    }

    let (haystack, needle) = if case_insensitive {
        let lowered = text.to_lowercase();
        if lowered.len() != text.len() {
            return vec![Span::styled(text.to_string(), base)];
        }
        (lowered, needle.to_lowercase())
    } else {
        (text.to_string(), needle.to_string())
    };

    let mut spans = Vec::new();
    let mut last = 0;
    for (start, found) in haystack.match_indices(needle.as_str()) {
        let end = start + found.len();
        if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            continue;
        }
        if start > last {
            spans.push(Span::styled(text[last..start].to_string(), base));
        }
        spans.push(Span::styled(text[start..end].to_string(), matched));
        last = end;
    }
    if last < text.len() || spans.is_empty() {
        spans.push(Span::styled(text[last..].to_string(), base));
    }
    spans
}
