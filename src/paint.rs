//! Small text-layout helpers shared by the widget views.

use lipgloss_extras::prelude::*;
use unicode_width::UnicodeWidthStr;

/// Horizontal alignment of a text line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Center,
    Right,
}

/// Renders `glyphs` in the foreground `color`.
pub(crate) fn colored(glyphs: &str, color: &str) -> String {
    Style::new().foreground(Color::from(color)).render(glyphs)
}

/// Paints runs of equal cells with one call to `paint` per run.
pub(crate) fn runs<T, F>(cells: &[T], paint: &F) -> String
where
    T: Copy + PartialEq,
    F: Fn(T, usize) -> String,
{
    let mut out = String::new();
    let mut start = 0;
    while start < cells.len() {
        let cell = cells[start];
        let run = cells[start..].iter().take_while(|&&c| c == cell).count();
        out.push_str(&paint(cell, run));
        start += run;
    }
    out
}

/// Paints `cells` with `text` replacing the cells in the middle.
///
/// Text wider than the row is appended after it instead.
pub(crate) fn overlay<T, F>(cells: &[T], text: &str, paint: &F) -> String
where
    T: Copy + PartialEq,
    F: Fn(T, usize) -> String,
{
    let text_width = UnicodeWidthStr::width(text);
    if text_width > cells.len() {
        return format!("{} {}", runs(cells, paint), text);
    }
    let start = (cells.len() - text_width) / 2;
    format!(
        "{}{}{}",
        runs(&cells[..start], paint),
        text,
        runs(&cells[start + text_width..], paint)
    )
}

/// Aligns `text` within `width` columns. Left-aligned text is not padded.
pub(crate) fn align(text: &str, width: usize, align: Align) -> String {
    let text_width = UnicodeWidthStr::width(text);
    if text_width >= width {
        return text.to_string();
    }
    let pad = width - text_width;
    match align {
        Align::Left => text.to_string(),
        Align::Center => format!("{}{}", " ".repeat(pad / 2), text),
        Align::Right => format!("{}{}", " ".repeat(pad), text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(cell: char, run: usize) -> String {
        cell.to_string().repeat(run)
    }

    #[test]
    fn test_runs_groups_cells() {
        let calls = std::cell::Cell::new(0);
        let paint = |c: char, n: usize| {
            calls.set(calls.get() + 1);
            plain(c, n)
        };
        assert_eq!(runs(&['a', 'a', 'b', 'a'], &paint), "aaba");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_overlay_centers_text() {
        let cells = ['#'; 10];
        assert_eq!(overlay(&cells, "42%", &plain), "###42%####");
        assert_eq!(overlay(&cells[..2], "42%", &plain), "## 42%");
    }

    #[test]
    fn test_align() {
        assert_eq!(align("ab", 6, Align::Left), "ab");
        assert_eq!(align("ab", 6, Align::Center), "  ab");
        assert_eq!(align("ab", 6, Align::Right), "    ab");
        assert_eq!(align("abcdef", 3, Align::Right), "abcdef");
    }
}
