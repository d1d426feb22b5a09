//! Shared rendering utilities.
//!
//! Widths are terminal cells as reported by `unicode-width`, so wide
//! characters count twice. Highlight ranges are character indices, never byte
//! offsets.

use crate::ui::theme::Theme;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Moves the cursor to `row`, `col` (both 1-indexed).
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Width of `text` in terminal cells.
#[must_use]
pub fn text_width(text: &str) -> usize {
    text.width()
}

/// Cuts `text` to at most `width` cells, ending with `…` when cut.
///
/// A wide character that would straddle the edge is dropped, so the result
/// can be one cell narrower than `width`.
///
/// ```
/// use tabula::ui::helpers::truncate;
///
/// assert_eq!(truncate("john.doe@example.com", 8), "john.do…");
/// assert_eq!(truncate("Bob", 8), "Bob");
/// ```
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if text_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut cut = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        cut.push(c);
        used += w;
    }
    cut.push('…');
    cut
}

/// `text` left-aligned and padded with spaces to `width`.
#[must_use]
pub fn pad_right(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text_width(text));
    format!("{text}{}", " ".repeat(fill))
}

/// Character ranges of `text` matching any of `terms`, case-insensitively.
///
/// Overlapping and adjacent matches are merged.
///
/// ```
/// use tabula::ui::helpers::match_ranges;
///
/// let terms = vec!["jo".to_string()];
/// assert_eq!(match_ranges("Bob Johnson", &terms), vec![(4, 6)]);
/// ```
#[must_use]
pub fn match_ranges(text: &str, terms: &[String]) -> Vec<(usize, usize)> {
    let haystack: Vec<char> = text.chars().map(fold_char).collect();
    let mut marked = vec![false; haystack.len()];

    for term in terms {
        let needle: Vec<char> = term.chars().map(fold_char).collect();
        if needle.is_empty() || needle.len() > haystack.len() {
            continue;
        }
        for start in 0..=haystack.len() - needle.len() {
            if haystack[start..start + needle.len()] == needle[..] {
                marked[start..start + needle.len()].iter_mut().for_each(|m| *m = true);
            }
        }
    }

    let mut ranges = Vec::new();
    let mut start = None;
    for (i, &hit) in marked.iter().enumerate() {
        match (hit, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                ranges.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        ranges.push((s, marked.len()));
    }
    ranges
}

fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Shrinks `preferred` widths until their sum fits `available`.
///
/// The widest column gives up one cell at a time; no column goes below
/// `min_width`, so the result can still exceed `available` on very narrow
/// terminals.
///
/// ```
/// use tabula::ui::helpers::fit_widths;
///
/// assert_eq!(fit_widths(&[20, 10, 6], 30, 4), vec![14, 10, 6]);
/// assert_eq!(fit_widths(&[5, 5], 30, 4), vec![5, 5]);
/// ```
#[must_use]
pub fn fit_widths(preferred: &[usize], available: usize, min_width: usize) -> Vec<usize> {
    let mut widths = preferred.to_vec();
    let mut total: usize = widths.iter().sum();

    while total > available {
        let Some((index, &widest)) = widths.iter().enumerate().max_by_key(|&(i, w)| (*w, std::cmp::Reverse(i)))
        else {
            break;
        };
        if widest <= min_width {
            break;
        }
        widths[index] -= 1;
        total -= 1;
    }
    widths
}

/// Prints `text` with `ranges` in the match highlight colors.
///
/// After each highlight, `restore` (the row's own color sequence) is printed
/// again so the rest of the cell keeps the row styling.
pub fn render_highlighted_text(text: &str, ranges: &[(usize, usize)], theme: &Theme, restore: &str) {
    if ranges.is_empty() {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start > current_pos {
            let normal_section: String = chars[current_pos..start].iter().collect();
            print!("{normal_section}");
        }

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start..end].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());
        print!("{restore}");

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}
