use std::ops::Range;

use ratatui::{
    style::{Color, Style},
    text::Span,
};
use splitdiff::{DiffLine, LineType};

pub const REMOVED_BG: Color = Color::Rgb(80, 0, 0);
pub const REMOVED_CHANGED_BG: Color = Color::Rgb(139, 0, 0);
pub const ADDED_BG: Color = Color::Rgb(0, 60, 0);
pub const ADDED_CHANGED_BG: Color = Color::Rgb(0, 100, 0);
pub const PLACEHOLDER_BG: Color = Color::Rgb(40, 40, 40);

/// Line background and changed-segment background for a line type.
pub fn line_colors(line_type: LineType) -> Option<(Color, Color)> {
    match line_type {
        LineType::Removed => Some((REMOVED_BG, REMOVED_CHANGED_BG)),
        LineType::Added => Some((ADDED_BG, ADDED_CHANGED_BG)),
        LineType::Context | LineType::Placeholder => None,
    }
}

/// Border style of a panel, highlighted while it has focus.
pub fn panel_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

/// Byte ranges of the changed segments of a line.
///
/// Lines without segments (context, placeholders, unpaired additions and
/// removals) have none and keep the plain line-type background.
pub fn changed_ranges(line: &DiffLine) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut offset = 0;
    for segment in &line.segments {
        let end = offset + segment.text.len();
        if segment.changed {
            match ranges.last_mut() {
                Some(last) if last.end == offset => last.end = end,
                _ => ranges.push(offset..end),
            }
        }
        offset = end;
    }
    ranges
}

/// Applies diff backgrounds to syntax highlighted spans.
///
/// Bytes inside `diff_ranges` get `highlight_bg`, everything else `base_bg`.
/// Ranges must be sorted and fall on char boundaries.
pub fn apply_diff_highlight<'a>(
    spans: Vec<Span<'a>>,
    diff_ranges: &[Range<usize>],
    base_bg: Color,
    highlight_bg: Color,
) -> Vec<Span<'a>> {
    let mut new_spans = Vec::new();
    let mut current_idx = 0;

    for span in spans {
        let content = span.content;
        let style = span.style;
        let span_end = current_idx + content.len();
        let mut last_processed = current_idx;

        for range in diff_ranges {
            if range.end <= current_idx {
                continue;
            }
            if range.start >= span_end {
                break;
            }

            let overlap_start = range.start.max(current_idx);
            let overlap_end = range.end.min(span_end);

            if overlap_start > last_processed {
                new_spans.push(Span::styled(
                    content[last_processed - current_idx..overlap_start - current_idx].to_string(),
                    style.bg(base_bg),
                ));
            }
            new_spans.push(Span::styled(
                content[overlap_start - current_idx..overlap_end - current_idx].to_string(),
                style.bg(highlight_bg),
            ));
            last_processed = overlap_end;
        }

        if last_processed < span_end {
            new_spans.push(Span::styled(
                content[last_processed - current_idx..].to_string(),
                style.bg(base_bg),
            ));
        }

        current_idx = span_end;
    }

    new_spans
}
