use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use splitdiff::{DiffFile, DiffLine, LineType};

use crate::{
    app::{App, Focus},
    ui::diff_utils::{apply_diff_highlight, changed_ranges, line_colors, panel_border},
};

/// Flattens aligned rows back into unified order.
///
/// Each change block emits its removed lines, then its added lines, which is
/// the order `git diff` printed them in. Placeholders are dropped. Returns
/// the lines and the index at which each hunk starts.
pub fn unified_lines(file: &DiffFile) -> (Vec<&DiffLine>, Vec<usize>) {
    let rows = file.row_count();
    let mut lines = Vec::with_capacity(rows);
    let mut offsets = Vec::with_capacity(file.hunk_offsets.len());
    let mut hunks = file.hunk_offsets.iter().peekable();

    let is_boundary = |row: usize| {
        file.left_lines[row].line_type == LineType::Context
            || file.block_offsets.binary_search(&row).is_ok()
            || file.hunk_offsets.binary_search(&row).is_ok()
    };

    let mut row = 0;
    while row < rows {
        while hunks.next_if(|&&offset| offset <= row).is_some() {
            offsets.push(lines.len());
        }

        let left = &file.left_lines[row];
        if left.line_type == LineType::Context {
            lines.push(left);
            row += 1;
            continue;
        }

        let end = (row + 1..rows).find(|&r| is_boundary(r)).unwrap_or(rows);
        lines.extend(file.left_lines[row..end].iter().filter(|l| !l.is_placeholder()));
        lines.extend(file.right_lines[row..end].iter().filter(|l| !l.is_placeholder()));
        row = end;
    }

    (lines, offsets)
}

pub fn render_unified_diff(f: &mut Frame, area: Rect, file: &DiffFile, app: &App) {
    let visible_lines = area.height.saturating_sub(2) as usize;
    let syntax = app.highlighter.syntax_for_file(file.get_name());
    let (all_lines, _) = unified_lines(file);

    let lines: Vec<Line> = all_lines
        .iter()
        .skip(app.scroll_offset)
        .take(visible_lines)
        .map(|diff_line| {
            let mut spans = vec![Span::styled(
                line_number_gutter(diff_line),
                Style::default().fg(Color::DarkGray),
            )];

            let (prefix, colors) = match diff_line.line_type {
                LineType::Added => ("+ ", line_colors(LineType::Added)),
                LineType::Removed => ("- ", line_colors(LineType::Removed)),
                _ => ("  ", None),
            };
            let highlighted = app.highlighter.highlight(&diff_line.content, syntax);

            match colors {
                Some((base_bg, changed_bg)) => {
                    spans.push(Span::styled(prefix, Style::default().bg(base_bg).fg(Color::White)));
                    spans.extend(apply_diff_highlight(
                        highlighted,
                        &changed_ranges(diff_line),
                        base_bg,
                        changed_bg,
                    ));
                }
                None => {
                    spans.push(Span::raw(prefix));
                    spans.extend(highlighted);
                }
            }

            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(panel_border(app.focus != Focus::FileList))
                .title(file.get_name().to_string()),
        )
        .scroll((0, app.horizontal_scroll_offset as u16));
    f.render_widget(paragraph, area);

    let total_lines = all_lines.len();
    if total_lines > visible_lines {
        let mut scrollbar_state = ScrollbarState::new(total_lines).position(app.scroll_offset);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        f.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn line_number_gutter(line: &DiffLine) -> String {
    match (line.old_line_num, line.new_line_num) {
        (Some(old), Some(new)) => format!("{old:4}:{new:4} "),
        (Some(old), None) => format!("{old:4}:     "),
        (None, Some(new)) => format!("     {new:4} "),
        (None, None) => " ".repeat(10),
    }
}
