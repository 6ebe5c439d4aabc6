use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use splitdiff::{DiffFile, DiffLine, LineType};
use syntect::parsing::SyntaxReference;

use crate::{
    app::{App, Focus},
    ui::{
        diff_utils::{
            PLACEHOLDER_BG, apply_diff_highlight, changed_ranges, line_colors, panel_border,
        },
        highlight_line::Highlighter,
    },
};

#[derive(Clone, Copy)]
enum Side {
    Old,
    New,
}

pub fn render_side_by_side_diff(f: &mut Frame, area: Rect, file: &DiffFile, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let visible_lines = area.height.saturating_sub(2) as usize;
    let panel_width = chunks[0].width.saturating_sub(2) as usize;
    let syntax = app.highlighter.syntax_for_file(file.get_name());

    let panel = |lines: &[DiffLine], side: Side, offset: usize| -> Text<'static> {
        lines
            .iter()
            .skip(offset)
            .take(visible_lines)
            .map(|line| render_row(line, side, syntax, &app.highlighter, panel_width))
            .collect::<Vec<_>>()
            .into()
    };

    let old_text = panel(&file.left_lines, Side::Old, app.scroll_offset);
    let new_text = panel(&file.right_lines, Side::New, app.new_scroll_offset);

    let scroll = (0, app.horizontal_scroll_offset as u16);
    let old_paragraph = Paragraph::new(old_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(panel_border(app.focus == Focus::OldPanel))
                .title(format!("Old: {}", file.old_path)),
        )
        .scroll(scroll);
    let new_paragraph = Paragraph::new(new_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(panel_border(app.focus == Focus::NewPanel))
                .title(format!("New: {}", file.new_path)),
        )
        .scroll(scroll);

    f.render_widget(old_paragraph, chunks[0]);
    f.render_widget(new_paragraph, chunks[1]);

    let total_lines = file.row_count();
    if total_lines > visible_lines {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        for (chunk, offset) in chunks.iter().zip([app.scroll_offset, app.new_scroll_offset]) {
            let mut scrollbar_state = ScrollbarState::new(total_lines).position(offset);
            f.render_stateful_widget(
                scrollbar.clone(),
                chunk.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }
    }
}

fn render_row(
    line: &DiffLine,
    side: Side,
    syntax: Option<&SyntaxReference>,
    highlighter: &Highlighter,
    panel_width: usize,
) -> Line<'static> {
    if line.line_type == LineType::Placeholder {
        return Line::from(Span::styled(
            " ".repeat(panel_width),
            Style::default().bg(PLACEHOLDER_BG),
        ));
    }

    let number = match side {
        Side::Old => line.old_line_num,
        Side::New => line.new_line_num,
    };
    let mut spans = vec![Span::styled(
        number.map_or_else(|| "     ".to_string(), |n| format!("{n:4} ")),
        Style::default().fg(Color::DarkGray),
    )];

    let highlighted = highlighter.highlight(&line.content, syntax);
    match line_colors(line.line_type) {
        Some((base_bg, changed_bg)) => {
            spans.extend(apply_diff_highlight(
                highlighted,
                &changed_ranges(line),
                base_bg,
                changed_bg,
            ));
        }
        None => spans.extend(highlighted),
    }

    Line::from(spans)
}
