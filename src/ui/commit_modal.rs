use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::CommitState;

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    rect
}

pub fn render_commit_modal(f: &mut Frame, commit: &CommitState, staged_count: usize) {
    let area = centered(f.area(), f.area().width.saturating_sub(4).min(70), 7);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{staged_count} staged file(s)"),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Yellow)),
            Span::raw(commit.message.clone()),
            Span::styled("█", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
    ];
    if let Some(error) = &commit.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let modal = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Commit message (Enter: commit, Esc: cancel)")
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(modal, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let rect = centered(Rect::new(0, 0, 100, 40), 70, 7);
        assert_eq!((rect.width, rect.height), (70, 7));
        assert_eq!(rect.x, 15);
        assert!(rect.y >= 16 && rect.bottom() <= 24);
    }
}
