use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const SHORTCUTS: &[(&str, &str)] = &[
    ("q", "Quit"),
    ("tab", "Focus"),
    ("j/k", "Move"),
    ("h/l", "Fold/H-Scroll"),
    ("enter", "Open"),
    ("d/u", "Scroll"),
    ("^d/^u", "Half page"),
    ("g/G", "Top/Bottom"),
    ("n/p", "Hunks"),
    ("H/L", "Fast H-Scroll"),
    ("s", "Sync Scroll"),
    ("v", "Toggle View"),
    ("space", "Stage"),
    ("c", "Commit"),
    ("?", "Hide Help"),
];

fn shortcut_spans(can_stage: bool) -> Vec<Span<'static>> {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    SHORTCUTS
        .iter()
        .filter(|(key, _)| can_stage || !matches!(*key, "space" | "c"))
        .flat_map(|&(key, action)| {
            [
                Span::styled(key, key_style),
                Span::raw(format!(":{action}  ")),
            ]
        })
        .collect()
}

pub fn render_footer(f: &mut Frame, area: Rect, can_stage: bool, status: Option<&str>) {
    let title = match status {
        Some(message) => format!("Shortcuts | {message}"),
        None => "Shortcuts".to_string(),
    };

    let footer = Paragraph::new(Line::from(shortcut_spans(can_stage)))
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });

    f.render_widget(footer, area);
}
