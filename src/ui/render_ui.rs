use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use splitdiff::DiffFile;

use crate::{
    app::{App, FOOTER_HEIGHT, Focus, MIN_SIDE_BY_SIDE_WIDTH},
    ui::{
        commit_modal::render_commit_modal, diff_utils::panel_border, footer::render_footer,
        side_by_side_diff::render_side_by_side_diff, unified_diff::render_unified_diff,
    },
};

const FILE_LIST_WIDTH: u16 = 34;

fn status_color(status: char) -> Color {
    match status {
        'A' => Color::Green,
        'D' => Color::Red,
        'M' => Color::Yellow,
        'R' => Color::Cyan,
        'B' => Color::Magenta,
        _ => Color::White,
    }
}

fn file_item<'a>(file: &'a DiffFile, name: &'a str, depth: usize, staged: bool) -> ListItem<'a> {
    let status = file.get_status();
    ListItem::new(Line::from(vec![
        Span::raw("  ".repeat(depth)),
        Span::styled(
            format!("{status} "),
            Style::default()
                .fg(status_color(status))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            if staged { "● " } else { "  " },
            Style::default().fg(Color::Green),
        ),
        Span::raw(name),
        Span::styled(format!(" +{}", file.add_count), Style::default().fg(Color::Green)),
        Span::styled(format!(" -{}", file.del_count), Style::default().fg(Color::Red)),
    ]))
}

fn directory_item(name: &str, depth: usize, expanded: bool) -> ListItem<'_> {
    ListItem::new(Line::from(vec![
        Span::raw("  ".repeat(depth)),
        Span::styled(
            if expanded { "▾ " } else { "▸ " },
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{name}/"),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
    ]))
}

fn render_file_list(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .tree
        .visible()
        .into_iter()
        .filter_map(|id| {
            let node = app.tree.node(id);
            match app.tree.file_index(id) {
                Some(index) => {
                    let file = app.files.get(index)?;
                    Some(file_item(file, &node.name, node.depth, app.is_staged(file)))
                }
                None => Some(directory_item(&node.name, node.depth, app.tree.is_expanded(id))),
            }
        })
        .collect();

    let total = app
        .files
        .iter()
        .fold((0, 0), |(a, d), file| (a + file.add_count, d + file.del_count));
    let title = format!("Files ({}) +{} -{}", app.files.len(), total.0, total.1);
    let sync = format!(" sync: {} ", if app.sync_scroll { "on" } else { "off" });

    let files_list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(panel_border(app.focus == Focus::FileList))
                .title(title)
                .title_bottom(sync),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(files_list, area, &mut app.file_list_state.clone());
}

fn render_notice(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let notice = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(notice, area);
}

pub fn ui(f: &mut Frame, app: &App) {
    let size = f.area();

    let (content_area, footer_area) = if app.show_shortcuts {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)])
            .split(size);
        (main_chunks[0], Some(main_chunks[1]))
    } else {
        (size, None)
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FILE_LIST_WIDTH), Constraint::Min(0)])
        .split(content_area);

    render_file_list(f, chunks[0], app);

    let diff_area = chunks[1];
    match app.selected() {
        None => render_notice(f, diff_area, "Diff", "No changes to display"),
        Some(file) if file.is_binary => {
            render_notice(f, diff_area, file.get_name(), "Binary file (no text diff)")
        }
        Some(file) if app.show_side_by_side && diff_area.width >= MIN_SIDE_BY_SIDE_WIDTH => {
            render_side_by_side_diff(f, diff_area, file, app)
        }
        Some(file) => render_unified_diff(f, diff_area, file, app),
    }

    if let Some(footer_area) = footer_area {
        render_footer(f, footer_area, app.can_stage(), app.status_message.as_deref());
    }

    if app.commit.active {
        render_commit_modal(f, &app.commit, app.staged.len());
    }
}
