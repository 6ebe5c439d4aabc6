use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent};
use log::{error, info, warn};
use ratatui::widgets::ListState;
use splitdiff::{DiffError, DiffFile, DiffResult, GitError, GitRunner};

use crate::file_tree::FileTree;
use crate::ui::highlight_line::Highlighter;
use crate::ui::unified_diff::unified_lines;

/// Narrowest diff area that still fits two panels.
pub const MIN_SIDE_BY_SIDE_WIDTH: u16 = 100;

/// Rows taken by the shortcuts footer.
pub const FOOTER_HEIGHT: u16 = 3;

/// Panel receiving navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    FileList,
    OldPanel,
    NewPanel,
}

#[derive(Debug, Default)]
pub struct CommitState {
    pub active: bool,
    pub message: String,
    pub error: Option<String>,
}

pub struct App {
    pub files: Vec<DiffFile>,
    pub tree: FileTree,
    /// Label of the tree root, the repository directory name.
    pub root_name: Option<String>,
    /// Position of the highlighted entry among the visible tree nodes.
    pub selected_node: usize,
    /// File whose diff is shown.
    pub selected_file: usize,
    pub file_list_state: ListState,
    pub focus: Focus,
    pub sync_scroll: bool,
    /// Offset of the old panel, and of the unified view.
    pub scroll_offset: usize,
    pub new_scroll_offset: usize,
    pub horizontal_scroll_offset: usize,
    pub show_side_by_side: bool,
    pub show_shortcuts: bool,
    pub staged: HashSet<String>,
    pub commit: CommitState,
    pub status_message: Option<String>,
    pub highlighter: Highlighter,
    git: Option<GitRunner>,
    diff_args: Vec<String>,
}

impl App {
    pub fn new(
        result: DiffResult,
        git: Option<GitRunner>,
        diff_args: Vec<String>,
        root_name: Option<String>,
        show_side_by_side: bool,
        highlighter: Highlighter,
    ) -> Self {
        let mut app = Self {
            files: result.files,
            tree: FileTree::default(),
            root_name,
            selected_node: 0,
            selected_file: 0,
            file_list_state: ListState::default(),
            focus: Focus::FileList,
            sync_scroll: true,
            scroll_offset: 0,
            new_scroll_offset: 0,
            horizontal_scroll_offset: 0,
            show_side_by_side,
            show_shortcuts: true,
            staged: HashSet::new(),
            commit: CommitState::default(),
            status_message: None,
            highlighter,
            git,
            diff_args,
        };
        app.rebuild_tree();
        app.reload_staged();
        app
    }

    pub fn can_stage(&self) -> bool {
        self.git.is_some()
    }

    pub fn selected(&self) -> Option<&DiffFile> {
        self.files.get(self.selected_file)
    }

    /// Number of scrollable rows of the selected file in the current view.
    pub fn content_len(&self) -> usize {
        match self.selected() {
            Some(file) if self.show_side_by_side => file.row_count(),
            Some(file) => unified_lines(file).0.len(),
            None => 0,
        }
    }

    fn hunk_offsets(&self) -> Vec<usize> {
        match self.selected() {
            Some(file) if self.show_side_by_side => file.hunk_offsets.clone(),
            Some(file) => unified_lines(file).1,
            None => Vec::new(),
        }
    }

    /// Rows visible in the diff panel for a terminal of `term_height` rows.
    pub fn viewport_height(&self, term_height: u16) -> usize {
        let footer = if self.show_shortcuts { FOOTER_HEIGHT } else { 0 };
        term_height.saturating_sub(footer).saturating_sub(2) as usize
    }

    /// Rebuild the tree from `files` and highlight its first file.
    fn rebuild_tree(&mut self) {
        self.tree = FileTree::build(&self.files, self.root_name.as_deref());
        let visible = self.tree.visible();
        let first = visible
            .iter()
            .position(|&id| self.tree.file_index(id).is_some())
            .unwrap_or(0);
        let file = visible
            .get(first)
            .and_then(|&id| self.tree.file_index(id))
            .unwrap_or(0);
        self.selected_node = first;
        self.file_list_state.select(Some(first));
        self.select_file(file);
    }

    fn select_file(&mut self, index: usize) {
        self.selected_file = index;
        self.scroll_offset = 0;
        self.new_scroll_offset = 0;
        self.horizontal_scroll_offset = 0;
    }

    /// Tree node under the file list cursor.
    pub fn current_node(&self) -> Option<usize> {
        self.tree.visible().get(self.selected_node).copied()
    }

    /// Move the cursor to a visible position. Landing on a file shows it;
    /// a directory keeps the current diff.
    fn select_node(&mut self, position: usize) {
        self.selected_node = position;
        self.file_list_state.select(Some(position));
        let file = self.current_node().and_then(|id| self.tree.file_index(id));
        if let Some(index) = file.filter(|&index| index != self.selected_file) {
            self.select_file(index);
        }
    }

    pub fn next_file(&mut self) {
        let len = self.tree.visible().len();
        if len > 0 {
            self.select_node((self.selected_node + 1) % len);
        }
    }

    pub fn previous_file(&mut self) {
        let len = self.tree.visible().len();
        if len > 0 {
            let position = if self.selected_node == 0 {
                len - 1
            } else {
                self.selected_node - 1
            };
            self.select_node(position);
        }
    }

    /// Collapse the directory under the cursor, or move to its parent.
    pub fn collapse_or_parent(&mut self) {
        let Some(id) = self.current_node() else {
            return;
        };
        if self.tree.is_expanded(id) {
            self.tree.set_expanded(id, false);
            return;
        }
        let Some(parent) = self.tree.node(id).parent else {
            return;
        };
        if let Some(position) = self.tree.visible().iter().position(|&v| v == parent) {
            self.select_node(position);
        }
    }

    pub fn expand_directory(&mut self) {
        if let Some(id) = self.current_node() {
            self.tree.set_expanded(id, true);
        }
    }

    /// Enter on the file list: toggle a directory, or move focus into the
    /// diff of a file.
    pub fn activate_node(&mut self) {
        let Some(id) = self.current_node() else {
            return;
        };
        if self.tree.node(id).is_directory() {
            let expanded = self.tree.is_expanded(id);
            self.tree.set_expanded(id, !expanded);
        } else {
            self.focus = Focus::OldPanel;
        }
    }

    /// Focus order: file list, old panel, new panel. The unified view has a
    /// single diff panel.
    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::FileList => Focus::OldPanel,
            Focus::OldPanel if self.show_side_by_side => Focus::NewPanel,
            Focus::OldPanel | Focus::NewPanel => Focus::FileList,
        };
    }

    pub fn previous_focus(&mut self) {
        self.focus = match self.focus {
            Focus::FileList if self.show_side_by_side => Focus::NewPanel,
            Focus::FileList | Focus::NewPanel => Focus::OldPanel,
            Focus::OldPanel => Focus::FileList,
        };
    }

    /// Turning sync back on snaps the new panel to the old one.
    pub fn toggle_sync(&mut self) {
        self.sync_scroll = !self.sync_scroll;
        if self.sync_scroll {
            self.new_scroll_offset = self.scroll_offset;
        }
        self.status_message = Some(format!(
            "Sync scroll {}",
            if self.sync_scroll { "on" } else { "off" }
        ));
    }

    /// Which offsets a vertical scroll moves: (old, new). Without sync only
    /// the focused diff panel moves.
    fn scroll_targets(&self) -> (bool, bool) {
        if self.sync_scroll || !self.show_side_by_side {
            return (true, true);
        }
        match self.focus {
            Focus::OldPanel => (true, false),
            Focus::NewPanel => (false, true),
            Focus::FileList => (true, true),
        }
    }

    /// Offset of the panel that navigation is relative to.
    pub fn focused_offset(&self) -> usize {
        match self.scroll_targets() {
            (false, true) => self.new_scroll_offset,
            _ => self.scroll_offset,
        }
    }

    fn scroll_with(&mut self, to: impl Fn(usize) -> usize) {
        let last = self.content_len().saturating_sub(1);
        let (old, new) = self.scroll_targets();
        if old {
            self.scroll_offset = to(self.scroll_offset).min(last);
        }
        if new {
            self.new_scroll_offset = to(self.new_scroll_offset).min(last);
        }
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_with(|offset| offset.saturating_add(rows));
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_with(|offset| offset.saturating_sub(rows));
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_with(|_| 0);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_with(|_| usize::MAX);
    }

    pub fn scroll_right(&mut self, columns: usize) {
        self.horizontal_scroll_offset = (self.horizontal_scroll_offset + columns).min(u16::MAX as usize);
    }

    pub fn scroll_left(&mut self, columns: usize) {
        self.horizontal_scroll_offset = self.horizontal_scroll_offset.saturating_sub(columns);
    }

    pub fn next_hunk(&mut self) {
        let current = self.focused_offset();
        if let Some(&offset) = self.hunk_offsets().iter().find(|&&o| o > current) {
            self.scroll_with(|_| offset);
        }
    }

    pub fn previous_hunk(&mut self) {
        let current = self.focused_offset();
        if let Some(&offset) = self.hunk_offsets().iter().rev().find(|&&o| o < current) {
            self.scroll_with(|_| offset);
        }
    }

    /// Switch between side-by-side and unified. Side-by-side needs at least
    /// [`MIN_SIDE_BY_SIDE_WIDTH`] columns.
    pub fn toggle_view_mode(&mut self, width: u16) {
        self.show_side_by_side = width >= MIN_SIDE_BY_SIDE_WIDTH && !self.show_side_by_side;
        let last = self.content_len().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.min(last);
        self.new_scroll_offset = self.new_scroll_offset.min(last);
        if !self.show_side_by_side && self.focus == Focus::NewPanel {
            self.focus = Focus::OldPanel;
        }
    }

    pub fn toggle_shortcuts(&mut self) {
        self.show_shortcuts = !self.show_shortcuts;
    }

    pub fn is_staged(&self, file: &DiffFile) -> bool {
        self.staged.contains(file.get_name())
    }

    fn reload_staged(&mut self) {
        let Some(git) = &self.git else {
            return;
        };
        match git.staged_files() {
            Ok(paths) => self.staged = paths.into_iter().collect(),
            Err(err) => warn!("could not list staged files: {err}"),
        }
    }

    pub fn toggle_staging(&mut self) {
        let Some(git) = &self.git else {
            self.status_message = Some("Staging needs a git repository".to_string());
            return;
        };
        let file = self.current_node().and_then(|id| self.tree.file_index(id));
        let Some(file) = file.and_then(|index| self.files.get(index)) else {
            self.status_message = Some("Select a file to stage".to_string());
            return;
        };

        let path = file.get_name().to_string();
        let staged = self.staged.contains(&path);
        let outcome = if staged {
            git.unstage_file(&path)
        } else {
            git.stage_file(&path)
        };

        match outcome {
            Ok(()) if staged => {
                self.staged.remove(&path);
                self.status_message = Some(format!("Unstaged {path}"));
            }
            Ok(()) => {
                self.status_message = Some(format!("Staged {path}"));
                self.staged.insert(path);
            }
            Err(err) => {
                error!("staging {path} failed: {err}");
                self.status_message = Some(err.to_string());
            }
        }
    }

    pub fn open_commit_modal(&mut self) {
        if self.git.is_none() || self.staged.is_empty() {
            self.status_message = Some("Stage a file before committing".to_string());
            return;
        }
        self.commit = CommitState {
            active: true,
            ..CommitState::default()
        };
    }

    pub fn close_commit_modal(&mut self) {
        self.commit = CommitState::default();
    }

    /// Key handling while the commit modal is open.
    pub fn handle_commit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_commit_modal(),
            KeyCode::Enter => self.execute_commit(),
            KeyCode::Backspace => {
                self.commit.message.pop();
            }
            KeyCode::Char(c) => self.commit.message.push(c),
            _ => {}
        }
    }

    fn execute_commit(&mut self) {
        let message = self.commit.message.trim().to_string();
        if message.is_empty() {
            self.commit.error = Some("Commit message cannot be empty".to_string());
            return;
        }
        let Some(git) = &self.git else {
            self.commit.error = Some("Git runner not available".to_string());
            return;
        };

        if let Err(err) = git.commit(&message) {
            error!("commit failed: {err}");
            self.commit.error = Some(err.to_string());
            return;
        }

        self.close_commit_modal();
        self.status_message = Some("Committed".to_string());
        self.refresh_diff();
    }

    /// Re-run the diff with the startup arguments and reset the selection.
    pub fn refresh_diff(&mut self) {
        let Some(git) = &self.git else {
            return;
        };

        let files = match git.load(&self.diff_args) {
            Ok(result) => result.files,
            Err(GitError::Diff(DiffError::EmptyDiff)) => Vec::new(),
            Err(err) => {
                error!("refreshing diff failed: {err}");
                self.status_message = Some(err.to_string());
                return;
            }
        };

        info!("diff refreshed: {} files", files.len());
        self.files = files;
        self.rebuild_tree();
        self.reload_staged();
    }
}
