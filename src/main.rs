use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, info, warn};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use splitdiff::{DiffError, DiffResult, GitError, GitRunner, parse_diff};

use crate::app::{App, Focus};
use crate::ui::{
    highlight_line::{DEFAULT_THEME, Highlighter},
    render_ui::ui,
};

mod app;
mod file_tree;
mod ui;

const PAGE_ROWS: usize = 10;
const SCROLL_COLUMNS: usize = 4;
const FAST_SCROLL_COLUMNS: usize = 20;
const WHEEL_ROWS: usize = 3;

#[derive(Parser)]
#[command(author, version, about = "Side-by-side review of git diffs", long_about = None)]
struct Args {
    /// Git diff arguments (e.g., "HEAD~1", "--staged", "main..feature")
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    diff_args: Vec<String>,

    /// Git executable to run
    #[arg(long, default_value = "git")]
    git_path: String,

    /// Run git in this directory
    #[arg(short = 'C', long)]
    work_dir: Option<PathBuf>,

    /// Read a unified diff from a file ("-" for stdin) instead of running git
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Start in the unified view
    #[arg(long)]
    unified: bool,

    /// Syntax highlighting theme
    #[arg(long, default_value = DEFAULT_THEME)]
    theme: String,

    /// Write logs to this file (filtered by RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()?;
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    let mut text = String::new();
    if path == Path::new("-") {
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read diff from stdin")?;
    } else {
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut text))
            .with_context(|| format!("failed to read diff from {}", path.display()))?;
    }
    Ok(text)
}

fn load(args: &Args) -> Result<(Result<DiffResult, GitError>, Option<GitRunner>)> {
    match &args.input {
        Some(path) => {
            let text = read_input(path)?;
            Ok((parse_diff(&text).map_err(GitError::from), None))
        }
        None => {
            let git = GitRunner::new(args.git_path.as_str(), args.work_dir.clone());
            Ok((git.load(&args.diff_args), Some(git)))
        }
    }
}

/// Directory name of the repository root, used to label the file tree.
fn repository_name(git: &GitRunner) -> Option<String> {
    match git.find_git_root() {
        Ok(root) => root.file_name().map(|name| name.to_string_lossy().into_owned()),
        Err(err) => {
            warn!("could not find repository root: {err}");
            None
        }
    }
}

fn handle_key<B: Backend>(terminal: &Terminal<B>, app: &mut App, key: KeyEvent) -> Result<bool> {
    if app.commit.active {
        app.handle_commit_key(key);
        return Ok(false);
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Char('c') if ctrl => return Ok(true),
        KeyCode::Char('d') if ctrl => {
            let rows = app.viewport_height(terminal.size()?.height) / 2;
            app.scroll_down(rows.max(1));
        }
        KeyCode::Char('u') if ctrl => {
            let rows = app.viewport_height(terminal.size()?.height) / 2;
            app.scroll_up(rows.max(1));
        }
        KeyCode::Tab => app.next_focus(),
        KeyCode::BackTab => app.previous_focus(),
        KeyCode::Char('j') | KeyCode::Down if app.focus == Focus::FileList => app.next_file(),
        KeyCode::Char('k') | KeyCode::Up if app.focus == Focus::FileList => app.previous_file(),
        KeyCode::Char('h') | KeyCode::Left if app.focus == Focus::FileList => {
            app.collapse_or_parent()
        }
        KeyCode::Char('l') | KeyCode::Right if app.focus == Focus::FileList => {
            app.expand_directory()
        }
        KeyCode::Enter if app.focus == Focus::FileList => app.activate_node(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::Char('h') | KeyCode::Left => app.scroll_left(SCROLL_COLUMNS),
        KeyCode::Char('l') | KeyCode::Right => app.scroll_right(SCROLL_COLUMNS),
        KeyCode::Char('d') | KeyCode::PageDown => app.scroll_down(PAGE_ROWS),
        KeyCode::Char('u') | KeyCode::PageUp => app.scroll_up(PAGE_ROWS),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.scroll_to_bottom(),
        KeyCode::Char('n') => app.next_hunk(),
        KeyCode::Char('p') => app.previous_hunk(),
        KeyCode::Char('H') => app.scroll_left(FAST_SCROLL_COLUMNS),
        KeyCode::Char('L') => app.scroll_right(FAST_SCROLL_COLUMNS),
        KeyCode::Char('s') => app.toggle_sync(),
        KeyCode::Char('v') => {
            let width = terminal.size()?.width;
            app.toggle_view_mode(width);
        }
        KeyCode::Char('?') => app.toggle_shortcuts(),
        KeyCode::Char(' ') => app.toggle_staging(),
        KeyCode::Char('c') => app.open_commit_modal(),
        _ => {}
    }
    Ok(false)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, &app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key(terminal, &mut app, key)? {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => app.scroll_down(WHEEL_ROWS),
                MouseEventKind::ScrollUp => app.scroll_up(WHEEL_ROWS),
                _ => {}
            },
            _ => {}
        }
    }
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let (loaded, git) = load(&args)?;
    let result = match loaded {
        Ok(result) => result,
        Err(GitError::Diff(DiffError::EmptyDiff)) => {
            eprintln!("No changes to display");
            eprintln!("Try: splitdiff HEAD~1  or  splitdiff --staged");
            return Ok(ExitCode::SUCCESS);
        }
        Err(GitError::NotARepository) => {
            eprintln!("Error: not a git repository");
            eprintln!("Run splitdiff inside a repository, or pass --input <FILE>");
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err).context("failed to load diff"),
    };

    let stats = result.total_stats();
    info!("loaded {} files ({stats})", result.file_count());

    let root_name = git.as_ref().and_then(repository_name);
    let highlighter = Highlighter::new(&args.theme);
    debug!("using theme {}", highlighter.theme_name());
    let app = App::new(
        result,
        git,
        args.diff_args,
        root_name,
        !args.unified,
        highlighter,
    );

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = restore_terminal();
        default_hook(panic);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, app);

    restore_terminal()?;
    terminal.show_cursor()?;

    res?;
    Ok(ExitCode::SUCCESS)
}
