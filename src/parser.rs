//! Unified diff parser.
//!
//! Turns `git diff` output into [`DiffFile`]s. The input is split into lines
//! and scanned with a single cursor: file header, metadata, `---`/`+++`
//! paths, then hunks. Each file's hunks are handed to the aligner before the
//! file is returned.

use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use crate::aligner::align_hunks;
use crate::diff_file::{DiffFile, DiffLine, DiffResult};
use crate::error::DiffError;

static DIFF_GIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^diff --git a/(.+) b/(.+)$")
        .expect("DIFF_GIT_RE is a valid static regex pattern")
});

/// `git diff --no-prefix` drops the `a/` and `b/` markers.
static DIFF_GIT_NO_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^diff --git (\S+) (\S+)$")
        .expect("DIFF_GIT_NO_PREFIX_RE is a valid static regex pattern")
});

static HUNK_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@")
        .expect("HUNK_HEADER_RE is a valid static regex pattern")
});

static BINARY_FILES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Binary files .* differ$")
        .expect("BINARY_FILES_RE is a valid static regex pattern")
});

const DIFF_GIT: &str = "diff --git ";
const HUNK_START: &str = "@@ ";
const NO_NEWLINE_MARKER: &str = "\\ ";

/// Metadata lines that carry nothing the viewer needs.
const IGNORED_METADATA: [&str; 6] = [
    "old mode ",
    "new mode ",
    "index ",
    "similarity index ",
    "rename from ",
    "rename to ",
];

/// Numbers from a `@@ -S[,C] +S[,C] @@` line. Omitted counts are 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
}

/// A parsed hunk before alignment.
///
/// The header counts are kept for diagnostics only; alignment works from
/// the line sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    fn new(header: HunkHeader) -> Self {
        Self {
            old_start: header.old_start,
            old_count: header.old_count,
            new_start: header.new_start,
            new_count: header.new_count,
            lines: Vec::new(),
        }
    }

    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        )
    }
}

pub fn parse_hunk_header(line: &str) -> Option<HunkHeader> {
    let caps = HUNK_HEADER_RE.captures(line)?;
    let number = |idx: usize| -> Option<u32> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(1),
        }
    };

    Some(HunkHeader {
        old_start: number(1)?,
        old_count: number(2)?,
        new_start: number(3)?,
        new_count: number(4)?,
    })
}

/// Parse unified diff text into aligned per-file records.
///
/// Blank input and input without any `diff --git` section yield
/// [`DiffError::EmptyDiff`]. A bad hunk header aborts the whole parse with
/// [`DiffError::MalformedHunk`].
pub fn parse_diff(diff_text: &str) -> Result<DiffResult, DiffError> {
    if diff_text.trim().is_empty() {
        return Err(DiffError::EmptyDiff);
    }

    let mut parser = Parser::new(diff_text);
    let mut files = Vec::new();

    while let Some(line) = parser.peek() {
        if line.starts_with(DIFF_GIT) {
            if let Some(file) = parser.parse_file()? {
                files.push(file);
            }
        } else {
            parser.advance();
        }
    }

    if files.is_empty() {
        return Err(DiffError::EmptyDiff);
    }

    Ok(DiffResult { files })
}

/// How a hunk's line scan stopped.
enum HunkEnd {
    /// At the next `@@ `, the next `diff --git `, or the end of input.
    Boundary,
    /// At a blank line not followed by diff content.
    EndOfFile,
}

struct Parser<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.split('\n').collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Parse one file section starting at a `diff --git ` line. Returns
    /// `None` when the header names no paths; the section is then skipped.
    fn parse_file(&mut self) -> Result<Option<DiffFile>, DiffError> {
        let header = self.lines[self.pos];
        self.advance();

        let Some(mut file) = file_from_header(header) else {
            warn!("skipping diff section with unreadable header: {header}");
            return Ok(None);
        };

        if !self.parse_metadata(&mut file) {
            debug!("binary file {}", file.name);
            return Ok(Some(file));
        }

        self.parse_paths(&mut file);

        let mut hunks = Vec::new();
        while let Some(line) = self.peek() {
            if line.starts_with(DIFF_GIT) {
                break;
            }
            if !line.starts_with(HUNK_START) {
                self.advance();
                continue;
            }

            let (hunk, end) = self.parse_hunk()?;
            hunks.push(hunk);
            if let HunkEnd::EndOfFile = end {
                break;
            }
        }

        let alignment = align_hunks(&hunks);
        file.left_lines = alignment.left;
        file.right_lines = alignment.right;
        file.add_count = alignment.add_count;
        file.del_count = alignment.del_count;
        file.hunk_offsets = alignment.hunk_offsets;
        file.block_offsets = alignment.block_offsets;

        debug!(
            "parsed {} ({} hunks, {})",
            file.name,
            hunks.len(),
            file.stats()
        );

        Ok(Some(file))
    }

    /// Consume extended header lines up to `--- ` or the next file. Returns
    /// `false` when the file turned out to be binary, which ends its section.
    ///
    /// Hunks are only read after a `--- ` line, so a section without one
    /// yields a file with no rows.
    fn parse_metadata(&mut self, file: &mut DiffFile) -> bool {
        while let Some(line) = self.peek() {
            if line.starts_with("--- ") || line.starts_with(DIFF_GIT) {
                break;
            }

            if line.starts_with("new file mode ") {
                file.is_new = true;
            } else if line.starts_with("deleted file mode ") {
                file.is_deleted = true;
            } else if BINARY_FILES_RE.is_match(line) {
                file.is_binary = true;
                self.advance();
                return false;
            } else if !IGNORED_METADATA.iter().any(|p| line.starts_with(p)) {
                debug!("ignoring header line in {}: {line}", file.name);
            }
            self.advance();
        }

        true
    }

    fn parse_paths(&mut self, file: &mut DiffFile) {
        if let Some(path) = self.peek().and_then(|l| l.strip_prefix("--- ")) {
            if path == "/dev/null" {
                file.is_new = true;
            } else {
                file.old_path = path.strip_prefix("a/").unwrap_or(path).to_string();
            }
            self.advance();
        }

        if let Some(path) = self.peek().and_then(|l| l.strip_prefix("+++ ")) {
            if path == "/dev/null" {
                file.is_deleted = true;
                file.name = file.old_path.clone();
            } else {
                file.new_path = path.strip_prefix("b/").unwrap_or(path).to_string();
                file.name = file.new_path.clone();
            }
            self.advance();
        }
    }

    /// Parse the hunk whose header is at the cursor.
    fn parse_hunk(&mut self) -> Result<(Hunk, HunkEnd), DiffError> {
        let header_line = self.lines[self.pos];
        let header = parse_hunk_header(header_line).ok_or_else(|| DiffError::MalformedHunk {
            line: self.pos + 1,
            header: header_line.to_string(),
        })?;
        self.advance();

        let mut hunk = Hunk::new(header);
        let mut old_line = header.old_start;
        let mut new_line = header.new_start;
        let mut end = HunkEnd::Boundary;

        while let Some(line) = self.peek() {
            if line.starts_with(HUNK_START) || line.starts_with(DIFF_GIT) {
                break;
            }

            if line.starts_with(NO_NEWLINE_MARKER) {
                self.advance();
                continue;
            }

            if line.is_empty() {
                // A context line whose leading space was stripped, or the end
                // of this file's diff. Only the next line can tell.
                if self.next_continues_diff() {
                    hunk.lines.push(DiffLine::new_context("", old_line, new_line));
                    old_line = old_line.saturating_add(1);
                    new_line = new_line.saturating_add(1);
                    self.advance();
                    continue;
                }
                end = HunkEnd::EndOfFile;
                break;
            }

            if let Some(content) = line.strip_prefix(' ') {
                hunk.lines.push(DiffLine::new_context(content, old_line, new_line));
                old_line = old_line.saturating_add(1);
                new_line = new_line.saturating_add(1);
            } else if let Some(content) = line.strip_prefix('+') {
                hunk.lines.push(DiffLine::new_added(content, new_line));
                new_line = new_line.saturating_add(1);
            } else if let Some(content) = line.strip_prefix('-') {
                hunk.lines.push(DiffLine::new_removed(content, old_line));
                old_line = old_line.saturating_add(1);
            } else {
                warn!("line {} has no diff prefix, treating as context", self.pos + 1);
                hunk.lines.push(DiffLine::new_context(line, old_line, new_line));
                old_line = old_line.saturating_add(1);
                new_line = new_line.saturating_add(1);
            }
            self.advance();
        }

        let old_seen = old_line - header.old_start;
        let new_seen = new_line - header.new_start;
        if old_seen != header.old_count || new_seen != header.new_count {
            debug!(
                "{} declares {}/{} lines but has {old_seen}/{new_seen}",
                hunk.header(),
                header.old_count,
                header.new_count
            );
        }

        Ok((hunk, end))
    }

    fn next_continues_diff(&self) -> bool {
        self.lines.get(self.pos + 1).is_some_and(|next| {
            next.starts_with(' ')
                || next.starts_with('+')
                || next.starts_with('-')
                || next.starts_with(HUNK_START)
                || next.starts_with(DIFF_GIT)
                || next.starts_with(NO_NEWLINE_MARKER)
        })
    }
}

fn file_from_header(line: &str) -> Option<DiffFile> {
    let caps = DIFF_GIT_RE
        .captures(line)
        .or_else(|| DIFF_GIT_NO_PREFIX_RE.captures(line))?;
    Some(DiffFile::new(&caps[1], &caps[2]))
}
