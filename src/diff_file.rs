use std::fmt;

/// Kind of a row in the aligned output.
///
/// `Placeholder` only ever appears after alignment; parsed hunks hold
/// `Context`, `Added` and `Removed` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Context,
    Added,
    Removed,
    Placeholder,
}

/// A fragment of a line's text, flagged when it belongs to the changed part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub changed: bool,
}

impl Segment {
    pub fn new(text: impl Into<String>, changed: bool) -> Self {
        Self {
            text: text.into(),
            changed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub line_type: LineType,
    pub old_line_num: Option<u32>,
    pub new_line_num: Option<u32>,
    pub content: String,
    /// Empty unless the row is a modification pair.
    pub segments: Vec<Segment>,
}

impl DiffLine {
    pub fn new_added(content: &str, line_number: u32) -> Self {
        Self {
            line_type: LineType::Added,
            old_line_num: None,
            new_line_num: Some(line_number),
            content: content.to_string(),
            segments: Vec::new(),
        }
    }

    pub fn new_removed(content: &str, line_number: u32) -> Self {
        Self {
            line_type: LineType::Removed,
            old_line_num: Some(line_number),
            new_line_num: None,
            content: content.to_string(),
            segments: Vec::new(),
        }
    }

    pub fn new_context(content: &str, old_line_num: u32, new_line_num: u32) -> Self {
        Self {
            line_type: LineType::Context,
            old_line_num: Some(old_line_num),
            new_line_num: Some(new_line_num),
            content: content.to_string(),
            segments: Vec::new(),
        }
    }

    pub fn placeholder() -> Self {
        Self {
            line_type: LineType::Placeholder,
            old_line_num: None,
            new_line_num: None,
            content: String::new(),
            segments: Vec::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.line_type == LineType::Placeholder
    }
}

/// One file section of a unified diff, aligned for side-by-side display.
///
/// For non-binary files `left_lines` and `right_lines` always have the same
/// length; row `i` of one side corresponds to row `i` of the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffFile {
    pub name: String,
    pub old_path: String,
    pub new_path: String,
    pub is_new: bool,
    pub is_deleted: bool,
    pub is_binary: bool,
    pub add_count: usize,
    pub del_count: usize,
    pub left_lines: Vec<DiffLine>,
    pub right_lines: Vec<DiffLine>,
    /// Row index at which each hunk's rows begin.
    pub hunk_offsets: Vec<usize>,
    /// Row index at which each change block begins, in row order.
    pub block_offsets: Vec<usize>,
}

impl DiffFile {
    pub fn new(old_path: &str, new_path: &str) -> Self {
        Self {
            name: new_path.to_string(),
            old_path: old_path.to_string(),
            new_path: new_path.to_string(),
            ..Default::default()
        }
    }

    pub fn row_count(&self) -> usize {
        self.left_lines.len()
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn is_renamed(&self) -> bool {
        !self.is_new && !self.is_deleted && self.old_path != self.new_path
    }

    /// One-letter status used by the file list.
    pub fn get_status(&self) -> char {
        if self.is_binary {
            'B'
        } else if self.is_new {
            'A'
        } else if self.is_deleted {
            'D'
        } else if self.is_renamed() {
            'R'
        } else {
            'M'
        }
    }

    pub fn stats(&self) -> DiffStats {
        DiffStats::new(self.add_count, self.del_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
}

impl DiffStats {
    pub fn new(additions: usize, deletions: usize) -> Self {
        Self {
            additions,
            deletions,
        }
    }
}

impl fmt::Display for DiffStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{} -{}", self.additions, self.deletions)
    }
}

/// Every file section of a parsed diff, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub files: Vec<DiffFile>,
}

impl DiffResult {
    pub fn total_stats(&self) -> DiffStats {
        self.files.iter().fold(DiffStats::default(), |acc, f| DiffStats {
            additions: acc.additions + f.add_count,
            deletions: acc.deletions + f.del_count,
        })
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}
