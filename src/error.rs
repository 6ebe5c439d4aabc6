//! Error types for the diff engine and the git collaborator.

use thiserror::Error;

/// Failure of a single parse call. No partial result accompanies either
/// variant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffError {
    /// Blank input, or input with no `diff --git` file sections.
    #[error("no diff output")]
    EmptyDiff,

    /// A line starting with `@@ ` did not match the hunk header pattern.
    #[error("parse error at line {line}: invalid hunk header `{header}`")]
    MalformedHunk {
        /// 1-based line number in the input text.
        line: usize,
        header: String,
    },
}

#[derive(Debug, Error)]
pub enum GitError {
    #[error("not a git repository")]
    NotARepository,

    #[error("git command failed: git {}: {stderr}", args.join(" "))]
    CommandFailed { args: Vec<String>, stderr: String },

    #[error("failed to run git: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Diff(#[from] DiffError),
}
