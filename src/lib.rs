//! Side-by-side review of `git diff` output.
//!
//! The engine is [`parse_diff`]: unified diff text in, one [`DiffFile`] per
//! file section out, each with equal-length left/right rows and word-level
//! segments on paired modification rows.

pub mod aligner;
pub mod diff_file;
pub mod error;
pub mod git;
pub mod parser;
pub mod word_diff;

mod test;

pub use diff_file::{DiffFile, DiffLine, DiffResult, DiffStats, LineType, Segment};
pub use error::{DiffError, GitError};
pub use git::GitRunner;
pub use parser::parse_diff;
