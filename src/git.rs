//! Thin wrapper over the `git` binary.
//!
//! The diff engine never touches this module; the reviewer uses it to fetch
//! diff text and to stage and commit files.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::{debug, info};

use crate::diff_file::DiffResult;
use crate::error::{DiffError, GitError};
use crate::parser::parse_diff;

#[derive(Debug, Clone)]
pub struct GitRunner {
    git_path: String,
    work_dir: Option<PathBuf>,
}

impl Default for GitRunner {
    fn default() -> Self {
        Self::new("git", None)
    }
}

impl GitRunner {
    pub fn new(git_path: impl Into<String>, work_dir: Option<PathBuf>) -> Self {
        let git_path = git_path.into();
        Self {
            git_path: if git_path.is_empty() {
                "git".to_string()
            } else {
                git_path
            },
            work_dir,
        }
    }

    pub fn git_path(&self) -> &str {
        &self.git_path
    }

    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_deref()
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = Command::new(&self.git_path);
        cmd.args(args);
        if let Some(dir) = &self.work_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run git and return stdout, mapping failures to [`GitError`].
    fn run(&self, args: &[String]) -> Result<String, GitError> {
        debug!("running {} {}", self.git_path, args.join(" "));
        let output = self.command(args).output()?;
        check_output(args, output)
    }

    pub fn is_git_repository(&self) -> bool {
        self.command(["rev-parse", "--git-dir"])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// `git diff --no-color <args>`.
    pub fn run_diff(&self, args: &[String]) -> Result<String, GitError> {
        let mut cmd_args = vec!["diff".to_string(), "--no-color".to_string()];
        cmd_args.extend(args.iter().cloned());
        self.run(&cmd_args)
    }

    /// Top-level directory of the repository, `git rev-parse --show-toplevel`.
    pub fn find_git_root(&self) -> Result<PathBuf, GitError> {
        let stdout = self.run(&["rev-parse".to_string(), "--show-toplevel".to_string()])?;
        Ok(PathBuf::from(stdout.trim()))
    }

    pub fn stage_file(&self, path: &str) -> Result<(), GitError> {
        info!("staging {path}");
        self.run(&["add".to_string(), "--".to_string(), path.to_string()])
            .map(|_| ())
    }

    pub fn unstage_file(&self, path: &str) -> Result<(), GitError> {
        info!("unstaging {path}");
        self.run(&[
            "reset".to_string(),
            "HEAD".to_string(),
            "--".to_string(),
            path.to_string(),
        ])
        .map(|_| ())
    }

    pub fn staged_files(&self) -> Result<Vec<String>, GitError> {
        let stdout = self.run(&[
            "diff".to_string(),
            "--cached".to_string(),
            "--name-only".to_string(),
        ])?;
        Ok(parse_name_list(&stdout))
    }

    pub fn commit(&self, message: &str) -> Result<(), GitError> {
        info!("committing staged changes");
        self.run(&["commit".to_string(), "-m".to_string(), message.to_string()])
            .map(|_| ())
    }

    /// Check the repository, run the diff and parse it.
    pub fn load(&self, args: &[String]) -> Result<DiffResult, GitError> {
        if !self.is_git_repository() {
            return Err(GitError::NotARepository);
        }

        let output = self.run_diff(args)?;
        if output.trim().is_empty() {
            return Err(GitError::Diff(DiffError::EmptyDiff));
        }

        Ok(parse_diff(&output)?)
    }
}

fn check_output(args: &[String], output: Output) -> Result<String, GitError> {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        if stderr.contains("not a git repository") {
            return Err(GitError::NotARepository);
        }
        return Err(GitError::CommandFailed {
            args: args.to_vec(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn parse_name_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
