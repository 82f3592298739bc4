use crate::error::Result;
use gix::discover;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, warn};

pub const LOG_FORMAT: &str = "--pretty=format:%an|%ad";

/// Raw output of one git invocation. `Unavailable` is handled exactly like
/// empty output by everything downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Text(String),
    Unavailable(String),
}

impl LogOutput {
    pub fn text(&self) -> &str {
        match self {
            LogOutput::Text(text) => text,
            LogOutput::Unavailable(_) => "",
        }
    }
}

pub trait HistorySource {
    fn log(&self) -> LogOutput;
    fn diff(&self, range: Option<&str>) -> LogOutput;
}

pub struct GitRepo {
    path: PathBuf,
    include_merges: bool,
    progress: bool,
}

impl GitRepo {
    /// Discover the repository containing `path`, or the current dir if `None`.
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self {
            path,
            include_merges: false,
            progress: false,
        })
    }

    /// A repository handle that skips discovery. Used when discovery fails
    /// so the run can carry on with whatever git reports from `path`.
    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            include_merges: false,
            progress: false,
        }
    }

    pub fn with_merges(mut self, include_merges: bool) -> Self {
        self.include_merges = include_merges;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn log_args(&self) -> Vec<&'static str> {
        let mut args = vec![
            "-c",
            "core.quotePath=false",
            "log",
            "--numstat",
            "--no-color",
            LOG_FORMAT,
            "--date=iso-strict",
        ];
        if !self.include_merges {
            args.push("--no-merges");
        }
        args
    }

    fn run_git(&self, args: &[&str], message: &'static str) -> LogOutput {
        let pb = if self.progress {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout())
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));

        debug!(?args, path = %self.path.display(), "running git");
        let output = Command::new("git").args(args).current_dir(&self.path).output();
        pb.finish_and_clear();

        match output {
            Ok(out) if out.status.success() => LogOutput::Text(String::from_utf8_lossy(&out.stdout).into_owned()),
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
                warn!(status = %out.status, %stderr, "git exited unsuccessfully, treating history as empty");
                LogOutput::Unavailable(stderr)
            }
            Err(e) => {
                warn!(error = %e, "could not run git, treating history as empty");
                LogOutput::Unavailable(e.to_string())
            }
        }
    }
}

impl HistorySource for GitRepo {
    fn log(&self) -> LogOutput {
        self.run_git(&self.log_args(), "Reading commit history...")
    }

    fn diff(&self, range: Option<&str>) -> LogOutput {
        let mut args = vec!["-c", "core.quotePath=false", "diff", "--numstat", "--no-color"];
        if let Some(range) = range {
            args.push(range);
        }
        self.run_git(&args, "Reading diff...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_output_reads_as_empty() {
        assert_eq!(LogOutput::Unavailable("boom".to_string()).text(), "");
        assert_eq!(LogOutput::Text("1\t2\ta".to_string()).text(), "1\t2\ta");
    }

    #[test]
    fn merges_are_excluded_unless_requested() {
        let repo = GitRepo::at(PathBuf::from("."));
        assert!(repo.log_args().contains(&"--no-merges"));
        let repo = repo.with_merges(true);
        assert!(!repo.log_args().contains(&"--no-merges"));
    }

    #[test]
    fn missing_directory_is_unavailable() {
        let repo = GitRepo::at(PathBuf::from("/definitely/not/a/repo/here"));
        assert!(matches!(repo.log(), LogOutput::Unavailable(_)));
    }
}
