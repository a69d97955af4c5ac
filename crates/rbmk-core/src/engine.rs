//! Transport engine drivers.
//!
//! The workspace never interprets transport results. An engine receives a
//! directory holding the exported input files, runs to completion with its
//! output streamed to the console, and reports only success or failure.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::export::ExportedFiles;

/// Errors from invoking an external engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Engine executable '{0}' not found")]
    NotFound(PathBuf),

    #[error("Missing engine input file {0}")]
    MissingInput(PathBuf),

    #[error("Engine '{name}' exited with {}", describe_exit(.code))]
    Failed { name: String, code: Option<i32> },

    #[error("Failed to launch engine: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "no status (terminated by signal)".into(),
    }
}

/// An external solver that consumes a directory of input files.
pub trait TransportEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Run the engine on the inputs in `dir`, blocking until it exits.
    fn run(&self, dir: &Path) -> Result<(), EngineError>;
}

/// The `openmc` executable.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenMcExecutable {
    pub executable: PathBuf,
    /// OpenMP thread count forwarded as `-s`.
    pub threads: Option<usize>,
    /// Run with `-g` so the engine checks for overlapping cells.
    pub geometry_debug: bool,
    /// Overrides `OPENMC_CROSS_SECTIONS` for the child process.
    pub cross_sections: Option<PathBuf>,
    pub extra_args: Vec<String>,
}

impl Default for OpenMcExecutable {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("openmc"),
            threads: None,
            geometry_debug: false,
            cross_sections: None,
            extra_args: Vec::new(),
        }
    }
}

impl OpenMcExecutable {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            ..Default::default()
        }
    }

    /// Arguments passed before any extra arguments.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(n) = self.threads {
            args.push("-s".to_string());
            args.push(n.to_string());
        }
        if self.geometry_debug {
            args.push("-g".to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// The command that runs the engine inside `dir`.
    pub fn command(&self, dir: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(self.args()).current_dir(dir);
        if let Some(xs) = &self.cross_sections {
            cmd.env("OPENMC_CROSS_SECTIONS", xs);
        }
        cmd
    }
}

impl TransportEngine for OpenMcExecutable {
    fn name(&self) -> &str {
        "openmc"
    }

    fn run(&self, dir: &Path) -> Result<(), EngineError> {
        for path in ExportedFiles::in_dir(dir).all() {
            if !path.is_file() {
                return Err(EngineError::MissingInput(path.to_path_buf()));
            }
        }

        log::info!(
            "Running {} {:?} in {}",
            self.executable.display(),
            self.args(),
            dir.display()
        );
        let status = match self.command(dir).status() {
            Ok(status) => status,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EngineError::NotFound(self.executable.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        if status.success() {
            log::info!("{} finished", self.name());
            Ok(())
        } else {
            Err(EngineError::Failed {
                name: self.name().to_string(),
                code: status.code(),
            })
        }
    }
}
