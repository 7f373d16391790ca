use anyhow::Result;
use std::borrow::Cow;
use std::env as stdenv;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Command name used when no interpreter can be discovered.
pub const DEFAULT_INTERPRETER: &str = "python";

/// Reply from the toolchain-discovery collaborator.
///
/// When present, the first element of `exec_command` is the interpreter
/// command; the rest are collaborator-specific and ignored here.
#[derive(Debug, Clone, Default)]
pub struct ExecutionDetails {
    pub exec_command: Option<Vec<String>>,
}

/// Collaborator responsible for locating an interpreter executable.
///
/// Discovery may be expensive, so providers start out inactive and are
/// activated on first use. `activate` blocks until discovery finishes; it is
/// the one wait a dispatch performs besides the destination prompt.
pub trait ToolchainProvider {
    fn is_active(&self) -> bool;

    /// Perform discovery. Called once per resolution when inactive.
    fn activate(&mut self) -> Result<()>;

    fn execution_details(&self) -> ExecutionDetails;
}

/// Resolve the interpreter command, activating the provider if needed.
///
/// Every failure falls back to [`DEFAULT_INTERPRETER`] without surfacing an
/// error: a missing provider, a failed activation, and an absent or empty
/// `exec_command` all resolve to the default command name.
pub fn resolve_interpreter(provider: Option<&mut (dyn ToolchainProvider + 'static)>) -> String {
    let Some(provider) = provider else {
        return DEFAULT_INTERPRETER.to_string();
    };
    if !provider.is_active() {
        if let Err(e) = provider.activate() {
            log::debug!("toolchain activation failed, using default: {e:#}");
            return DEFAULT_INTERPRETER.to_string();
        }
    }
    match provider.execution_details().exec_command {
        Some(cmd) if !cmd.is_empty() => cmd[0].clone(),
        _ => DEFAULT_INTERPRETER.to_string(),
    }
}

/// Provider that discovers a Python interpreter from the process environment.
///
/// `SMOLBIT_PYTHON` takes precedence when set (an absolute path or a command
/// name to search for); otherwise `python3` then `python` are looked up on
/// `PATH`.
#[derive(Default)]
pub struct PathToolchain {
    resolved: Option<PathBuf>,
}

impl PathToolchain {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ToolchainProvider for PathToolchain {
    fn is_active(&self) -> bool {
        self.resolved.is_some()
    }

    fn activate(&mut self) -> Result<()> {
        let search_paths = stdenv::var_os("PATH").unwrap_or_default();
        let override_name = stdenv::var("SMOLBIT_PYTHON").ok();
        let candidates: Vec<&str> = match override_name.as_deref() {
            Some(name) => vec![name],
            None => vec!["python3", "python"],
        };
        for candidate in candidates {
            if let Some(found) = find_interpreter_path(&search_paths, Path::new(candidate)) {
                log::debug!("discovered interpreter {}", found.display());
                self.resolved = Some(found.into_owned());
                return Ok(());
            }
        }
        anyhow::bail!("no python interpreter found on PATH")
    }

    fn execution_details(&self) -> ExecutionDetails {
        ExecutionDetails {
            exec_command: self
                .resolved
                .as_ref()
                .map(|p| vec![p.to_string_lossy().into_owned()]),
        }
    }
}

/// Resolve an interpreter path the way a shell would resolve a command.
///
/// Behavior:
/// - Absolute path: returned if it exists.
/// - Single path component (no separators): search each directory in
///   `search_paths` (PATH) and return the first existing match.
/// - Anything else (relative with separators): returned if it exists
///   relative to the working directory.
/// - Empty path: `None`.
pub fn find_interpreter_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return existing(path).map(Cow::Borrowed);
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        (None, None) => None,
        (Some(name), None) => find_in_path(search_paths, name.as_os_str()).map(Cow::Owned),
        _ => existing(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    for dir in stdenv::split_paths(search_paths) {
        let candidate = dir.join(cmd);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

fn existing(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
