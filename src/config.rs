use std::env as stdenv;
use std::path::PathBuf;

/// Name given to a terminal created by the runner when none is active.
pub const DEFAULT_TERMINAL_NAME: &str = "Smolbit Compiler";

/// Runtime configuration for the task runner.
///
/// Note: fields are public for simplicity; the binary fills them from the
/// process environment and tests construct them directly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shell program used for new terminals and for flavor detection.
    pub shell_program: Option<String>,
    /// Name for terminals created by the runner.
    pub terminal_name: String,
    /// Where remembered output paths are stored. `None` keeps them in memory
    /// for the lifetime of the process only.
    pub state_file: Option<PathBuf>,
    /// When set, the compile-only action reuses a remembered output path
    /// instead of always asking again.
    pub reuse_output_for_compile: bool,
}

impl Config {
    /// Capture configuration from the process environment.
    ///
    /// The shell program comes from `SHELL` (`COMSPEC` on Windows). The state
    /// file defaults to `.smolbit-state.json` in the working directory, which
    /// scopes remembered output paths to the workspace the runner is invoked
    /// from; `SMOLBIT_STATE_FILE` overrides it.
    pub fn from_env() -> Self {
        let shell_var = if cfg!(windows) { "COMSPEC" } else { "SHELL" };
        let state_file = stdenv::var_os("SMOLBIT_STATE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".smolbit-state.json"));
        Self {
            shell_program: stdenv::var(shell_var).ok(),
            terminal_name: DEFAULT_TERMINAL_NAME.to_string(),
            state_file: Some(state_file),
            reuse_output_for_compile: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shell_program: None,
            terminal_name: DEFAULT_TERMINAL_NAME.to_string(),
            state_file: None,
            reuse_output_for_compile: false,
        }
    }
}
