use anyhow::{Context, Result};
use std::cell::RefCell;
use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::rc::Rc;

/// Write-only handle to a terminal session.
///
/// The runner only ever submits text; it never reads the terminal's output
/// or the exit status of anything running in it.
pub trait Terminal {
    /// Display name, used for shell-flavor detection.
    fn name(&self) -> &str;

    /// Bring the terminal into view.
    fn show(&mut self);

    /// Submit one line for execution by the underlying shell.
    fn send_text(&mut self, line: &str) -> Result<()>;
}

/// Creates terminals on demand.
pub trait TerminalFactory {
    fn create(&self, name: &str) -> Box<dyn Terminal>;
}

/// Terminal backed by a real shell process.
///
/// The shell is spawned lazily on the first submitted line, with its stdin
/// piped; each line is written newline-terminated and left for the shell to
/// execute.
pub struct ShellTerminal {
    name: String,
    shell_program: String,
    child: Option<Child>,
}

impl ShellTerminal {
    pub fn new(name: impl Into<String>, shell_program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shell_program: shell_program.into(),
            child: None,
        }
    }
}

impl Terminal for ShellTerminal {
    fn name(&self) -> &str {
        &self.name
    }

    fn show(&mut self) {
        log::debug!("terminal {:?} in view", self.name);
    }

    fn send_text(&mut self, line: &str) -> Result<()> {
        if self.child.is_none() {
            log::debug!("starting shell {:?}", self.shell_program);
            let child = Command::new(&self.shell_program)
                .stdin(Stdio::piped())
                .spawn()
                .with_context(|| format!("can't start shell {}", self.shell_program))?;
            self.child = Some(child);
        }
        let Some(child) = self.child.as_mut() else {
            anyhow::bail!("terminal shell is not running");
        };
        let stdin = child
            .stdin
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("shell stdin is closed"))?;
        writeln!(stdin, "{line}")
            .and_then(|_| stdin.flush())
            .with_context(|| format!("can't submit command line to {}", self.name))
    }
}

impl Drop for ShellTerminal {
    fn drop(&mut self) {
        // Close stdin and reap the shell so submitted lines finish running.
        if let Some(mut child) = self.child.take() {
            drop(child.stdin.take());
            let _ = child.wait();
        }
    }
}

/// Factory for [`ShellTerminal`]s using the configured shell program.
pub struct ShellTerminalFactory {
    shell_program: String,
}

impl ShellTerminalFactory {
    /// Falls back to the platform's stock shell when none is configured.
    pub fn new(shell_program: Option<String>) -> Self {
        let fallback = if cfg!(windows) { "cmd.exe" } else { "/bin/sh" };
        Self {
            shell_program: shell_program.unwrap_or_else(|| fallback.to_string()),
        }
    }
}

impl TerminalFactory for ShellTerminalFactory {
    fn create(&self, name: &str) -> Box<dyn Terminal> {
        Box::new(ShellTerminal::new(name, &self.shell_program))
    }
}

/// What a [`MemTerminal`] saw: whether it was shown and every submitted line.
#[derive(Default)]
pub struct TerminalLog {
    pub shown: bool,
    pub lines: Vec<String>,
}

/// Memory-backed terminal for tests; records instead of executing.
pub struct MemTerminal {
    name: String,
    log: Rc<RefCell<TerminalLog>>,
}

impl MemTerminal {
    /// Create a terminal and return (terminal, log_handle) so the caller can
    /// inspect what was submitted after the terminal has been handed off.
    pub fn with_handle(name: impl Into<String>) -> (Self, Rc<RefCell<TerminalLog>>) {
        let log = Rc::new(RefCell::new(TerminalLog::default()));
        let terminal = Self {
            name: name.into(),
            log: log.clone(),
        };
        (terminal, log)
    }
}

impl Terminal for MemTerminal {
    fn name(&self) -> &str {
        &self.name
    }

    fn show(&mut self) {
        self.log.borrow_mut().shown = true;
    }

    fn send_text(&mut self, line: &str) -> Result<()> {
        self.log.borrow_mut().lines.push(line.to_string());
        Ok(())
    }
}

/// Terminal acquisition policy: reuse the active terminal when one exists,
/// otherwise create a new named terminal and make it the active one.
pub struct TerminalManager {
    name: String,
    factory: Box<dyn TerminalFactory>,
    active: Option<Box<dyn Terminal>>,
}

impl TerminalManager {
    pub fn new(name: impl Into<String>, factory: Box<dyn TerminalFactory>) -> Self {
        Self {
            name: name.into(),
            factory,
            active: None,
        }
    }

    /// Make an already-running terminal the active one.
    pub fn adopt(&mut self, terminal: Box<dyn Terminal>) {
        self.active = Some(terminal);
    }

    pub fn acquire(&mut self) -> &mut dyn Terminal {
        self.active
            .get_or_insert_with(|| self.factory.create(&self.name))
            .as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingFactory {
        created: Rc<RefCell<Vec<String>>>,
    }

    impl TerminalFactory for CountingFactory {
        fn create(&self, name: &str) -> Box<dyn Terminal> {
            self.created.borrow_mut().push(name.to_string());
            let (terminal, _log) = MemTerminal::with_handle(name);
            Box::new(terminal)
        }
    }

    #[test]
    fn acquire_creates_a_named_terminal_once() {
        let created = Rc::new(RefCell::new(Vec::new()));
        let mut manager = TerminalManager::new(
            "Smolbit Compiler",
            Box::new(CountingFactory {
                created: created.clone(),
            }),
        );

        assert_eq!(manager.acquire().name(), "Smolbit Compiler");
        manager.acquire();

        assert_eq!(*created.borrow(), vec!["Smolbit Compiler".to_string()]);
    }

    #[test]
    fn adopted_terminal_is_reused() {
        let created = Rc::new(RefCell::new(Vec::new()));
        let mut manager = TerminalManager::new(
            "Smolbit Compiler",
            Box::new(CountingFactory {
                created: created.clone(),
            }),
        );

        let (terminal, log) = MemTerminal::with_handle("existing");
        manager.adopt(Box::new(terminal));

        manager.acquire().send_text("echo hi").unwrap();

        assert!(created.borrow().is_empty());
        assert_eq!(log.borrow().lines, vec!["echo hi".to_string()]);
    }

    #[test]
    fn mem_terminal_records_show_and_lines() {
        let (mut terminal, log) = MemTerminal::with_handle("t");
        terminal.show();
        terminal.send_text("one").unwrap();
        terminal.send_text("two").unwrap();

        let log = log.borrow();
        assert!(log.shown);
        assert_eq!(log.lines, vec!["one".to_string(), "two".to_string()]);
    }
}
