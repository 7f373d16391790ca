use crate::config::Config;
use crate::prompt::SavePrompt;
use crate::registry::OutputPathRegistry;
use crate::shell_flavor::command_prefix;
use crate::terminal::TerminalManager;
use crate::toolchain::{ToolchainProvider, resolve_interpreter};
use anyhow::Result;
use std::path::Path;

/// Keywords understood by the SmolBit toolchain.
#[derive(Clone, Copy)]
enum Subcommand {
    Run,
    DebugRun,
}

impl Subcommand {
    fn keyword(self) -> &'static str {
        match self {
            Subcommand::Run => "run",
            Subcommand::DebugRun => "debugrun",
        }
    }
}

/// Translates a user action into a sequence of terminal command lines.
///
/// Three actions are exposed: compile, compile-and-run and
/// compile-and-debug. Each resolves the interpreter and an output
/// destination for the active file, then submits the toolchain invocations
/// to a terminal. The dispatcher is stateless between actions except through
/// the [`OutputPathRegistry`].
///
/// The active file is an explicit parameter rather than ambient state; an
/// absent file makes every action a silent no-op.
pub struct Dispatcher {
    registry: OutputPathRegistry,
    provider: Option<Box<dyn ToolchainProvider>>,
    prompt: Box<dyn SavePrompt>,
    terminals: TerminalManager,
    shell_program: Option<String>,
    reuse_output_for_compile: bool,
}

impl Dispatcher {
    pub fn new(
        config: &Config,
        registry: OutputPathRegistry,
        provider: Option<Box<dyn ToolchainProvider>>,
        prompt: Box<dyn SavePrompt>,
        terminals: TerminalManager,
    ) -> Self {
        Self {
            registry,
            provider,
            prompt,
            terminals,
            shell_program: config.shell_program.clone(),
            reuse_output_for_compile: config.reuse_output_for_compile,
        }
    }

    /// Compile the active file, then run the produced output.
    pub fn compile_and_run(&mut self, active_file: Option<&Path>) -> Result<()> {
        self.dispatch(active_file, Some(Subcommand::Run))
    }

    /// Compile the active file, then run the produced output under the
    /// toolchain's debugger.
    pub fn compile_and_debug(&mut self, active_file: Option<&Path>) -> Result<()> {
        self.dispatch(active_file, Some(Subcommand::DebugRun))
    }

    /// Compile the active file only.
    ///
    /// Unlike the other two actions this one always asks for the destination
    /// again (and overwrites the remembered one), unless
    /// [`Config::reuse_output_for_compile`] says otherwise.
    pub fn compile(&mut self, active_file: Option<&Path>) -> Result<()> {
        self.dispatch(active_file, None)
    }

    /// Remembered destinations, keyed by source file.
    pub fn registry(&self) -> &OutputPathRegistry {
        &self.registry
    }

    fn dispatch(&mut self, active_file: Option<&Path>, follow_up: Option<Subcommand>) -> Result<()> {
        let Some(source) = active_file else {
            log::debug!("no active file, nothing to do");
            return Ok(());
        };

        let interpreter = resolve_interpreter(self.provider.as_deref_mut());

        let reuse_remembered = follow_up.is_some() || self.reuse_output_for_compile;
        let remembered = self.registry.lookup(source).filter(|_| reuse_remembered);
        let output = match remembered {
            Some(output) => output,
            None => {
                let Some(chosen) = self.prompt.choose_output_path(source)? else {
                    log::debug!("destination prompt declined, aborting");
                    return Ok(());
                };
                self.registry.remember(source, &chosen)?;
                chosen
            }
        };

        let shell_program = self.shell_program.clone();
        let terminal = self.terminals.acquire();
        let prefix = command_prefix(terminal.name(), shell_program.as_deref());

        terminal.show();
        terminal.send_text(&format!(
            "{prefix}\"{interpreter}\" -m SmolBit compile \"{}\" \"{}\"",
            source.display(),
            output.display(),
        ))?;
        if let Some(step) = follow_up {
            terminal.send_text(&format!(
                "{prefix}\"{interpreter}\" -m SmolBit {} \"{}\"",
                step.keyword(),
                output.display(),
            ))?;
        }
        Ok(())
    }
}
