use anyhow::Result;
use argh::FromArgs;
use smolbit_runner::prompt::ReadlinePrompt;
use smolbit_runner::registry::{JsonFileStore, OutputPathRegistry};
use smolbit_runner::terminal::{ShellTerminalFactory, TerminalManager};
use smolbit_runner::toolchain::PathToolchain;
use smolbit_runner::{Config, Dispatcher};
use std::path::PathBuf;

#[derive(FromArgs)]
/// Compile, run and debug SmolBit programs from the terminal.
struct Args {
    #[argh(subcommand)]
    action: Action,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Action {
    Run(RunArgs),
    Debug(DebugArgs),
    Compile(CompileArgs),
}

#[derive(FromArgs)]
#[argh(subcommand, name = "run")]
/// compile a source file, then run the produced output
struct RunArgs {
    #[argh(positional)]
    /// source file to compile; when omitted, nothing happens.
    file: Option<PathBuf>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "debug")]
/// compile a source file, then run the produced output under the debugger
struct DebugArgs {
    #[argh(positional)]
    /// source file to compile; when omitted, nothing happens.
    file: Option<PathBuf>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "compile")]
/// compile a source file, asking for the destination again
struct CompileArgs {
    #[argh(positional)]
    /// source file to compile; when omitted, nothing happens.
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args: Args = argh::from_env();
    let config = Config::from_env();

    let registry = match &config.state_file {
        Some(path) => OutputPathRegistry::new(Box::new(JsonFileStore::open(path)?)),
        None => OutputPathRegistry::in_memory(),
    };
    let factory = ShellTerminalFactory::new(config.shell_program.clone());
    let terminals = TerminalManager::new(&config.terminal_name, Box::new(factory));
    let mut dispatcher = Dispatcher::new(
        &config,
        registry,
        Some(Box::new(PathToolchain::new())),
        Box::new(ReadlinePrompt),
        terminals,
    );

    match args.action {
        Action::Run(a) => dispatcher.compile_and_run(a.file.as_deref()),
        Action::Debug(a) => dispatcher.compile_and_debug(a.file.as_deref()),
        Action::Compile(a) => dispatcher.compile(a.file.as_deref()),
    }
}
