//! A tiny task runner for the SmolBit toolchain.
//!
//! This crate resolves a Python interpreter, remembers a compiled-output
//! destination per source file, and submits `compile` / `run` / `debugrun`
//! command lines to a terminal running the user's shell. It never inspects
//! what the toolchain does with those lines; compile errors and exit codes
//! stay between the user and the terminal.
//!
//! The main entry point is [`Dispatcher`], which exposes the three user
//! actions and takes its collaborators (interpreter discovery, destination
//! prompt, terminal) as pluggable trait objects. The public modules
//! [`toolchain`], [`prompt`], [`terminal`] and [`registry`] expose the
//! traits for implementing your own.

pub mod config;
mod dispatcher;
pub mod prompt;
pub mod registry;
pub mod shell_flavor;
pub mod terminal;
pub mod toolchain;

/// Just a convenient re-export of the command dispatcher and its config.
///
/// See [`Dispatcher`] for the three actions and their behavior.
pub use config::Config;
pub use dispatcher::Dispatcher;
