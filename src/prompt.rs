use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::{Path, PathBuf};

/// Blocking, cancelable picker for the compiled-output destination.
///
/// `Ok(None)` means the user declined; the calling action must then abort
/// without side effects.
pub trait SavePrompt {
    fn choose_output_path(&mut self, source: &Path) -> Result<Option<PathBuf>>;
}

/// Interactive prompt reading one line from the terminal.
///
/// The source path with a `.sbc` extension is offered as an editable
/// starting point. Ctrl-C, Ctrl-D and an empty answer all cancel.
pub struct ReadlinePrompt;

impl SavePrompt for ReadlinePrompt {
    fn choose_output_path(&mut self, source: &Path) -> Result<Option<PathBuf>> {
        let mut rl = DefaultEditor::new()?;
        println!("Choose the location to compile to");
        let suggested = source.with_extension("sbc").to_string_lossy().into_owned();
        let readline = rl.readline_with_initial("Compile to: ", (suggested.as_str(), ""));
        match readline {
            Ok(line) => {
                let answer = line.trim();
                if answer.is_empty() {
                    return Ok(None);
                }
                Ok(Some(PathBuf::from(answer)))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
