use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

fn powershell_family() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        RegexBuilder::new("pwsh|powershell")
            .case_insensitive(true)
            .build()
            .expect("pattern is a literal alternation")
    })
}

/// Best-effort check for a PowerShell-family shell.
///
/// Matches on a substring of the terminal name or shell program path. This
/// is a heuristic, not a contract; it lives here so it can be replaced
/// without touching the dispatcher.
pub fn is_powershell_family(name_or_program: &str) -> bool {
    powershell_family().is_match(name_or_program)
}

/// Prefix prepended to every submitted command line.
///
/// PowerShell needs the invocation operator (`& `) to run a quoted
/// executable path; other shells take the line as-is. The terminal's name is
/// judged first, falling back to the configured shell program when the name
/// is empty.
pub fn command_prefix(terminal_name: &str, shell_program: Option<&str>) -> &'static str {
    let subject = if terminal_name.is_empty() {
        shell_program.unwrap_or("")
    } else {
        terminal_name
    };
    if is_powershell_family(subject) { "& " } else { "" }
}
