// Console output helpers
// Status lines go to stdout, warnings and errors to stderr

use colored::Colorize;

/// Plain informational line.
pub fn info(msg: impl AsRef<str>) {
    println!("{}", msg.as_ref());
}

/// Highlighted status line with a green tag, e.g. `synced 4 files`.
pub fn status(tag: &str, msg: impl AsRef<str>) {
    println!("{} {}", tag.green().bold(), msg.as_ref());
}

/// Diagnostic line, emitted only when the run is verbose.
pub fn detail(verbose: bool, msg: impl AsRef<str>) {
    if verbose {
        println!("  {}", msg.as_ref().dimmed());
    }
}

/// Non-fatal problem. The run continues.
pub fn warn(msg: impl AsRef<str>) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg.as_ref());
}

/// Error-level message. Does not itself terminate anything.
pub fn error(msg: impl AsRef<str>) {
    eprintln!("{} {}", "error:".red().bold(), msg.as_ref());
}
