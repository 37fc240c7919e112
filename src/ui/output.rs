use colored::*;
use std::borrow::Cow;
use std::io::{self, Write};

/// Verbose-only diagnostic line on stderr, tagged with the component name.
pub fn debug(verbose: bool, tag: &str, message: impl AsRef<str>) {
    if verbose {
        eprintln!("{}", format!("[{}] {}", tag, message.as_ref()).dimmed());
    }
}

pub fn display_notice(message: &str) {
    println!("{}", message.cyan());
}

pub fn display_success(message: &str) {
    println!("{}", message.green());
}

pub fn display_warning(message: &str) {
    println!("{}", message.yellow());
}

/// Print a text fragment without a trailing newline and flush it immediately.
pub fn display_fragment(fragment: &str) {
    print!("{}", fragment);
    let _ = io::stdout().flush();
}

pub fn display_text(text: &str) {
    print!("{}", terminate_line(text));
}

/// Agent text unchanged, with a newline appended only when it lacks one.
pub fn terminate_line(text: &str) -> Cow<'_, str> {
    if text.ends_with('\n') {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(format!("{}\n", text))
    }
}

pub fn display_image_placeholder(file_id: &str) {
    println!("{}", format!("[image generated: {}]", file_id).magenta());
}

/// Print a session-ending error: a short headline, then the full cause chain.
pub fn display_error(headline: &str, error: &dyn std::error::Error) {
    eprintln!("{} {}", "Error:".red().bold(), headline.red());
    eprintln!("{}", format!("  {}", error).dimmed());
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("{}", format!("  caused by: {}", cause).dimmed());
        source = cause.source();
    }
}

/// Human-readable byte count: `512 B`, `1.5 KB`, `2.0 MB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
