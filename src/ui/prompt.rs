use crate::error::Result;
use colored::*;
use std::io::{self, BufRead, Write};

/// Source of operator input. `Ok(None)` means the input is closed.
pub trait LineReader: Send {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

pub struct StdinReader;

impl LineReader for StdinReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{} ", prompt.cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            println!();
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }
}

/// `y` or `yes`, ignoring case and surrounding whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
