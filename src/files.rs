use crate::api::AgentService;
use crate::error::{AgentError, Result};
use crate::progress::{with_progress, ProgressSink};
use crate::ui::{display_notice, display_warning, format_bytes, LineReader};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct SpreadsheetFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

/// The session's single upload slot, once filled.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub path: PathBuf,
    pub file_id: String,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based position in the listing.
    Index(usize),
    Skip,
    Invalid,
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Regular files in `dir` whose extension matches, in directory order.
pub fn list_spreadsheets(dir: &Path, extensions: &[String]) -> Result<Vec<SpreadsheetFile>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;
        if !metadata.is_file() || !has_extension(&path, extensions) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        files.push(SpreadsheetFile {
            path,
            name,
            size: metadata.len(),
        });
    }

    Ok(files)
}

/// Interpret the operator's answer to the numbered file prompt.
pub fn parse_selection(input: &str, count: usize, required: bool) -> Selection {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return if required {
            Selection::Invalid
        } else {
            Selection::Skip
        };
    }

    match trimmed.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Selection::Index(n - 1),
        _ => Selection::Invalid,
    }
}

/// Show the numbered listing and ask until the answer is usable.
///
/// Returns `None` when the operator skips, or when there is nothing to pick
/// and a file is optional. Closed input counts as a skip unless a file is
/// required.
pub fn select_spreadsheet<'a>(
    reader: &mut dyn LineReader,
    files: &'a [SpreadsheetFile],
    required: bool,
) -> Result<Option<&'a SpreadsheetFile>> {
    if files.is_empty() {
        if required {
            return Err(AgentError::Config(
                "no spreadsheet files found in the working directory".to_string(),
            ));
        }
        display_notice("No spreadsheet files found; continuing without an attachment.");
        return Ok(None);
    }

    println!("{}", "Spreadsheets in the working directory:".bold());
    for (index, file) in files.iter().enumerate() {
        println!(
            "  {} {} {}",
            format!("{}.", index + 1).cyan(),
            file.name,
            format!("({})", format_bytes(file.size)).dimmed()
        );
    }

    let prompt = if required {
        format!("Select a file [1-{}]:", files.len())
    } else {
        format!("Select a file [1-{}] or press Enter to skip:", files.len())
    };

    loop {
        let answer = match reader.read_line(&prompt)? {
            Some(answer) => answer,
            None if required => {
                return Err(AgentError::Other(
                    "input closed before a file was selected".to_string(),
                ))
            }
            None => return Ok(None),
        };

        match parse_selection(&answer, files.len(), required) {
            Selection::Index(i) => return Ok(Some(&files[i])),
            Selection::Skip => return Ok(None),
            Selection::Invalid => display_warning(&format!(
                "Please enter a number between 1 and {}.",
                files.len()
            )),
        }
    }
}

/// Upload `file`, ticking `sink` at `every` until the service answers.
pub async fn upload_spreadsheet<S>(
    service: &dyn AgentService,
    file: &SpreadsheetFile,
    every: Duration,
    sink: &mut S,
) -> Result<UploadedFile>
where
    S: ProgressSink + ?Sized,
{
    let uploaded = with_progress(service.upload_file(&file.path), every, sink).await?;
    Ok(UploadedFile {
        path: file.path.clone(),
        file_id: uploaded.id,
        size: file.size,
    })
}
