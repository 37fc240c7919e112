use crate::api::AgentService;
use crate::error::Result;
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};

pub const ARTIFACT_PREFIX: &str = "agent_output_";
pub const ARTIFACT_EXTENSION: &str = "png";
const ID_SUFFIX_CHARS: usize = 8;

/// `agent_output_<YYYYMMDD>_<HHmmss>_<last 8 chars of id>.png`
pub fn artifact_file_name(timestamp: &NaiveDateTime, file_id: &str) -> String {
    let char_count = file_id.chars().count();
    let suffix: String = file_id
        .chars()
        .skip(char_count.saturating_sub(ID_SUFFIX_CHARS))
        .collect();
    format!(
        "{}{}_{}.{}",
        ARTIFACT_PREFIX,
        timestamp.format("%Y%m%d_%H%M%S"),
        suffix,
        ARTIFACT_EXTENSION
    )
}

#[derive(Debug)]
pub struct DownloadOutcome {
    pub file_id: String,
    pub result: Result<PathBuf>,
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fetch one artifact and write it into `dir`.
pub async fn download_artifact(
    service: &dyn AgentService,
    file_id: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let bytes = service.file_content(file_id).await?;
    let path = dir.join(artifact_file_name(&Local::now().naive_local(), file_id));
    tokio::fs::write(&path, &bytes).await?;
    Ok(path)
}

/// Download each id in order. A failure is recorded for that id only.
pub async fn download_artifacts(
    service: &dyn AgentService,
    file_ids: &[String],
    dir: &Path,
) -> Vec<DownloadOutcome> {
    let mut outcomes = Vec::with_capacity(file_ids.len());
    for file_id in file_ids {
        let result = download_artifact(service, file_id, dir).await;
        outcomes.push(DownloadOutcome {
            file_id: file_id.clone(),
            result,
        });
    }
    outcomes
}
