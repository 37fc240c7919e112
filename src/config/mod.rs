mod defaults;
mod validation;

use crate::cli::Args;
use crate::error::{AgentError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub use defaults::{DEFAULT_API_VERSION, DEFAULT_INSTRUCTIONS, DEFAULT_MODEL};
pub use validation::{expand_env_references, normalize_endpoint, parse_flag, require_setting};

use defaults::{
    default_file_extensions, default_max_wait_secs, default_poll_interval_ms,
    default_progress_interval_ms, default_stream_timeout,
};

pub const CONFIG_FILE_NAME: &str = ".sheet-agent.yaml";

/// How a turn waits for its run to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionMode {
    #[default]
    Poll,
    Stream,
}

impl FromStr for CompletionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "poll" | "polling" => Ok(CompletionMode::Poll),
            "stream" | "streaming" => Ok(CompletionMode::Stream),
            other => Err(format!("unknown completion mode '{}' (use poll or stream)", other)),
        }
    }
}

/// Settings as written in the settings file. Everything is optional here;
/// required keys are enforced when resolving into [`Config`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_wait_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_file: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extensions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub agent_name: String,
    pub api_version: String,
    pub model: String,
    pub instructions: String,
    pub completion: CompletionMode,
    pub poll_interval: Duration,
    pub max_wait: Duration,
    pub progress_interval: Duration,
    pub stream_timeout: Duration,
    pub require_file: bool,
    pub file_extensions: Vec<String>,
    pub work_dir: PathBuf,
    pub verbose: bool,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load(args.config.as_deref())?;
        let work_dir = env::current_dir()?;
        Self::resolve(file_config, args, &|key| env::var(key).ok(), work_dir)
    }

    /// Merge settings with precedence CLI > environment > file > default.
    ///
    /// Fails when `endpoint` or `agent_name` is missing. Nothing here touches
    /// the network or the credential chain.
    pub fn resolve(
        file: FileConfig,
        args: &Args,
        env: &dyn Fn(&str) -> Option<String>,
        work_dir: PathBuf,
    ) -> Result<Self> {
        let expand = |value: String| expand_env_references(&value, env);

        let endpoint = args
            .endpoint
            .clone()
            .or_else(|| env("AGENT_ENDPOINT"))
            .or(file.endpoint)
            .map(expand);
        let endpoint = require_setting(endpoint, "endpoint", "AGENT_ENDPOINT")
            .and_then(|e| normalize_endpoint(&e))
            .map_err(AgentError::Config)?;

        let agent_name = args
            .agent_name
            .clone()
            .or_else(|| env("AGENT_NAME"))
            .or(file.agent_name)
            .map(expand);
        let agent_name =
            require_setting(agent_name, "agent_name", "AGENT_NAME").map_err(AgentError::Config)?;

        let api_version = env("AGENT_API_VERSION")
            .or(file.api_version)
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let model = env("AGENT_MODEL")
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let instructions = file
            .instructions
            .unwrap_or_else(|| DEFAULT_INSTRUCTIONS.to_string());

        let completion = if args.stream {
            CompletionMode::Stream
        } else if args.poll {
            CompletionMode::Poll
        } else {
            match env("AGENT_COMPLETION") {
                Some(v) => v.parse().map_err(AgentError::Config)?,
                None => file.completion.unwrap_or_default(),
            }
        };

        let verbose = args.verbose
            || env("AGENT_VERBOSE")
                .and_then(|v| parse_flag(&v))
                .or(file.verbose)
                .unwrap_or(false);

        let poll_interval_ms = file.poll_interval_ms.unwrap_or_else(default_poll_interval_ms);
        let progress_interval_ms = file
            .progress_interval_ms
            .unwrap_or_else(default_progress_interval_ms);
        if poll_interval_ms == 0 || progress_interval_ms == 0 {
            return Err(AgentError::Config(
                "poll_interval_ms and progress_interval_ms must be greater than zero".to_string(),
            ));
        }

        let max_wait_secs = file.max_wait_secs.unwrap_or_else(default_max_wait_secs);
        let stream_timeout = file.stream_timeout.unwrap_or_else(default_stream_timeout);
        if max_wait_secs == 0 || stream_timeout == 0 {
            return Err(AgentError::Config(
                "max_wait_secs and stream_timeout must be greater than zero".to_string(),
            ));
        }

        let file_extensions: Vec<String> = file
            .file_extensions
            .unwrap_or_else(default_file_extensions)
            .into_iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        if file_extensions.is_empty() {
            return Err(AgentError::Config(
                "file_extensions must list at least one extension".to_string(),
            ));
        }

        Ok(Config {
            endpoint,
            agent_name,
            api_version,
            model,
            instructions,
            completion,
            poll_interval: Duration::from_millis(poll_interval_ms),
            max_wait: Duration::from_secs(max_wait_secs),
            progress_interval: Duration::from_millis(progress_interval_ms),
            stream_timeout: Duration::from_secs(stream_timeout),
            require_file: args.require_file || file.require_file.unwrap_or(false),
            file_extensions,
            work_dir,
            verbose,
        })
    }
}

impl FileConfig {
    /// Load the first settings file found. An explicit path must exist.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("settings file not found: {}", path.display());
            }
            return Self::read(path);
        }

        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::read(&path);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML settings file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON settings file: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".sheet-agent.yaml"),
            PathBuf::from(".sheet-agent.yml"),
            PathBuf::from(".sheet-agent.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("sheet-agent");
            paths.push(config_dir.join("config.yaml"));
            paths.push(config_dir.join("config.yml"));
            paths.push(config_dir.join("config.json"));
        }

        paths
    }

    pub fn example() -> Self {
        FileConfig {
            endpoint: Some(
                "https://<resource>.services.ai.azure.com/api/projects/<project>".to_string(),
            ),
            agent_name: Some("sheet-analyst".to_string()),
            model: Some(DEFAULT_MODEL.to_string()),
            completion: Some(CompletionMode::Poll),
            poll_interval_ms: Some(default_poll_interval_ms()),
            max_wait_secs: Some(default_max_wait_secs()),
            file_extensions: Some(default_file_extensions()),
            ..FileConfig::default()
        }
    }

    /// Write the example settings into `dir`, refusing to overwrite an existing file.
    pub fn write_example(dir: &Path) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Err(AgentError::Config(format!(
                "{} already exists, not overwriting",
                path.display()
            )));
        }
        let contents = serde_yaml::to_string(&Self::example())?;
        fs::write(&path, contents)?;
        Ok(path)
    }
}
