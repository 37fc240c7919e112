use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum AgentError {
    Api {
        status: u16,
        message: String,
    },
    Config(String),
    Credential(String),
    Timeout {
        operation: String,
        waited: Duration,
    },
    Network(reqwest::Error),
    Io(std::io::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    Other(String),
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Api { status, message } => {
                write!(f, "Service error (status {}): {}", status, message)
            }
            AgentError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AgentError::Credential(msg) => write!(f, "Credential error: {}", msg),
            AgentError::Timeout { operation, waited } => {
                write!(f, "{} timed out after {}s", operation, waited.as_secs())
            }
            AgentError::Network(e) => write!(f, "Network error: {}", e),
            AgentError::Io(e) => write!(f, "IO error: {}", e),
            AgentError::Json(e) => write!(f, "JSON error: {}", e),
            AgentError::Yaml(e) => write!(f, "YAML error: {}", e),
            AgentError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgentError::Network(e) => Some(e),
            AgentError::Io(e) => Some(e),
            AgentError::Json(e) => Some(e),
            AgentError::Yaml(e) => Some(e),
            _ => None,
        }
    }
}

impl AgentError {
    /// Short label used as the headline when a session ends on this error.
    pub fn summary(&self) -> &'static str {
        match self {
            AgentError::Api { .. } => "The agent service rejected a request",
            AgentError::Config(_) => "Invalid configuration",
            AgentError::Credential(_) => "Could not acquire a credential",
            AgentError::Timeout { .. } => "Operation timed out",
            AgentError::Network(_) => "Could not reach the agent service",
            AgentError::Io(_) => "File system error",
            AgentError::Json(_) | AgentError::Yaml(_) => "Malformed data",
            AgentError::Other(_) => "Unexpected failure",
        }
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        AgentError::Network(err)
    }
}

impl From<std::io::Error> for AgentError {
    fn from(err: std::io::Error) -> Self {
        AgentError::Io(err)
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::Json(err)
    }
}

impl From<serde_yaml::Error> for AgentError {
    fn from(err: serde_yaml::Error) -> Self {
        AgentError::Yaml(err)
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Config(format!("{:#}", err))
    }
}

impl From<String> for AgentError {
    fn from(msg: String) -> Self {
        AgentError::Other(msg)
    }
}

impl From<&str> for AgentError {
    fn from(msg: &str) -> Self {
        AgentError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
