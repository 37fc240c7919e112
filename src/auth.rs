use crate::error::{AgentError, Result};
use crate::ui::debug;
use async_trait::async_trait;
use std::fmt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

pub const TOKEN_ENV_VAR: &str = "AGENT_ACCESS_TOKEN";
pub const TOKEN_RESOURCE: &str = "https://ai.azure.com";
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// A bearer token plus the name of the source that produced it.
#[derive(Clone)]
pub struct Credential {
    token: String,
    source: String,
}

impl Credential {
    pub fn new(token: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            source: source.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

#[async_trait]
pub trait TokenSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self) -> std::result::Result<String, String>;
}

pub struct EnvTokenSource {
    var: String,
}

impl EnvTokenSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl TokenSource for EnvTokenSource {
    fn name(&self) -> &str {
        "environment"
    }

    async fn fetch(&self) -> std::result::Result<String, String> {
        std::env::var(&self.var).map_err(|_| format!("{} is not set", self.var))
    }
}

/// Runs a developer CLI that prints an access token on stdout.
pub struct CommandTokenSource {
    name: String,
    program: String,
    args: Vec<String>,
}

impl CommandTokenSource {
    pub fn new(name: &str, program: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn azure_cli() -> Self {
        Self::new(
            "azure-cli",
            "az",
            &[
                "account",
                "get-access-token",
                "--resource",
                TOKEN_RESOURCE,
                "--query",
                "accessToken",
                "--output",
                "tsv",
            ],
        )
    }

    pub fn azure_developer_cli() -> Self {
        Self::new(
            "azure-developer-cli",
            "azd",
            &[
                "auth",
                "token",
                "--scope",
                "https://ai.azure.com/.default",
                "--output",
                "json",
            ],
        )
    }
}

#[async_trait]
impl TokenSource for CommandTokenSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> std::result::Result<String, String> {
        let output = timeout(
            COMMAND_TIMEOUT,
            Command::new(&self.program).args(&self.args).output(),
        )
        .await
        .map_err(|_| {
            format!(
                "'{}' did not finish within {}s",
                self.program,
                COMMAND_TIMEOUT.as_secs()
            )
        })?
        .map_err(|e| format!("could not run '{}': {}", self.program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_token_output(&stdout))
    }
}

/// `azd` prints `{"token": ...}`; `az` with `--output tsv` prints the bare token.
pub fn parse_token_output(stdout: &str) -> String {
    let trimmed = stdout.trim();
    serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|v| v.get("token").and_then(|t| t.as_str()).map(str::to_string))
        .unwrap_or_else(|| trimmed.to_string())
}

pub struct CredentialChain {
    sources: Vec<Box<dyn TokenSource>>,
    verbose: bool,
}

impl CredentialChain {
    pub fn new(sources: Vec<Box<dyn TokenSource>>, verbose: bool) -> Self {
        Self { sources, verbose }
    }

    /// Environment variable, then the Azure CLI, then the Azure Developer CLI.
    pub fn default_chain(verbose: bool) -> Self {
        Self::new(
            vec![
                Box::new(EnvTokenSource::new(TOKEN_ENV_VAR)),
                Box::new(CommandTokenSource::azure_cli()),
                Box::new(CommandTokenSource::azure_developer_cli()),
            ],
            verbose,
        )
    }

    pub async fn acquire(&self) -> Result<Credential> {
        let mut failures = Vec::new();

        for source in &self.sources {
            match source.fetch().await {
                Ok(token) if !token.trim().is_empty() => {
                    debug(self.verbose, "auth", format!("Using credential from {}", source.name()));
                    return Ok(Credential::new(token.trim(), source.name()));
                }
                Ok(_) => failures.push(format!("{}: empty token", source.name())),
                Err(e) => {
                    debug(self.verbose, "auth", format!("{} unavailable: {}", source.name(), e));
                    failures.push(format!("{}: {}", source.name(), e));
                }
            }
        }

        Err(AgentError::Credential(if failures.is_empty() {
            "no credential sources configured".to_string()
        } else {
            failures.join("; ")
        }))
    }
}
