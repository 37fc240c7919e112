pub mod client;
pub mod models;
pub mod response;
pub mod streaming;

pub use client::{collect_pages, HttpAgentService};
pub use models::{
    Agent, AgentDefinition, ContentItem, FileObject, MessageRole, Run, RunError, RunStatus,
    StreamEvent, Thread, ThreadMessage, ToolDefinition,
};
pub use streaming::RunEventStream;

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

/// The agent service as seen by this client.
///
/// Every call round-trips to the service; nothing is cached.
#[async_trait]
pub trait AgentService: Send + Sync {
    /// All agents owned by the caller, in the order the service lists them.
    async fn list_agents(&self) -> Result<Vec<Agent>>;

    async fn create_agent(&self, definition: &AgentDefinition) -> Result<Agent>;

    async fn upload_file(&self, path: &Path) -> Result<FileObject>;

    async fn file_content(&self, file_id: &str) -> Result<Bytes>;

    /// Create a thread; non-empty `file_ids` are attached for code execution.
    async fn create_thread(&self, file_ids: &[String]) -> Result<Thread>;

    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        text: &str,
    ) -> Result<ThreadMessage>;

    async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<Run>;

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// Messages on the thread, newest first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>>;

    /// Start a run and receive its updates as they happen.
    async fn stream_run(&self, thread_id: &str, agent_id: &str) -> Result<RunEventStream>;
}
