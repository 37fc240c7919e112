#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use sheet_agent::api::{
    Agent, AgentDefinition, AgentService, ContentItem, FileObject, MessageRole, Run,
    RunEventStream, RunStatus, StreamEvent, Thread, ThreadMessage,
};
use sheet_agent::cli::Args;
use sheet_agent::config::{CompletionMode, Config, FileConfig};
use sheet_agent::error::{AgentError, Result};
use sheet_agent::ui::LineReader;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListAgents,
    CreateAgent(String),
    Upload(PathBuf),
    FileContent(String),
    CreateThread(Vec<String>),
    CreateMessage(String),
    CreateRun,
    GetRun(String),
    ListMessages,
    StreamRun,
}

/// In-memory stand-in for the agent service.
///
/// Every run immediately gets one assistant message carrying `reply`.
/// `get_run` pops statuses from `statuses`, then reports `fallback_status`.
pub struct FakeService {
    pub agents: Vec<Agent>,
    pub reply: Vec<ContentItem>,
    pub initial_status: RunStatus,
    pub statuses: Mutex<VecDeque<RunStatus>>,
    pub fallback_status: RunStatus,
    pub failing_downloads: Vec<String>,
    /// `get_run` never resolves.
    pub stalled_fetch: bool,
    /// `stream_run` goes silent after the first run update.
    pub stalled_stream: bool,
    pub calls: Mutex<Vec<Call>>,
    pub messages: Mutex<Vec<ThreadMessage>>,
    next_id: Mutex<u32>,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            agents: Vec::new(),
            reply: vec![ContentItem::text("Done.")],
            initial_status: RunStatus::Queued,
            statuses: Mutex::new(VecDeque::new()),
            fallback_status: RunStatus::Completed,
            failing_downloads: Vec::new(),
            stalled_fetch: false,
            stalled_stream: false,
            calls: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            next_id: Mutex::new(0),
        }
    }

    pub fn with_agents(mut self, agents: Vec<Agent>) -> Self {
        self.agents = agents;
        self
    }

    pub fn with_reply(mut self, reply: Vec<ContentItem>) -> Self {
        self.reply = reply;
        self
    }

    pub fn with_statuses(self, statuses: &[RunStatus]) -> Self {
        *self.statuses.lock().unwrap() = statuses.iter().copied().collect();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matcher: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matcher(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("{}_{}", prefix, next)
    }

    fn start_run(&self, thread_id: &str, status: RunStatus) -> Run {
        let run = Run {
            id: self.next_id("run"),
            thread_id: thread_id.to_string(),
            assistant_id: Some("asst_1".to_string()),
            status,
            last_error: None,
        };
        let message = ThreadMessage {
            id: self.next_id("msg"),
            role: MessageRole::Assistant,
            run_id: Some(run.id.clone()),
            content: self.reply.clone(),
        };
        self.messages.lock().unwrap().push(message);
        run
    }
}

pub fn agent(id: &str, name: &str) -> Agent {
    Agent {
        id: id.to_string(),
        name: Some(name.to_string()),
        model: "gpt-4o".to_string(),
        instructions: None,
        tools: Vec::new(),
    }
}

#[async_trait]
impl AgentService for FakeService {
    async fn list_agents(&self) -> Result<Vec<Agent>> {
        self.record(Call::ListAgents);
        Ok(self.agents.clone())
    }

    async fn create_agent(&self, definition: &AgentDefinition) -> Result<Agent> {
        self.record(Call::CreateAgent(definition.name.clone()));
        Ok(Agent {
            id: self.next_id("asst"),
            name: Some(definition.name.clone()),
            model: definition.model.clone(),
            instructions: Some(definition.instructions.clone()),
            tools: definition.tools.clone(),
        })
    }

    async fn upload_file(&self, path: &Path) -> Result<FileObject> {
        self.record(Call::Upload(path.to_path_buf()));
        Ok(FileObject {
            id: "file-abc123".to_string(),
            bytes: 0,
            filename: None,
        })
    }

    async fn file_content(&self, file_id: &str) -> Result<Bytes> {
        self.record(Call::FileContent(file_id.to_string()));
        if self.failing_downloads.iter().any(|id| id == file_id) {
            return Err(AgentError::Api {
                status: 404,
                message: "file not found".to_string(),
            });
        }
        Ok(Bytes::from_static(b"\x89PNG fake image"))
    }

    async fn create_thread(&self, file_ids: &[String]) -> Result<Thread> {
        self.record(Call::CreateThread(file_ids.to_vec()));
        Ok(Thread {
            id: "thread_1".to_string(),
            tool_resources: None,
        })
    }

    async fn create_message(
        &self,
        _thread_id: &str,
        role: MessageRole,
        text: &str,
    ) -> Result<ThreadMessage> {
        self.record(Call::CreateMessage(text.to_string()));
        let message = ThreadMessage {
            id: self.next_id("msg"),
            role,
            run_id: None,
            content: vec![ContentItem::text(text)],
        };
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn create_run(&self, thread_id: &str, _agent_id: &str) -> Result<Run> {
        self.record(Call::CreateRun);
        Ok(self.start_run(thread_id, self.initial_status))
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.record(Call::GetRun(run_id.to_string()));
        if self.stalled_fetch {
            futures::future::pending::<()>().await;
        }
        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback_status);
        Ok(Run {
            id: run_id.to_string(),
            thread_id: thread_id.to_string(),
            assistant_id: Some("asst_1".to_string()),
            status,
            last_error: None,
        })
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>> {
        self.record(Call::ListMessages);
        let mut messages = self.messages.lock().unwrap().clone();
        messages.reverse();
        Ok(messages)
    }

    async fn stream_run(&self, thread_id: &str, _agent_id: &str) -> Result<RunEventStream> {
        self.record(Call::StreamRun);
        let run = self.start_run(thread_id, RunStatus::Queued);

        let mut events = vec![StreamEvent::RunUpdated(run.clone())];
        if self.stalled_stream {
            return Ok(stream::iter(events.into_iter().map(Ok))
                .chain(stream::pending())
                .boxed());
        }
        for item in &self.reply {
            if let ContentItem::Text { text } = item {
                events.push(StreamEvent::TextDelta(text.value.clone()));
            }
        }
        events.push(StreamEvent::RunUpdated(Run {
            status: RunStatus::Completed,
            ..run
        }));

        Ok(stream::iter(events.into_iter().map(Ok)).boxed())
    }
}

/// Replays canned answers and remembers the prompts it was shown.
pub struct ScriptedReader {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedReader {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            prompts: Vec::new(),
        }
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }
}

pub fn test_config(work_dir: &Path, completion: CompletionMode) -> Config {
    let file = FileConfig {
        endpoint: Some("https://example.services.ai.azure.com/api/projects/demo".to_string()),
        agent_name: Some("sheet-analyst".to_string()),
        completion: Some(completion),
        poll_interval_ms: Some(1),
        progress_interval_ms: Some(5),
        max_wait_secs: Some(5),
        ..FileConfig::default()
    };
    Config::resolve(file, &Args::default(), &|_| None, work_dir.to_path_buf())
        .expect("test config resolves")
}
