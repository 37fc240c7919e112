use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolDefinition {
    CodeInterpreter,
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Agent {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
}

/// Request body for creating an agent.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AgentDefinition {
    pub name: String,
    pub model: String,
    pub instructions: String,
    pub tools: Vec<ToolDefinition>,
}

/// One page of a cursor-paginated list.
#[derive(Deserialize, Debug)]
pub struct ListPage<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub last_id: Option<String>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct FileObject {
    pub id: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CodeInterpreterResource {
    #[serde(default)]
    pub file_ids: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ToolResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_interpreter: Option<CodeInterpreterResource>,
}

impl ToolResources {
    pub fn code_interpreter_files(file_ids: &[String]) -> Option<Self> {
        if file_ids.is_empty() {
            return None;
        }
        Some(Self {
            code_interpreter: Some(CodeInterpreterResource {
                file_ids: file_ids.to_vec(),
            }),
        })
    }

    pub fn file_ids(&self) -> &[String] {
        self.code_interpreter
            .as_ref()
            .map(|c| c.file_ids.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Serialize, Debug, Default)]
pub struct CreateThreadRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Thread {
    pub id: String,
    #[serde(default)]
    pub tool_resources: Option<ToolResources>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Serialize, Debug)]
pub struct CreateMessageRequest<'a> {
    pub role: MessageRole,
    pub content: &'a str,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct TextContent {
    pub value: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ImageFileContent {
    pub file_id: String,
}

/// One item of a message's payload. Kinds this client does not know about
/// deserialize as `Unsupported` and are skipped by the content scan.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    Text { text: TextContent },
    ImageFile { image_file: ImageFileContent },
    #[serde(other)]
    Unsupported,
}

impl ContentItem {
    pub fn text(value: impl Into<String>) -> Self {
        ContentItem::Text {
            text: TextContent {
                value: value.into(),
            },
        }
    }

    pub fn image(file_id: impl Into<String>) -> Self {
        ContentItem::ImageFile {
            image_file: ImageFileContent {
                file_id: file_id.into(),
            },
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ThreadMessage {
    pub id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

#[derive(Serialize, Debug)]
pub struct CreateRunRequest<'a> {
    pub assistant_id: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
}

impl RunStatus {
    /// Still waiting on the service: queued or in progress.
    pub fn is_pending(self) -> bool {
        matches!(self, RunStatus::Queued | RunStatus::InProgress)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct RunError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Run {
    pub id: String,
    pub thread_id: String,
    #[serde(default)]
    pub assistant_id: Option<String>,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

/// One update from a streamed run.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamEvent {
    RunUpdated(Run),
    TextDelta(String),
}

#[derive(Deserialize, Debug)]
pub struct MessageDelta {
    pub delta: MessageDeltaBody,
}

#[derive(Deserialize, Debug)]
pub struct MessageDeltaBody {
    #[serde(default)]
    pub content: Vec<DeltaContent>,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeltaContent {
    Text {
        #[serde(default)]
        text: Option<TextDelta>,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug)]
pub struct TextDelta {
    #[serde(default)]
    pub value: Option<String>,
}
