use crate::api::models::{
    Agent, AgentDefinition, CreateMessageRequest, CreateRunRequest, CreateThreadRequest,
    FileObject, ListPage, MessageRole, Run, Thread, ThreadMessage, ToolResources,
};
use crate::api::response::ensure_success;
use crate::api::streaming::{event_stream, RunEventStream};
use crate::api::AgentService;
use crate::auth::Credential;
use crate::error::{AgentError, Result};
use crate::ui::debug;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::path::Path;

const PAGE_LIMIT: &str = "100";

/// [`AgentService`] over the service's REST API.
pub struct HttpAgentService {
    client: reqwest::Client,
    endpoint: String,
    api_version: String,
    verbose: bool,
}

impl HttpAgentService {
    pub fn new(
        endpoint: &str,
        api_version: &str,
        credential: &Credential,
        verbose: bool,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", credential.token())).map_err(|e| {
                AgentError::Credential(format!("Invalid authorization header: {}", e))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_version: api_version.to_string(),
            verbose,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug(self.verbose, "http", format!("GET {}", path));
        let response = self
            .client
            .get(self.url(path))
            .query(&[("api-version", self.api_version.as_str())])
            .query(query)
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug(self.verbose, "http", format!("POST {}", path));
        let response = self
            .client
            .post(self.url(path))
            .query(&[("api-version", self.api_version.as_str())])
            .json(body)
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}

/// Walk a cursor-paged listing. `fetch` receives the `after` cursor (none for
/// the first page); walking stops once a page reports no more results or
/// carries no cursor.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<ListPage<T>>>,
{
    let mut items = Vec::new();
    let mut after: Option<String> = None;

    loop {
        let page = fetch(after.take()).await?;
        items.extend(page.data);

        match page.last_id {
            Some(cursor) if page.has_more => after = Some(cursor),
            _ => break,
        }
    }

    Ok(items)
}

#[async_trait]
impl AgentService for HttpAgentService {
    async fn list_agents(&self) -> Result<Vec<Agent>> {
        collect_pages(|after| async move {
            let mut query = vec![("limit", PAGE_LIMIT)];
            if let Some(cursor) = after.as_deref() {
                query.push(("after", cursor));
            }
            self.get_json("assistants", &query).await
        })
        .await
    }

    async fn create_agent(&self, definition: &AgentDefinition) -> Result<Agent> {
        self.post_json("assistants", definition).await
    }

    async fn upload_file(&self, path: &Path) -> Result<FileObject> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AgentError::Other(format!("invalid file name: {}", path.display())))?
            .to_string();
        let contents = tokio::fs::read(path).await?;
        debug(
            self.verbose,
            "http",
            format!("POST files ({} bytes, {})", contents.len(), file_name),
        );

        let form = Form::new()
            .text("purpose", "assistants")
            .part("file", Part::bytes(contents).file_name(file_name));

        let response = self
            .client
            .post(self.url("files"))
            .query(&[("api-version", self.api_version.as_str())])
            .multipart(form)
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn file_content(&self, file_id: &str) -> Result<Bytes> {
        let path = format!("files/{}/content", file_id);
        debug(self.verbose, "http", format!("GET {}", path));
        let response = self
            .client
            .get(self.url(&path))
            .query(&[("api-version", self.api_version.as_str())])
            .send()
            .await?;
        Ok(ensure_success(response).await?.bytes().await?)
    }

    async fn create_thread(&self, file_ids: &[String]) -> Result<Thread> {
        let request = CreateThreadRequest {
            tool_resources: ToolResources::code_interpreter_files(file_ids),
        };
        self.post_json("threads", &request).await
    }

    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        text: &str,
    ) -> Result<ThreadMessage> {
        let request = CreateMessageRequest {
            role,
            content: text,
        };
        self.post_json(&format!("threads/{}/messages", thread_id), &request)
            .await
    }

    async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<Run> {
        let request = CreateRunRequest {
            assistant_id: agent_id,
            stream: false,
        };
        self.post_json(&format!("threads/{}/runs", thread_id), &request)
            .await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.get_json(&format!("threads/{}/runs/{}", thread_id, run_id), &[])
            .await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let page: ListPage<ThreadMessage> = self
            .get_json(
                &format!("threads/{}/messages", thread_id),
                &[("order", "desc"), ("limit", PAGE_LIMIT)],
            )
            .await?;
        Ok(page.data)
    }

    async fn stream_run(&self, thread_id: &str, agent_id: &str) -> Result<RunEventStream> {
        let path = format!("threads/{}/runs", thread_id);
        debug(self.verbose, "http", format!("POST {} (stream)", path));
        let request = CreateRunRequest {
            assistant_id: agent_id,
            stream: true,
        };
        let response = self
            .client
            .post(self.url(&path))
            .query(&[("api-version", self.api_version.as_str())])
            .header(ACCEPT, "text/event-stream")
            .json(&request)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(event_stream(response.bytes_stream().boxed()))
    }
}
