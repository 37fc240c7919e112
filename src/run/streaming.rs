use super::{CompletedRun, RunAwaiter};
use crate::api::{AgentService, Run, StreamEvent};
use crate::error::{AgentError, Result};
use crate::ui::{debug, display_fragment};
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use tokio::time::timeout;

pub struct StreamingAwaiter {
    idle_timeout: Duration,
    verbose: bool,
}

impl StreamingAwaiter {
    pub fn new(idle_timeout: Duration, verbose: bool) -> Self {
        Self {
            idle_timeout,
            verbose,
        }
    }
}

#[async_trait]
impl RunAwaiter for StreamingAwaiter {
    /// Prints text fragments as they arrive. The end of the event stream is
    /// the end of the run; the last run update seen identifies it. A stream
    /// without text leaves `streamed_text` empty so history text is shown.
    async fn execute(
        &self,
        service: &dyn AgentService,
        thread_id: &str,
        agent_id: &str,
    ) -> Result<CompletedRun> {
        let mut events = service.stream_run(thread_id, agent_id).await?;
        let mut last_run: Option<Run> = None;
        let mut text = String::new();

        loop {
            match timeout(self.idle_timeout, events.next()).await {
                Ok(Some(Ok(StreamEvent::TextDelta(fragment)))) => {
                    display_fragment(&fragment);
                    text.push_str(&fragment);
                }
                Ok(Some(Ok(StreamEvent::RunUpdated(run)))) => {
                    debug(self.verbose, "run", format!("{} is {}", run.id, run.status));
                    last_run = Some(run);
                }
                Ok(Some(Err(e))) => return Err(e),
                Ok(None) => break,
                Err(_) => {
                    return Err(AgentError::Timeout {
                        operation: "Waiting for the run stream".to_string(),
                        waited: self.idle_timeout,
                    })
                }
            }
        }

        if !text.is_empty() && !text.ends_with('\n') {
            println!();
        }

        let run = last_run.ok_or_else(|| {
            AgentError::Other("run stream ended before the service reported a run".to_string())
        })?;

        Ok(CompletedRun {
            run,
            streamed_text: (!text.is_empty()).then_some(text),
        })
    }
}
