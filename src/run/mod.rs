mod polling;
mod streaming;

pub use polling::{wait_for_run, PollPolicy, PollingAwaiter};
pub use streaming::StreamingAwaiter;

use crate::api::{AgentService, Run};
use crate::config::{CompletionMode, Config};
use crate::error::Result;
use async_trait::async_trait;

/// A run that has left the queued/in-progress states.
#[derive(Debug, Clone)]
pub struct CompletedRun {
    pub run: Run,
    /// Text already printed while the run was streaming.
    pub streamed_text: Option<String>,
}

impl CompletedRun {
    pub fn text_already_shown(&self) -> bool {
        self.streamed_text.is_some()
    }
}

/// Starts a run on a thread and waits until it is no longer pending.
#[async_trait]
pub trait RunAwaiter: Send + Sync {
    async fn execute(
        &self,
        service: &dyn AgentService,
        thread_id: &str,
        agent_id: &str,
    ) -> Result<CompletedRun>;
}

pub fn awaiter_for(config: &Config) -> Box<dyn RunAwaiter> {
    match config.completion {
        CompletionMode::Poll => Box::new(PollingAwaiter::new(
            PollPolicy {
                interval: config.poll_interval,
                max_wait: config.max_wait,
            },
            config.progress_interval,
            config.verbose,
        )),
        CompletionMode::Stream => {
            Box::new(StreamingAwaiter::new(config.stream_timeout, config.verbose))
        }
    }
}
