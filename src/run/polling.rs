use super::{CompletedRun, RunAwaiter};
use crate::api::{AgentService, Run};
use crate::error::{AgentError, Result};
use crate::progress::{with_progress, DotProgress};
use crate::ui::debug;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_wait: Duration,
}

/// Re-fetch `run` every `policy.interval` until it is no longer pending.
///
/// A run that is already terminal is returned without any fetch. Fails with
/// [`AgentError::Timeout`] once `policy.max_wait` has elapsed, including while
/// a fetch is still outstanding.
pub async fn wait_for_run(
    service: &dyn AgentService,
    run: Run,
    policy: PollPolicy,
    verbose: bool,
) -> Result<Run> {
    let started = Instant::now();
    let run_id = run.id.clone();

    match timeout(
        policy.max_wait,
        poll_until_settled(service, run, policy, started, verbose),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(AgentError::Timeout {
            operation: format!("Run {}", run_id),
            waited: started.elapsed(),
        }),
    }
}

async fn poll_until_settled(
    service: &dyn AgentService,
    mut run: Run,
    policy: PollPolicy,
    started: Instant,
    verbose: bool,
) -> Result<Run> {
    while run.status.is_pending() {
        let waited = started.elapsed();
        if waited >= policy.max_wait {
            return Err(AgentError::Timeout {
                operation: format!("Run {}", run.id),
                waited,
            });
        }

        // never sleep past the deadline
        sleep(policy.interval.min(policy.max_wait - waited)).await;
        run = service.get_run(&run.thread_id, &run.id).await?;
        debug(verbose, "run", format!("{} is {}", run.id, run.status));
    }

    Ok(run)
}

pub struct PollingAwaiter {
    policy: PollPolicy,
    progress_interval: Duration,
    verbose: bool,
}

impl PollingAwaiter {
    pub fn new(policy: PollPolicy, progress_interval: Duration, verbose: bool) -> Self {
        Self {
            policy,
            progress_interval,
            verbose,
        }
    }
}

#[async_trait]
impl RunAwaiter for PollingAwaiter {
    async fn execute(
        &self,
        service: &dyn AgentService,
        thread_id: &str,
        agent_id: &str,
    ) -> Result<CompletedRun> {
        let run = service.create_run(thread_id, agent_id).await?;
        debug(self.verbose, "run", format!("Started {} ({})", run.id, run.status));

        let mut progress = DotProgress::new("Waiting for the agent");
        let run = with_progress(
            wait_for_run(service, run, self.policy, self.verbose),
            self.progress_interval,
            &mut progress,
        )
        .await?;

        Ok(CompletedRun {
            run,
            streamed_text: None,
        })
    }
}
