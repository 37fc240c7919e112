use crate::agent::{resolve_agent, AgentBlueprint, Resolution};
use crate::api::{Agent, AgentService, MessageRole, Run, RunStatus, Thread};
use crate::artifacts::{download_artifacts, DownloadOutcome};
use crate::config::Config;
use crate::content::{collect_run_output, OutputItem, RunOutput};
use crate::error::Result;
use crate::files::{list_spreadsheets, select_spreadsheet, upload_spreadsheet, UploadedFile};
use crate::progress::DotProgress;
use crate::run::{awaiter_for, RunAwaiter};
use crate::ui::{
    debug, display_image_placeholder, display_notice, display_success, display_text,
    display_warning, format_bytes, is_affirmative, LineReader,
};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

pub const EXIT_COMMAND: &str = "exit";

/// What the operator typed at the request prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnInput {
    Blank,
    Exit,
    Request(String),
}

pub fn classify_input(input: &str) -> TurnInput {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        TurnInput::Blank
    } else if trimmed.eq_ignore_ascii_case(EXIT_COMMAND) {
        TurnInput::Exit
    } else {
        TurnInput::Request(trimmed.to_string())
    }
}

/// Everything a turn needs. Written once when the session starts.
pub struct SessionContext {
    pub service: Arc<dyn AgentService>,
    pub agent: Agent,
    pub thread_id: String,
    pub uploaded: Option<UploadedFile>,
    pub work_dir: PathBuf,
    pub verbose: bool,
}

#[derive(Debug)]
pub struct TurnReport {
    pub run: Run,
    pub output: RunOutput,
    pub downloads: Vec<DownloadOutcome>,
}

/// Create the session's thread, attaching the uploaded file if there is one.
pub async fn open_thread(
    service: &dyn AgentService,
    uploaded: Option<&UploadedFile>,
) -> Result<Thread> {
    let file_ids: Vec<String> = uploaded.map(|f| f.file_id.clone()).into_iter().collect();
    service.create_thread(&file_ids).await
}

/// Resolve the agent, offer a spreadsheet upload and open the thread.
pub async fn start_session(
    service: Arc<dyn AgentService>,
    config: &Config,
    reader: &mut dyn LineReader,
) -> Result<SessionContext> {
    let blueprint = AgentBlueprint::from_config(config);
    let (agent, resolution) =
        resolve_agent(service.as_ref(), &config.agent_name, &blueprint, config.verbose).await?;
    match resolution {
        Resolution::Existing => display_notice(&format!("Using agent '{}'.", config.agent_name)),
        Resolution::Created => display_success(&format!("Created agent '{}'.", config.agent_name)),
    }

    let files = list_spreadsheets(&config.work_dir, &config.file_extensions)?;
    let uploaded = match select_spreadsheet(reader, &files, config.require_file)? {
        Some(file) => {
            let mut progress = DotProgress::new(format!("Uploading {}", file.name));
            let uploaded = upload_spreadsheet(
                service.as_ref(),
                file,
                config.progress_interval,
                &mut progress,
            )
            .await?;
            display_success(&format!(
                "Uploaded {} ({}).",
                file.name,
                format_bytes(uploaded.size)
            ));
            debug(config.verbose, "upload", format!("File id {}", uploaded.file_id));
            Some(uploaded)
        }
        None => None,
    };

    let thread = open_thread(service.as_ref(), uploaded.as_ref()).await?;
    debug(config.verbose, "agent", format!("Thread {}", thread.id));

    Ok(SessionContext {
        service,
        agent,
        thread_id: thread.id,
        uploaded,
        work_dir: config.work_dir.clone(),
        verbose: config.verbose,
    })
}

fn present_output(output: &RunOutput, text_already_shown: bool) {
    for item in &output.items {
        match item {
            OutputItem::Text(text) if !text_already_shown => display_text(text),
            OutputItem::Text(_) => {}
            OutputItem::Image(file_id) => display_image_placeholder(file_id),
        }
    }
}

fn report_unfinished(run: &Run) {
    let detail = run
        .last_error
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| "no details given".to_string());
    display_warning(&format!("Run ended with status {}: {}", run.status, detail));
}

/// Ask once; download every id only on a yes.
pub async fn offer_downloads(
    context: &SessionContext,
    reader: &mut dyn LineReader,
    image_ids: &[String],
) -> Result<Vec<DownloadOutcome>> {
    if image_ids.is_empty() {
        return Ok(Vec::new());
    }

    let prompt = format!("Download {} image(s)? [y/N]:", image_ids.len());
    let answer = reader.read_line(&prompt)?.unwrap_or_default();
    if !is_affirmative(&answer) {
        return Ok(Vec::new());
    }

    let outcomes =
        download_artifacts(context.service.as_ref(), image_ids, &context.work_dir).await;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(path) => display_success(&format!("Saved {}", path.display())),
            Err(e) => display_warning(&format!("Could not download {}: {}", outcome.file_id, e)),
        }
    }
    Ok(outcomes)
}

/// Post `request`, wait for the run, show its output and offer downloads.
pub async fn run_turn(
    context: &SessionContext,
    awaiter: &dyn RunAwaiter,
    reader: &mut dyn LineReader,
    request: &str,
) -> Result<TurnReport> {
    let service = context.service.as_ref();
    service
        .create_message(&context.thread_id, MessageRole::User, request)
        .await?;

    let completed = awaiter
        .execute(service, &context.thread_id, &context.agent.id)
        .await?;
    if completed.run.status != RunStatus::Completed {
        report_unfinished(&completed.run);
    }

    let messages = service.list_messages(&context.thread_id).await?;
    let output = collect_run_output(&messages, &completed.run.id);
    debug(
        context.verbose,
        "run",
        format!("{} produced {} item(s)", completed.run.id, output.items.len()),
    );
    present_output(&output, completed.text_already_shown());

    let downloads = offer_downloads(context, reader, &output.image_ids()).await?;

    Ok(TurnReport {
        run: completed.run,
        output,
        downloads,
    })
}

/// Read requests until `exit` or closed input.
pub async fn run_turn_loop(
    context: &SessionContext,
    awaiter: &dyn RunAwaiter,
    reader: &mut dyn LineReader,
) -> Result<()> {
    loop {
        let line = match reader.read_line("Request (or 'exit'):")? {
            Some(line) => line,
            None => break,
        };

        match classify_input(&line) {
            TurnInput::Blank => continue,
            TurnInput::Exit => break,
            TurnInput::Request(request) => {
                println!("{}", "Agent:".bold());
                run_turn(context, awaiter, reader, &request).await?;
            }
        }
    }
    Ok(())
}

pub async fn run_session(
    service: Arc<dyn AgentService>,
    config: &Config,
    reader: &mut dyn LineReader,
) -> Result<()> {
    let context = start_session(service, config, reader).await?;
    let awaiter = awaiter_for(config);
    run_turn_loop(&context, awaiter.as_ref(), reader).await?;
    display_notice("Goodbye.");
    Ok(())
}
