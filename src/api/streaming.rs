use crate::api::models::{DeltaContent, MessageDelta, Run, StreamEvent};
use crate::api::response::extract_error_message;
use crate::error::{AgentError, Result};
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::VecDeque;

pub type RunEventStream = BoxStream<'static, Result<StreamEvent>>;

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SseFrame {
    pub event: Option<String>,
    pub data: String,
}

impl SseFrame {
    pub fn is_done(&self) -> bool {
        self.event.as_deref() == Some("done") || self.data.trim() == "[DONE]"
    }
}

/// Incremental server-sent-events decoder.
///
/// Bytes are buffered until a full line is available so multi-byte
/// characters split across chunks survive. A frame is dispatched on each
/// blank line.
#[derive(Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.pending.extend_from_slice(chunk);
        let mut frames = Vec::new();

        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(&['\r', '\n'][..]);
            if let Some(frame) = self.process_line(line) {
                frames.push(frame);
            }
        }

        frames
    }

    /// Flush whatever is left when the body ends without a trailing blank line.
    pub fn finish(&mut self) -> Option<SseFrame> {
        if !self.pending.is_empty() {
            let raw = std::mem::take(&mut self.pending);
            let line = String::from_utf8_lossy(&raw).trim_end().to_string();
            if let Some(frame) = self.process_line(&line) {
                return Some(frame);
            }
        }
        self.dispatch()
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, rest)) => (field, rest.strip_prefix(' ').unwrap_or(rest)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        if self.event.is_none() && self.data.is_empty() {
            return None;
        }
        Some(SseFrame {
            event: self.event.take(),
            data: std::mem::take(&mut self.data).join("\n"),
        })
    }
}

/// Map a frame to a stream event. Frames this client has no use for yield `None`.
pub fn parse_frame(frame: &SseFrame) -> Result<Option<StreamEvent>> {
    let event = match frame.event.as_deref() {
        Some(event) => event,
        None => return Ok(None),
    };

    match event {
        "error" => Err(AgentError::Other(format!(
            "run stream reported an error: {}",
            extract_error_message(&frame.data)
        ))),
        "thread.message.delta" => {
            let delta: MessageDelta = serde_json::from_str(&frame.data)?;
            let text: String = delta
                .delta
                .content
                .into_iter()
                .filter_map(|item| match item {
                    DeltaContent::Text { text } => text.and_then(|t| t.value),
                    DeltaContent::Other => None,
                })
                .collect();
            Ok((!text.is_empty()).then_some(StreamEvent::TextDelta(text)))
        }
        e if e.starts_with("thread.run.") && !e.starts_with("thread.run.step.") => {
            let run: Run = serde_json::from_str(&frame.data)?;
            Ok(Some(StreamEvent::RunUpdated(run)))
        }
        _ => Ok(None),
    }
}

struct StreamState {
    body: BoxStream<'static, reqwest::Result<Bytes>>,
    decoder: SseDecoder,
    queued: VecDeque<Result<StreamEvent>>,
    finished: bool,
}

impl StreamState {
    fn absorb(&mut self, frame: SseFrame) {
        if self.finished {
            return;
        }
        if frame.is_done() {
            self.finished = true;
            return;
        }
        match parse_frame(&frame) {
            Ok(Some(event)) => self.queued.push_back(Ok(event)),
            Ok(None) => {}
            Err(e) => {
                self.queued.push_back(Err(e));
                self.finished = true;
            }
        }
    }
}

/// Turn a streaming HTTP body into run events. The stream ends on the
/// `done` frame, on the end of the body, or right after the first error.
pub fn event_stream(body: BoxStream<'static, reqwest::Result<Bytes>>) -> RunEventStream {
    let state = StreamState {
        body,
        decoder: SseDecoder::new(),
        queued: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.queued.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match state.body.next().await {
                Some(Ok(chunk)) => {
                    for frame in state.decoder.push(&chunk) {
                        state.absorb(frame);
                    }
                }
                Some(Err(e)) => {
                    state.queued.push_back(Err(AgentError::Network(e)));
                    state.finished = true;
                }
                None => {
                    if let Some(frame) = state.decoder.finish() {
                        state.absorb(frame);
                    }
                    state.finished = true;
                }
            }
        }
    })
    .boxed()
}
