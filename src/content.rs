use crate::api::{ContentItem, MessageRole, ThreadMessage};

/// A piece of the agent's answer worth showing to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputItem {
    Text(String),
    Image(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    pub items: Vec<OutputItem>,
}

impl RunOutput {
    pub fn image_ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| match item {
                OutputItem::Image(id) => Some(id.clone()),
                OutputItem::Text(_) => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn belongs_to_run(message: &ThreadMessage, run_id: &str) -> bool {
    message.role == MessageRole::Assistant && message.run_id.as_deref() == Some(run_id)
}

/// Collect what the agent produced during `run_id`.
///
/// `messages` is newest first. Messages are skipped until the first
/// assistant message of the run; collection then continues over consecutive
/// messages of that run and stops at the first one that is not. The result
/// is in chronological order. `Unsupported` content items are dropped.
pub fn collect_run_output(messages: &[ThreadMessage], run_id: &str) -> RunOutput {
    let mut matched: Vec<&ThreadMessage> = messages
        .iter()
        .skip_while(|m| !belongs_to_run(m, run_id))
        .take_while(|m| belongs_to_run(m, run_id))
        .collect();
    matched.reverse();

    let items = matched
        .into_iter()
        .flat_map(|message| message.content.iter())
        .filter_map(|item| match item {
            ContentItem::Text { text } => Some(OutputItem::Text(text.value.clone())),
            ContentItem::ImageFile { image_file } => {
                Some(OutputItem::Image(image_file.file_id.clone()))
            }
            ContentItem::Unsupported => None,
        })
        .collect();

    RunOutput { items }
}
