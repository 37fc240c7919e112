pub const DEFAULT_API_VERSION: &str = "v1";

pub const DEFAULT_MODEL: &str = "gpt-4o";

pub const DEFAULT_INSTRUCTIONS: &str = "You are a data analyst. When a spreadsheet is attached, \
load it with the code interpreter before answering. Answer questions about its contents \
precisely, and when asked for a chart, draw it with matplotlib and save it as a PNG image.";

pub fn default_poll_interval_ms() -> u64 {
    1_000
}

pub fn default_max_wait_secs() -> u64 {
    600
}

pub fn default_progress_interval_ms() -> u64 {
    500
}

pub fn default_stream_timeout() -> u64 {
    120
}

pub fn default_file_extensions() -> Vec<String> {
    vec!["xlsx".to_string()]
}
