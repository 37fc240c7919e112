mod output;
mod prompt;

pub use output::{
    debug, display_error, display_fragment, display_image_placeholder, display_notice,
    display_success, display_text, display_warning, format_bytes, terminate_line,
};
pub use prompt::{is_affirmative, LineReader, StdinReader};
