use regex::Regex;
use std::sync::OnceLock;

fn env_reference() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern compiles"))
}

/// Expand `${VAR_NAME}` references using `lookup`. Unknown variables are left as written.
pub fn expand_env_references(value: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    env_reference()
        .replace_all(value, |caps: &regex::Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Require a non-blank value for a mandatory setting.
pub fn require_setting(value: Option<String>, key: &str, env_key: &str) -> Result<String, String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!(
            "'{}' is not set (add it to the settings file or export {})",
            key, env_key
        )),
    }
}

/// Validate an endpoint URL and strip trailing slashes.
pub fn normalize_endpoint(endpoint: &str) -> Result<String, String> {
    if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
        return Err(format!(
            "endpoint '{}' must start with http:// or https://",
            endpoint
        ));
    }
    Ok(endpoint.trim_end_matches('/').to_string())
}

pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
