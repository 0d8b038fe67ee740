use super::ConfigError;
use std::env;
use std::fs;

/// Read `<name>_FILE` (Docker Secrets) if it is set.
///
/// Returns `Ok(None)` when the variable is absent so callers keep whatever
/// value they already have.
pub fn load_secret_file(name: &str) -> Result<Option<String>, ConfigError> {
    let file_env = format!("{name}_FILE");
    let Ok(file_path) = env::var(&file_env) else {
        return Ok(None);
    };

    let content = fs::read_to_string(&file_path)
        .map_err(|e| ConfigError::EnvError(format!("Failed to read {file_env}: {e}")))?;
    let secret = content.trim().to_string();
    if secret.is_empty() {
        return Err(ConfigError::EnvError(format!("{file_env} points to an empty file")));
    }
    Ok(Some(secret))
}

/// Treat blank strings the same as unset values.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
