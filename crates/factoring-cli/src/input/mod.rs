pub mod file;
pub mod pricing;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Typed input from `--input <file>`, else from piped stdin.
///
/// Returns `Ok(None)` when neither is available so commands with flag
/// fallbacks can build the input themselves.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_structured(path)?));
    }
    match stdin::read_stdin()? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Like [`read_input`] but the input is mandatory.
pub fn require_input<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    read_input(path)?.ok_or_else(|| format!("--input <file> or stdin required for {what}").into())
}
