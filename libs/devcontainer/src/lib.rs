use serde_json::Value;
use thiserror::Error;

mod json;
mod rules;

pub use json::*;
pub use rules::*;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid JSON in devcontainer.json: {0}")]
    InvalidJson(String),
    #[error("Invalid devcontainer.json structure")]
    InvalidStructure,
}

/// Parse the contents of a devcontainer.json file
///
/// `//` comments are stripped before decoding, and the decoded value has to pass
/// [`is_devcontainer_content`].
pub fn parse(content: &str) -> Result<DevContainer, ParseError> {
    let clean_json = strip_json_comments(content);
    log::debug!("Stripped comments from JSON content");

    let value: Value =
        serde_json::from_str(&clean_json).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    log::debug!("Successfully parsed JSON content");

    DevContainer::from_value(value).ok_or(ParseError::InvalidStructure)
}
