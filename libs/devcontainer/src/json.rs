//! https://containers.dev/implementors/json_reference/

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Matches a `//` and the rest of its line, leaving the line terminator in place.
static LINE_COMMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"//[^\r\n\x{2028}\x{2029}]*").unwrap());

/// The contents of a devcontainer.json file
///
/// Only the parts that are validated are modelled here, every other property is ignored.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevContainer {
    pub customizations: Option<Customizations>,
    /// Task name to command
    pub tasks: Option<BTreeMap<String, String>>,
    /// Feature identifier to its (opaque) options
    pub features: Option<BTreeMap<String, Map<String, Value>>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Customizations {
    pub vscode: VsCodeCustomizations,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VsCodeCustomizations {
    /// Extension identifiers, `publisher.name`.
    /// Elements are kept as raw values since their type is never checked.
    pub extensions: Vec<Value>,
}

impl DevContainer {
    /// Build a record from a decoded JSON value, if it has a valid shape
    pub fn from_value(value: Value) -> Option<Self> {
        if !is_devcontainer_content(&value) {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// The configured extensions, empty when `customizations.vscode.extensions` is absent
    pub fn extensions(&self) -> &[Value] {
        self.customizations.as_ref().map(|c| c.vscode.extensions.as_slice()).unwrap_or_default()
    }
}

/// Check that a decoded value has the shape of a devcontainer.json file
///
/// Each of `customizations`, `tasks` and `features` is optional, but when present it has to be
/// well-typed:
///
/// * `customizations.vscode.extensions` must be an array (its elements are not checked)
/// * `tasks` must be an object whose values are all strings
/// * `features` must be an object whose values are all objects
pub fn is_devcontainer_content(value: &Value) -> bool {
    let Some(candidate) = value.as_object() else {
        return false;
    };

    if let Some(customizations) = candidate.get("customizations") {
        let extensions = customizations
            .as_object()
            .and_then(|c| c.get("vscode"))
            .and_then(Value::as_object)
            .and_then(|vscode| vscode.get("extensions"));
        if !matches!(extensions, Some(Value::Array(_))) {
            return false;
        }
    }

    if let Some(tasks) = candidate.get("tasks") {
        match tasks.as_object() {
            Some(tasks) if tasks.values().all(Value::is_string) => {}
            _ => return false,
        }
    }

    if let Some(features) = candidate.get("features") {
        match features.as_object() {
            Some(features) if features.values().all(Value::is_object) => {}
            _ => return false,
        }
    }

    true
}

/// Strip `//` line comments
///
/// Everything from a `//` to the end of its line is removed, line terminators are kept.
/// String literals are not taken into account, so a `//` inside a value (a URL, say)
/// is cut off as well.
pub fn strip_json_comments(content: &str) -> String {
    LINE_COMMENT_REGEX.replace_all(content, "").into_owned()
}

/// Find a devcontainer.json file in the specified directory
///
/// Searched locations, in order of precedence:
///
/// 1. `.devcontainer/devcontainer.json`
/// 2. `.devcontainer.json`
/// 3. `.devcontainer/<folder>/devcontainer.json` (where <folder> is a sub-folder, one level deep)
///
/// It is valid that these files may exist in more than one location, but for now, only the first
/// one found will be returned. Sub-folders are visited in name order.
/// See https://containers.dev/implementors/spec/#devcontainerjson for more information.
pub fn find_devcontainer_json<P: AsRef<Path>>(directory: P) -> Option<PathBuf> {
    let directory = directory.as_ref();

    let paths_to_check =
        [directory.join(".devcontainer/devcontainer.json"), directory.join(".devcontainer.json")];
    if let Some(path) = paths_to_check.into_iter().find(|path| path.is_file()) {
        return Some(path);
    }

    // Check for .devcontainer/<folder>/devcontainer.json (one level deep)
    let devcontainer_dir = directory.join(".devcontainer");
    let entries = fs::read_dir(&devcontainer_dir).ok()?;
    let mut folders: Vec<PathBuf> =
        entries.flatten().map(|entry| entry.path()).filter(|path| path.is_dir()).collect();
    folders.sort();
    folders.into_iter().map(|folder| folder.join("devcontainer.json")).find(|path| path.is_file())
}
