use thiserror::Error;

use crate::json::DevContainer;

/// Tasks every devcontainer has to define when task validation is enabled
pub const REQUIRED_TASKS: [&str; 3] = ["build", "test", "run"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    /// There is no `tasks` property at all (an empty one is reported as `Invalid`)
    #[error("'tasks' property is missing")]
    Missing,
    #[error("Missing or invalid required tasks: {}", .0.join(", "))]
    Invalid(Vec<String>),
}

/// Find the required extensions that are not configured
///
/// Identifiers are compared case-insensitively. The result keeps the order of `required`.
pub fn missing_extensions(devcontainer: &DevContainer, required: &[String]) -> Vec<String> {
    let configured: Vec<String> = devcontainer
        .extensions()
        .iter()
        .filter_map(|extension| extension.as_str())
        .map(str::to_lowercase)
        .collect();

    log::debug!("Validating against required extensions: {}", required.join(", "));
    log::debug!("Found configured extensions: {}", configured.join(", "));

    let missing: Vec<String> = required
        .iter()
        .filter(|required| {
            let required = required.to_lowercase();
            !configured.iter().any(|configured| *configured == required)
        })
        .cloned()
        .collect();

    if missing.is_empty() {
        log::debug!("All required extensions present");
    } else {
        log::debug!("Missing: {}", missing.join(", "));
    }
    missing
}

/// Check that the `build`, `test` and `run` tasks are defined with a non-empty command
pub fn validate_tasks(devcontainer: &DevContainer) -> Result<(), TaskError> {
    log::debug!("Validating required tasks ({})", REQUIRED_TASKS.join(", "));
    let Some(tasks) = &devcontainer.tasks else {
        log::debug!("No tasks section found in devcontainer");
        return Err(TaskError::Missing);
    };

    let configured: Vec<&str> = tasks.keys().map(String::as_str).collect();
    log::debug!("Tasks configured in devcontainer: {}", configured.join(", "));

    let missing: Vec<String> = REQUIRED_TASKS
        .iter()
        .filter(|&&task| tasks.get(task).map_or(true, |command| command.is_empty()))
        .map(|&task| task.to_owned())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(TaskError::Invalid(missing))
    }
}

/// Find the required features that are not configured
///
/// Feature identifiers have to match a key of `features` exactly.
/// Nothing is checked when `required` is empty.
pub fn missing_features(devcontainer: &DevContainer, required: &[String]) -> Vec<String> {
    if required.is_empty() {
        log::debug!("No features specified in required-features input");
        return Vec::new();
    }

    log::debug!("Validating features (required input: {})", required.join(", "));
    let Some(features) = &devcontainer.features else {
        log::debug!("No features section found in devcontainer");
        return required.to_vec();
    };
    let configured: Vec<&str> = features.keys().map(String::as_str).collect();
    log::debug!("Features found in devcontainer: {}", configured.join(", "));

    required.iter().filter(|required| !features.contains_key(required.as_str())).cloned().collect()
}
