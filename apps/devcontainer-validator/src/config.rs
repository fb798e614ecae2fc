use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Used when no devcontainer-path input is given and nothing is found in the workspace
const DEFAULT_DEVCONTAINER_PATH: &str = ".devcontainer/devcontainer.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),
    #[error("Failed to read inputs: {0}")]
    Env(#[from] envy::Error),
}

/// Action inputs as passed by the workflow runner, `INPUT_<NAME>`
#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawInputs {
    required_extensions: Option<String>,
    devcontainer_path: Option<String>,
    validate_tasks: Option<String>,
    required_features: Option<String>,
}

#[derive(Deserialize)]
struct Runner {
    debug: Option<String>,
}

#[derive(Debug, Default)]
pub struct Inputs {
    pub required_extensions: Vec<String>,
    pub devcontainer_path: Option<PathBuf>,
    pub validate_tasks: bool,
    /// Empty disables feature validation
    pub required_features: Vec<String>,
}

impl Inputs {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let raw: RawInputs = envy::prefixed("INPUT_").from_iter(vars)?;

        let required_extensions = input(raw.required_extensions)
            .ok_or(ConfigError::MissingInput("required-extensions"))?;
        log::debug!("Required extensions input: {}", required_extensions);

        let validate_tasks = input(raw.validate_tasks).as_deref() == Some("true");
        log::debug!("Task validation enabled: {}", validate_tasks);

        Ok(Self {
            required_extensions: split_list(&required_extensions),
            devcontainer_path: input(raw.devcontainer_path).map(PathBuf::from),
            validate_tasks,
            required_features: input(raw.required_features)
                .map(|features| split_list(&features))
                .unwrap_or_default(),
        })
    }

    /// The devcontainer.json to validate
    ///
    /// An explicit devcontainer-path input wins (relative to `workspace`), otherwise `workspace`
    /// is searched with [`devcontainer::find_devcontainer_json`].
    pub fn devcontainer_path(&self, workspace: &Path) -> PathBuf {
        match &self.devcontainer_path {
            Some(path) => workspace.join(path),
            None => devcontainer::find_devcontainer_json(workspace)
                .unwrap_or_else(|| workspace.join(DEFAULT_DEVCONTAINER_PATH)),
        }
    }
}

/// Whether the runner has debug logging enabled (`RUNNER_DEBUG=1`)
pub fn runner_debug() -> bool {
    envy::prefixed("RUNNER_")
        .from_env::<Runner>()
        .map(|runner| runner.debug.as_deref() == Some("1"))
        .unwrap_or(false)
}

/// Inputs are trimmed, and an empty input counts as not supplied
fn input(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_owned()).filter(|value| !value.is_empty())
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(|item| item.trim().to_owned()).collect()
}
