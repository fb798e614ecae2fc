use std::path::{Path, PathBuf};

use devcontainer::{ParseError, TaskError};
use thiserror::Error;
use tokio::fs;

use crate::config::Inputs;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("devcontainer.json not found at {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("Invalid JSON in devcontainer.json: {0}")]
    InvalidJson(String),
    #[error("Invalid devcontainer.json structure")]
    InvalidStructure,
    #[error("Missing required extensions: {}", .0.join(", "))]
    MissingExtensions(Vec<String>),
    #[error(transparent)]
    Tasks(#[from] TaskError),
    #[error("Missing required features: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),
    /// Any other failure, its details are only logged
    #[error("An unknown error occurred")]
    Unknown,
}

impl From<ParseError> for ValidationError {
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::InvalidJson(message) => Self::InvalidJson(message),
            ParseError::InvalidStructure => Self::InvalidStructure,
        }
    }
}

/// Validate the devcontainer.json selected by `inputs`
///
/// Checks run in a fixed order (extensions, tasks, features) and the first failure is returned.
/// A relative devcontainer path is resolved against `workspace`.
pub async fn run(inputs: &Inputs, workspace: &Path) -> Result<(), ValidationError> {
    log::debug!("Starting devcontainer validation");
    let path = inputs.devcontainer_path(workspace);
    log::debug!("Using devcontainer path: {}", path.display());

    let content = read_devcontainer(&path).await?;
    let devcontainer = devcontainer::parse(&content)?;

    let missing_extensions =
        devcontainer::missing_extensions(&devcontainer, &inputs.required_extensions);
    if !missing_extensions.is_empty() {
        return Err(ValidationError::MissingExtensions(missing_extensions));
    }

    if inputs.validate_tasks {
        devcontainer::validate_tasks(&devcontainer)?;
    }

    if !inputs.required_features.is_empty() {
        let missing_features =
            devcontainer::missing_features(&devcontainer, &inputs.required_features);
        if !missing_features.is_empty() {
            return Err(ValidationError::MissingFeatures(missing_features));
        }
    }

    Ok(())
}

async fn read_devcontainer(path: &Path) -> Result<String, ValidationError> {
    if let Err(e) = fs::metadata(path).await {
        log::debug!("Failed to access {}: {}", path.display(), e);
        return Err(ValidationError::NotFound { path: path.to_owned() });
    }
    log::debug!("Successfully located devcontainer.json file");

    let content = fs::read(path).await.map_err(|e| {
        log::debug!("Failed to read {}: {}", path.display(), e);
        ValidationError::Unknown
    })?;
    log::debug!("Successfully read devcontainer.json content");

    Ok(String::from_utf8_lossy(&content).into_owned())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|&item| item.to_owned()).collect()
    }

    fn workspace(content: &str) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".devcontainer")).unwrap();
        fs::write(dir.path().join(".devcontainer/devcontainer.json"), content).unwrap();
        dir
    }

    fn inputs(extensions: &[&str]) -> Inputs {
        Inputs { required_extensions: strings(extensions), ..Default::default() }
    }

    async fn validate(content: &str, inputs: &Inputs) -> Result<(), String> {
        let dir = workspace(content);
        run(inputs, dir.path()).await.map_err(|e| e.to_string())
    }

    #[tokio::test]
    async fn test_all_extensions_present() {
        let content = r#"{"customizations":{"vscode":{"extensions":["ext1","ext2"]}}}"#;
        assert_eq!(validate(content, &inputs(&["ext1", "ext2"])).await, Ok(()));
    }

    #[tokio::test]
    async fn test_missing_extension() {
        let content = r#"{"customizations":{"vscode":{"extensions":["ext1"]}}}"#;
        assert_eq!(
            validate(content, &inputs(&["ext1", "ext2"])).await,
            Err("Missing required extensions: ext2".to_owned())
        );
    }

    #[tokio::test]
    async fn test_missing_tasks() {
        let content = r#"{
            "customizations": { "vscode": { "extensions": ["ext1"] } },
            "tasks": { "build": "x" }
        }"#;
        let inputs = Inputs { validate_tasks: true, ..inputs(&["ext1"]) };
        assert_eq!(
            validate(content, &inputs).await,
            Err("Missing or invalid required tasks: test, run".to_owned())
        );
    }

    #[tokio::test]
    async fn test_tasks_property_missing() {
        let content = r#"{"customizations":{"vscode":{"extensions":["ext1"]}}}"#;
        let inputs = Inputs { validate_tasks: true, ..inputs(&["ext1"]) };
        assert_eq!(
            validate(content, &inputs).await,
            Err("'tasks' property is missing".to_owned())
        );
    }

    #[tokio::test]
    async fn test_tasks_not_validated_unless_enabled() {
        let content = r#"{"customizations":{"vscode":{"extensions":["ext1"]}}}"#;
        assert_eq!(validate(content, &inputs(&["ext1"])).await, Ok(()));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let error = validate(r#"{"a":1,}"#, &inputs(&["ext1"])).await.unwrap_err();
        assert!(error.starts_with("Invalid JSON in devcontainer.json:"), "{error}");
    }

    #[tokio::test]
    async fn test_invalid_structure() {
        let content = r#"{"customizations":{"vscode":{"extensions":"ext1"}}}"#;
        assert_eq!(
            validate(content, &inputs(&["ext1"])).await,
            Err("Invalid devcontainer.json structure".to_owned())
        );
    }

    #[tokio::test]
    async fn test_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let inputs =
            Inputs { devcontainer_path: Some(dir.path().join("missing.json")), ..inputs(&["ext1"]) };
        let error = run(&inputs, dir.path()).await.unwrap_err();
        assert!(matches!(error, ValidationError::NotFound { .. }));
        assert_eq!(
            error.to_string(),
            format!("devcontainer.json not found at {}", dir.path().join("missing.json").display())
        );
    }

    #[tokio::test]
    async fn test_default_path_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let error = run(&inputs(&["ext1"]), dir.path()).await.unwrap_err();
        assert_eq!(
            error.to_string(),
            format!(
                "devcontainer.json not found at {}",
                dir.path().join(".devcontainer/devcontainer.json").display()
            )
        );
    }

    #[tokio::test]
    async fn test_unreadable_path_is_unknown_error() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = Inputs { devcontainer_path: Some(dir.path().to_owned()), ..inputs(&["ext1"]) };
        let error = run(&inputs, dir.path()).await.unwrap_err();
        assert!(matches!(error, ValidationError::Unknown));
        assert_eq!(error.to_string(), "An unknown error occurred");
    }

    #[tokio::test]
    async fn test_comments_are_stripped() {
        let content = r#"{
            // Extensions installed in the container
            "customizations": {
                "vscode": {
                    "extensions": [
                        "rust-lang.rust-analyzer" // language server
                    ]
                }
            }
        }"#;
        assert_eq!(validate(content, &inputs(&["Rust-Lang.Rust-Analyzer"])).await, Ok(()));
    }

    #[tokio::test]
    async fn test_missing_features() {
        let content = r#"{
            "customizations": { "vscode": { "extensions": ["ext1"] } },
            "features": { "ghcr.io/devcontainers/features/node:1": {} }
        }"#;
        let inputs = Inputs {
            required_features: strings(&["ghcr.io/devcontainers/features/node:1", "docker", "git"]),
            ..inputs(&["ext1"])
        };
        assert_eq!(
            validate(content, &inputs).await,
            Err("Missing required features: docker, git".to_owned())
        );
    }

    #[tokio::test]
    async fn test_extensions_checked_before_tasks_and_features() {
        let content = r#"{"tasks": {}}"#;
        let inputs = Inputs {
            validate_tasks: true,
            required_features: strings(&["docker"]),
            ..inputs(&["ext1"])
        };
        assert_eq!(
            validate(content, &inputs).await,
            Err("Missing required extensions: ext1".to_owned())
        );
    }

    #[tokio::test]
    async fn test_tasks_checked_before_features() {
        let content = r#"{"customizations":{"vscode":{"extensions":["ext1"]}},"tasks":{}}"#;
        let inputs = Inputs {
            validate_tasks: true,
            required_features: strings(&["docker"]),
            ..inputs(&["ext1"])
        };
        assert_eq!(
            validate(content, &inputs).await,
            Err("Missing or invalid required tasks: build, test, run".to_owned())
        );
    }

    #[tokio::test]
    async fn test_full_configuration_passes() {
        let content = r#"{
            "name": "rust",
            "image": "mcr.microsoft.com/devcontainers/rust:1",
            "customizations": { "vscode": { "extensions": ["rust-lang.rust-analyzer", "tamasfe.even-better-toml"] } },
            "tasks": { "build": "cargo build", "test": "cargo test", "run": "cargo run" },
            "features": { "ghcr.io/devcontainers/features/docker-in-docker:2": { "moby": true } }
        }"#;
        let inputs = Inputs {
            validate_tasks: true,
            required_features: strings(&["ghcr.io/devcontainers/features/docker-in-docker:2"]),
            ..inputs(&["rust-lang.rust-analyzer", "tamasfe.even-better-toml"])
        };
        assert_eq!(validate(content, &inputs).await, Ok(()));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devcontainer.json");
        let mut content = br#"{"name": ""#.to_vec();
        content.push(0xff);
        content.extend_from_slice(br#""}"#);
        fs::write(&path, content).unwrap();
        let inputs = Inputs { devcontainer_path: Some(path), ..inputs(&[]) };
        assert!(run(&inputs, dir.path()).await.is_ok());
    }
}
