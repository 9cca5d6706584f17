use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidArgs,
    ConfigInvalid,
    ArtifactWriteFailed,
    SpawnFailed,
    WindowNotFound,
    ActionFailed,
    PlatformNotSupported,
    Timeout,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgs => "INVALID_ARGS",
            ErrorCode::ConfigInvalid => "CONFIG_INVALID",
            ErrorCode::ArtifactWriteFailed => "ARTIFACT_WRITE_FAILED",
            ErrorCode::SpawnFailed => "SPAWN_FAILED",
            ErrorCode::WindowNotFound => "WINDOW_NOT_FOUND",
            ErrorCode::ActionFailed => "ACTION_FAILED",
            ErrorCode::PlatformNotSupported => "PLATFORM_NOT_SUPPORTED",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Failure reported by a window automation backend.
#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct AdapterError {
    pub code: ErrorCode,
    pub message: String,
    pub suggestion: Option<String>,
    pub platform_detail: Option<String>,
}

impl AdapterError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), suggestion: None, platform_detail: None }
    }

    pub fn with_suggestion(mut self, s: impl Into<String>) -> Self {
        self.suggestion = Some(s.into());
        self
    }

    pub fn with_platform_detail(mut self, d: impl Into<String>) -> Self {
        self.platform_detail = Some(d.into());
        self
    }

    pub fn not_supported(method: &str) -> Self {
        Self::new(
            ErrorCode::PlatformNotSupported,
            format!("{method} is not supported on this platform"),
        )
        .with_suggestion("Configure a command-line argument template for this application instead")
    }

    pub fn window_not_found(title: &str) -> Self {
        Self::new(ErrorCode::WindowNotFound, format!("No window matching '{title}'"))
    }

    pub fn action_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ActionFailed, msg)
    }

    pub fn backend_missing(tool: &str) -> Self {
        Self::new(ErrorCode::PlatformNotSupported, format!("{tool} is not available"))
            .with_suggestion(format!("Install {tool} and make sure it is on PATH"))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &str {
        match self {
            AppError::Adapter(e) => e.code.as_str(),
            AppError::Artifact { .. } => ErrorCode::ArtifactWriteFailed.as_str(),
            AppError::Spawn { .. } => ErrorCode::SpawnFailed.as_str(),
            AppError::Config(_) | AppError::Json(_) => ErrorCode::ConfigInvalid.as_str(),
            AppError::Io(_) | AppError::Internal(_) => ErrorCode::Internal.as_str(),
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            AppError::Adapter(e) => e.suggestion.as_deref(),
            AppError::Artifact { .. } => {
                Some("Check permissions on the per-user configuration directory")
            }
            AppError::Spawn { .. } => Some("Check the application path in the launcher config"),
            _ => None,
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::Adapter(AdapterError::new(ErrorCode::InvalidArgs, msg))
    }

    pub fn artifact(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Artifact { path: path.into(), source }
    }
}
