use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ToolupError>;

#[derive(Error, Debug)]
pub enum ToolupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("'{name}' is already installed")]
    AlreadyInstalled { name: String },

    #[error("tool '{name}' not found in catalog")]
    ToolNotFound { name: String },

    #[error("no release asset found for {os}/{arch}")]
    NoAssetFound { os: String, arch: String },

    #[error("release metadata request failed: {message}")]
    MetadataFetch { message: String },

    #[error("release host rate limit hit: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("download failed: {url}")]
    Download { url: String },

    #[error("extraction failed: {message}")]
    Extraction { message: String },

    #[error("archive entry '{entry}' escapes the destination directory")]
    PathTraversal { entry: String },

    #[error("source build failed: {output}")]
    SourceBuild { output: String },

    #[error("configuration error: {message}")]
    ConfigError { message: String },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("home directory not found")]
    HomeDirectoryNotFound,
}

impl ToolupError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        ToolupError::ConfigError {
            message: message.into(),
        }
    }

    pub fn extraction<S: Into<String>>(message: S) -> Self {
        ToolupError::Extraction {
            message: message.into(),
        }
    }

    pub fn metadata_fetch<S: Into<String>>(message: S) -> Self {
        ToolupError::MetadataFetch {
            message: message.into(),
        }
    }
}
