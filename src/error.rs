//! Carousel error handling
//!
//! One error type for everything that can fail during setup. Per-frame paths
//! never return errors: degenerate geometry and rejected playback are handled
//! where they happen.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CarouselError {
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Failed to parse config {path:?}: {error}")]
    ConfigParse { path: PathBuf, error: String },

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("GPU operation '{operation}' failed: {error}")]
    Gpu { operation: String, error: String },

    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("DOM error: {0}")]
    Dom(String),

    #[error("Video playback failed for {url}: {reason}")]
    Playback { url: String, reason: String },
}

pub type CarouselResult<T> = Result<T, CarouselError>;

/// Attach a GPU operation name to any displayable error
pub trait ErrorContext<T> {
    fn gpu_context(self, operation: &str) -> CarouselResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn gpu_context(self, operation: &str) -> CarouselResult<T> {
        self.map_err(|e| gpu_operation_error(operation, e))
    }
}

/// Create a GPU operation error
pub fn gpu_operation_error(operation: &str, error: impl std::fmt::Display) -> CarouselError {
    CarouselError::Gpu {
        operation: operation.to_string(),
        error: error.to_string(),
    }
}

/// Create a configuration validation error
pub fn config_error(message: impl Into<String>) -> CarouselError {
    CarouselError::Config {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpu_context_wraps_message() {
        let result: Result<(), &str> = Err("no adapter");
        let err = result.gpu_context("request_adapter").unwrap_err();
        assert_eq!(
            err.to_string(),
            "GPU operation 'request_adapter' failed: no adapter"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = config_error("videos must not be empty");
        assert_eq!(err.to_string(), "Invalid configuration: videos must not be empty");
    }
}
