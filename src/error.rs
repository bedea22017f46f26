//! Initialization failures and their process exit codes.
//!
//! Each variant is unrecoverable at the point of detection: startup aborts,
//! the diagnostic is logged, and the process exits with that variant's
//! distinct nonzero status.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("platform event loop unavailable: {0}")]
    Platform(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("renderer creation failed: {0}")]
    Renderer(String),

    #[error("failed to read asset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode texture {path}: {source}")]
    Texture {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

impl InitError {
    /// Distinct nonzero exit status per failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            InitError::Platform(_) => 2,
            InitError::Window(_) => 3,
            InitError::Renderer(_) => 4,
            InitError::Io { .. } => 5,
            InitError::Texture { .. } => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_and_nonzero() {
        let io = InitError::Io {
            path: "assets/missing.png".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let renderer = InitError::Renderer("no adapter".into());

        let codes = [io.exit_code(), renderer.exit_code()];
        assert!(codes.iter().all(|&c| c != 0));
        assert_ne!(codes[0], codes[1]);
    }
}
