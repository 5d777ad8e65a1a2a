/// Audio-specific errors
use thiserror::Error;
use wavefx_core::CoreError;

/// Result type alias using `AudioError`
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio error types
#[derive(Error, Debug)]
pub enum AudioError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Missing or invalid RIFF/WAVE structure, or a truncated chunk
    #[error("Format error: {0}")]
    Format(String),

    /// Recognized but unhandled encoding (compressed tag, bit depth)
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Invalid audio buffer
    #[error("Invalid audio buffer: {0}")]
    InvalidBuffer(String),

    /// Invalid effect chain configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AudioError {
    /// Create a format error
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Create an unsupported format error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<CoreError> for AudioError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Io(e) => Self::Io(e),
            other => Self::InvalidBuffer(other.to_string()),
        }
    }
}

impl From<AudioError> for CoreError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::Io(e) => CoreError::Io(e),
            other => CoreError::audio(other.to_string()),
        }
    }
}
