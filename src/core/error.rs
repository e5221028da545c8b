//! Error types for the logging pipeline

pub type Result<T> = std::result::Result<T, LogError>;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Unrecognized log level name in the configuration
    #[error("invalid log level: '{name}'")]
    InvalidLevel { name: String },

    /// Invalid configuration with details
    #[error("invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Configuration file could not be read
    #[error("failed to read config '{path}'")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("failed to parse config '{path}'")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A sink failed to acquire its resource during registration.
    /// Fatal at startup: the caller decides whether to abort the process.
    #[error("sink '{sink}' failed to initialize: {message}")]
    SinkInit { sink: String, message: String },

    /// File sink error with path
    #[error("file sink error for '{path}': {message}")]
    FileSink { path: String, message: String },

    /// File rotation error
    #[error("rotation failed for '{path}': {message}")]
    Rotation { path: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Operation attempted on a logger whose queue is already closed
    #[error("logger already closed")]
    Closed,

    /// The process-wide default logger was already claimed
    #[error("default logger already claimed")]
    AlreadyClaimed,
}

impl LogError {
    pub fn invalid_level(name: impl Into<String>) -> Self {
        LogError::InvalidLevel { name: name.into() }
    }

    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn sink_init(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::SinkInit {
            sink: sink.into(),
            message: message.into(),
        }
    }

    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::FileSink {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::Rotation {
            path: path.into(),
            message: message.into(),
        }
    }
}
