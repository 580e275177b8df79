use thiserror::Error;

/// Startup failures. Nothing runs once one of these is returned.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("{var} not found. Please set it in your environment or .env file")]
    MissingApiKey { var: &'static str },

    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("unable to locate config directory")]
    ConfigDir(#[source] anyhow::Error),

    #[error("invalid config file {}", path.display())]
    ConfigFile {
        path: std::path::PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Anything that goes wrong while asking the text generator for advice.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gemini error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse response: {message}")]
    Malformed { message: String },

    #[error("empty response from model")]
    Empty,
}

#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("{field} must be a non-negative number, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("could not parse {field}: '{raw}'")]
    Unparsable { field: &'static str, raw: String },
}
