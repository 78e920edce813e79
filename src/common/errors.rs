use thiserror::Error;

/// Failure to turn a byte buffer into a codec descriptor.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The record is too short to hold the profile, compatibility and level bytes.
    #[error("malformed codec configuration: got {len} bytes, need at least {required}")]
    Malformed { len: usize, required: usize },
    #[error("invalid hex codec record: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Raised by a drawing surface when a context name cannot be attached.
///
/// The probe never surfaces this to its caller; it only moves on to the next
/// candidate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AcquireError {
    #[error("context `{name}` rejected: {reason}")]
    Rejected { name: String, reason: String },
    #[error("surface already bound to context `{0}`")]
    AlreadyBound(String),
}

/// Raised by a byte-code engine while compiling or instantiating a module.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("compile failed: {0}")]
    Compile(String),
    #[error("instantiation failed: {0}")]
    Instantiate(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config.toml or config.default.toml not found")]
    NotFound,
    #[error("{0} is empty")]
    Empty(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
