use thiserror::Error;

/// Error kinds produced by the contact-matrix codec.
#[derive(Error, Debug)]
pub enum HicmcError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("input format error: {0}")]
    InputFormat(String),

    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error("external codec error: {0}")]
    ExternalTool(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HicmcError>;
