use thiserror::Error;

/// Keyferry error types
///
/// Every failure is a recoverable value returned to the caller; none of
/// these conditions abort the process. A failed decrypt usually means a
/// wrong key was negotiated, which callers handle by renegotiating.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Symmetric cipher operation failed: {0}")]
    Cipher(String),

    #[error("Asymmetric operation failed: {0}")]
    Asymmetric(String),

    #[error("Key export failed: {0}")]
    KeyExport(String),

    #[error("Key load failed: {0}")]
    KeyLoad(String),
}

pub type Result<T> = std::result::Result<T, Error>;
